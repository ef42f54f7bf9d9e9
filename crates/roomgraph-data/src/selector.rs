//! Per-room views of a dataset.

use crate::dataset::{Dataset, Record};

/// Borrowed subset of a [`Dataset`] belonging to one room.
#[derive(Debug, Clone)]
pub struct RoomPartition<'a> {
    room: &'a str,
    records: Vec<&'a Record>,
}

impl<'a> RoomPartition<'a> {
    /// Room identifier the partition was selected for.
    pub const fn room(&self) -> &'a str {
        self.room
    }

    /// Matching records in dataset order.
    pub fn records(&self) -> &[&'a Record] {
        &self.records
    }

    /// Number of matching records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no record matched.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Selects the records whose room identifier equals `room` exactly.
pub fn select_room<'a>(dataset: &'a Dataset, room: &'a str) -> RoomPartition<'a> {
    RoomPartition {
        room,
        records: dataset
            .records()
            .iter()
            .filter(|record| record.room == room)
            .collect(),
    }
}
