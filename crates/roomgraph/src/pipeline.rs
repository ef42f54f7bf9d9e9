//! End-to-end run: load, clean, filter, then render every chart.
//!
//! Loading, cleaning and the business-hours pass run once on a blocking
//! thread. Each (variant, room) pair and each overlay chart is then rendered
//! as its own blocking job in a [`JoinSet`]; jobs only read the shared
//! datasets and write distinct files.
//!
//! Errors that [`RoomGraphError::is_fatal`] reports abort the run. Any other
//! rendering error skips that one chart and is listed in the summary.

use crate::error::AppResult;
use roomgraph_common::{fill_template, Result, RoomGraphError};
use roomgraph_config::{Config, MissingRoomPolicy};
use roomgraph_data::{
    group_by_period, select_room, BusinessHours, Cleaner, CsvLoader, Dataset, Period, RawDataset,
};
use roomgraph_graphs::{
    ChartConfig, ChartRenderer, LineChartRenderer, OutputLayout, TimeSeries, Variant,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

/// Charts produced for one room in one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomReport {
    /// Room identifier as configured.
    pub room: String,
    /// Data the charts were drawn from.
    pub variant: Variant,
    /// Records the room had in this variant.
    pub records: usize,
    /// Files written, overall chart first.
    pub charts: Vec<PathBuf>,
    /// Files that could not be drawn.
    pub skipped: Vec<PathBuf>,
}

/// Outcome of a full run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Rows read from the export.
    pub loaded: usize,
    /// Records left after cleaning.
    pub cleaned: usize,
    /// Records inside business hours, when that variant ran.
    pub filtered: Option<usize>,
    /// One report per (room, variant), in configured room order.
    pub rooms: Vec<RoomReport>,
    /// Overlay charts written, all-data variant first.
    pub overlays: Vec<PathBuf>,
    /// Overlay charts that could not be drawn.
    pub skipped_overlays: Vec<PathBuf>,
}

impl RunSummary {
    /// Total number of chart files written.
    pub fn chart_count(&self) -> usize {
        self.rooms.iter().map(|r| r.charts.len()).sum::<usize>() + self.overlays.len()
    }

    /// Every chart that could not be drawn.
    pub fn skipped(&self) -> Vec<&Path> {
        self.rooms
            .iter()
            .flat_map(|r| r.skipped.iter())
            .chain(&self.skipped_overlays)
            .map(PathBuf::as_path)
            .collect()
    }

    /// Configured rooms that had no records in the cleaned data.
    pub fn missing_rooms(&self) -> Vec<&str> {
        self.rooms
            .iter()
            .filter(|r| r.variant == Variant::All && r.records == 0)
            .map(|r| r.room.as_str())
            .collect()
    }
}

impl RoomReport {
    fn add(&mut self, path: PathBuf, written: bool) {
        if written {
            self.charts.push(path);
        } else {
            self.skipped.push(path);
        }
    }
}

enum JobOutput {
    Room(RoomReport),
    Overlay(Variant, Option<PathBuf>),
}

const fn variant_rank(variant: Variant) -> u8 {
    match variant {
        Variant::All => 0,
        Variant::BusinessHours => 1,
    }
}

/// Runs the configured analysis.
#[derive(Clone)]
pub struct Pipeline {
    config: Arc<Config>,
    renderer: Arc<dyn ChartRenderer>,
    layout: OutputLayout,
}

impl Pipeline {
    /// Creates a pipeline drawing PNG line charts.
    pub fn new(config: Config) -> Result<Self> {
        Self::with_renderer(config, Arc::new(LineChartRenderer::new()))
    }

    /// Creates a pipeline with a custom renderer.
    pub fn with_renderer(config: Config, renderer: Arc<dyn ChartRenderer>) -> Result<Self> {
        config.validate()?;
        let layout = OutputLayout::new(&config.output);
        Ok(Self {
            config: Arc::new(config),
            renderer,
            layout,
        })
    }

    /// The configuration this pipeline runs with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Reads the export named in the configuration.
    pub fn load(&self) -> Result<RawDataset> {
        CsvLoader::from_config(&self.config.source)?.load(&self.config.source.path)
    }

    /// Cleans a loaded export.
    pub fn clean(&self, raw: RawDataset) -> Dataset {
        Cleaner::new(&self.config.cleaning).clean(raw)
    }

    /// Reads and cleans the export.
    pub fn load_and_clean(&self) -> Result<Dataset> {
        Ok(self.clean(self.load()?))
    }

    /// Runs the whole analysis and returns what was written.
    #[instrument(skip_all, fields(source = %self.config.source.path.display()))]
    pub async fn run(&self) -> AppResult<RunSummary> {
        let started = Instant::now();
        info!("Processing {} room(s)", self.config.rooms.len());

        let pipeline = self.clone();
        let (loaded, cleaned, filtered) = tokio::task::spawn_blocking(move || {
            let raw = pipeline.load()?;
            let loaded = raw.len();
            let cleaned = pipeline.clean(raw);
            let filtered = pipeline.filter(&cleaned)?;
            Ok::<_, RoomGraphError>((loaded, cleaned, filtered))
        })
        .await??;

        let mut summary = RunSummary {
            loaded,
            cleaned: cleaned.len(),
            filtered: filtered.as_ref().map(Dataset::len),
            ..RunSummary::default()
        };

        let mut variants = vec![(Variant::All, Arc::new(cleaned))];
        if let Some(filtered) = filtered {
            variants.push((Variant::BusinessHours, Arc::new(filtered)));
        }

        let mut jobs = JoinSet::new();
        for (variant, dataset) in &variants {
            let variant = *variant;
            for room in &self.config.rooms {
                let job = self.clone();
                let dataset = Arc::clone(dataset);
                let room = room.clone();
                jobs.spawn_blocking(move || {
                    job.render_room(&dataset, variant, &room).map(JobOutput::Room)
                });
            }
            if self.config.charts.overlay {
                let job = self.clone();
                let dataset = Arc::clone(dataset);
                jobs.spawn_blocking(move || {
                    job.render_overlay(&dataset, variant)
                        .map(|path| JobOutput::Overlay(variant, path))
                });
            }
        }

        let mut overlays = Vec::new();
        while let Some(joined) = jobs.join_next().await {
            match joined?? {
                JobOutput::Room(report) => summary.rooms.push(report),
                JobOutput::Overlay(variant, Some(path)) => overlays.push((variant, path)),
                JobOutput::Overlay(variant, None) => summary
                    .skipped_overlays
                    .push(self.layout.overlay_path(variant)),
            }
        }

        let rooms = &self.config.rooms;
        summary.rooms.sort_by_key(|report| {
            (
                rooms.iter().position(|r| *r == report.room),
                variant_rank(report.variant),
            )
        });
        overlays.sort_by_key(|(variant, _)| variant_rank(*variant));
        summary.overlays = overlays.into_iter().map(|(_, path)| path).collect();
        summary.skipped_overlays.sort();

        info!(
            "Wrote {} chart(s) from {} of {} record(s) in {:.2?}",
            summary.chart_count(),
            summary.cleaned,
            summary.loaded,
            started.elapsed()
        );
        Ok(summary)
    }

    /// Restricts cleaned data to business hours, when that variant is enabled.
    pub fn filter(&self, cleaned: &Dataset) -> Result<Option<Dataset>> {
        if !self.config.business_hours.enabled {
            return Ok(None);
        }
        let hours = BusinessHours::from_config(&self.config.business_hours)?;
        Ok(Some(hours.apply(cleaned.clone())))
    }

    /// Renders the overall, monthly and daily charts of one room.
    pub fn render_room(&self, dataset: &Dataset, variant: Variant, room: &str) -> Result<RoomReport> {
        let partition = select_room(dataset, room);
        let mut report = RoomReport {
            room: room.to_string(),
            variant,
            records: partition.len(),
            charts: Vec::new(),
            skipped: Vec::new(),
        };

        if partition.is_empty() {
            match self.config.missing_room {
                MissingRoomPolicy::Warn => warn!("No records for room {room} ({variant})"),
                MissingRoomPolicy::Ignore => debug!("No records for room {room} ({variant})"),
            }
            return Ok(report);
        }

        let titles = &self.config.charts.titles;
        let path = self.layout.overall_path(variant, room);
        let written = self.draw(
            self.title(&titles.overall, room, None, variant),
            &[TimeSeries::from_records(room, partition.records())],
            &path,
        )?;
        report.add(path, written);

        for (period, template) in [(Period::Month, &titles.monthly), (Period::Day, &titles.daily)] {
            for (key, members) in group_by_period(partition.records(), period) {
                let path = self.layout.period_path(variant, room, period, &key);
                let written = self.draw(
                    self.title(template, room, Some(&key), variant),
                    &[TimeSeries::from_records(room, &members)],
                    &path,
                )?;
                report.add(path, written);
            }
        }

        info!(
            "Room {room} ({variant}): {} chart(s) from {} record(s)",
            report.charts.len(),
            report.records
        );
        Ok(report)
    }

    /// Renders one chart with a line per configured room. Returns `None` when
    /// the chart could not be drawn but the run may continue.
    pub fn render_overlay(&self, dataset: &Dataset, variant: Variant) -> Result<Option<PathBuf>> {
        let series: Vec<TimeSeries> = self
            .config
            .rooms
            .iter()
            .map(|room| TimeSeries::from_records(room.as_str(), select_room(dataset, room).records()))
            .filter(|series| !series.is_empty())
            .collect();

        let path = self.layout.overlay_path(variant);
        let title = self.title(&self.config.charts.titles.overlay, "", None, variant);
        Ok(self.draw(title, &series, &path)?.then_some(path))
    }

    fn title(&self, template: &str, room: &str, period: Option<&str>, variant: Variant) -> String {
        let title = fill_template(template, room, period);
        match variant {
            Variant::All => title,
            Variant::BusinessHours => title + &self.config.charts.titles.filtered_suffix,
        }
    }

    /// Draws one chart. Returns whether the file was written; fatal errors
    /// propagate.
    fn draw(&self, title: String, series: &[TimeSeries], path: &Path) -> Result<bool> {
        let chart = ChartConfig::from_charts(&self.config.charts, title);
        match self.renderer.render_to_file(&chart, series, path) {
            Ok(()) => {
                debug!("Saved {}", path.display());
                Ok(true)
            }
            Err(e) if !e.is_fatal() => {
                warn!("Skipping {}: {e}", path.display());
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomgraph_common::test_utils::mock_timestamp;
    use roomgraph_common::SchemaPreset;
    use roomgraph_data::Record;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingRenderer {
        titles: Mutex<Vec<String>>,
    }

    impl ChartRenderer for RecordingRenderer {
        fn render_to_file(&self, config: &ChartConfig, _series: &[TimeSeries], _path: &Path) -> Result<()> {
            self.titles.lock().unwrap().push(config.title.clone());
            Ok(())
        }
    }

    fn dataset(rooms: &[&str]) -> Dataset {
        let records = rooms
            .iter()
            .enumerate()
            .map(|(i, room)| Record {
                timestamp: mock_timestamp(2024, 5, 17, 8 + u32::try_from(i).unwrap(), 0, 0),
                value: 4.0,
                room: (*room).to_string(),
                metadata: Vec::new(),
            })
            .collect();
        Dataset::new(SchemaPreset::TimeSeries.schema(), records)
    }

    #[test]
    fn test_filtered_titles_carry_suffix() {
        let renderer = Arc::new(RecordingRenderer::default());
        let pipeline = Pipeline::with_renderer(Config::default(), renderer.clone()).unwrap();

        let report = pipeline
            .render_room(&dataset(&["625"]), Variant::BusinessHours, "625")
            .unwrap();
        assert_eq!(report.charts.len(), 3);

        let titles = renderer.titles.lock().unwrap();
        assert_eq!(titles[0], "Gerätezählung über die Zeit in 625 (Geschäftszeiten)");
        assert_eq!(titles[1], "Gerätezählung im 2024-05 in Raum 625 (Geschäftszeiten)");
        assert_eq!(titles[2], "Gerätezählung am 2024-05-17 in Raum 625 (Geschäftszeiten)");
    }

    #[test]
    fn test_missing_room_renders_nothing() {
        let renderer = Arc::new(RecordingRenderer::default());
        let pipeline = Pipeline::with_renderer(Config::default(), renderer.clone()).unwrap();

        let report = pipeline.render_room(&dataset(&["625"]), Variant::All, "640").unwrap();
        assert_eq!(report.records, 0);
        assert!(report.charts.is_empty());
        assert!(renderer.titles.lock().unwrap().is_empty());
    }

    #[test]
    fn test_overlay_with_no_data_still_renders() {
        let renderer = Arc::new(RecordingRenderer::default());
        let pipeline = Pipeline::with_renderer(Config::default(), renderer.clone()).unwrap();

        let path = pipeline.render_overlay(&dataset(&[]), Variant::All).unwrap().unwrap();
        assert!(path.ends_with("gesamt_plots/geraetezaehlung_alle_raeume.png"));
        assert_eq!(renderer.titles.lock().unwrap().len(), 1);
    }

    struct FailingRenderer {
        fatal: bool,
    }

    impl ChartRenderer for FailingRenderer {
        fn render_to_file(&self, _config: &ChartConfig, _series: &[TimeSeries], path: &Path) -> Result<()> {
            if !path.to_string_lossy().contains("taegliche") {
                return Ok(());
            }
            if self.fatal {
                Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into())
            } else {
                Err(RoomGraphError::graph("backend refused"))
            }
        }
    }

    #[test]
    fn test_drawing_errors_skip_the_chart() {
        let renderer = Arc::new(FailingRenderer { fatal: false });
        let pipeline = Pipeline::with_renderer(Config::default(), renderer).unwrap();

        let report = pipeline.render_room(&dataset(&["625"]), Variant::All, "625").unwrap();
        assert_eq!(report.charts.len(), 2);
        assert_eq!(report.skipped.len(), 1);
        assert!(report.skipped[0].ends_with("taegliche_plots_625/geraetezaehlung_2024-05-17.png"));
    }

    #[test]
    fn test_io_errors_abort_the_room() {
        let renderer = Arc::new(FailingRenderer { fatal: true });
        let pipeline = Pipeline::with_renderer(Config::default(), renderer).unwrap();

        let err = pipeline
            .render_room(&dataset(&["625"]), Variant::All, "625")
            .unwrap_err();
        assert!(matches!(err, RoomGraphError::Io(_)));
    }

    #[test]
    fn test_filter_follows_configuration() {
        let pipeline = Pipeline::with_renderer(
            Config::default(),
            Arc::new(RecordingRenderer::default()),
        )
        .unwrap();
        // 08:00 UTC on a Friday is 10:00 in Berlin.
        let filtered = pipeline.filter(&dataset(&["625"])).unwrap().unwrap();
        assert_eq!(filtered.len(), 1);

        let mut config = Config::default();
        config.business_hours.enabled = false;
        let pipeline =
            Pipeline::with_renderer(config, Arc::new(RecordingRenderer::default())).unwrap();
        assert!(pipeline.filter(&dataset(&["625"])).unwrap().is_none());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = Config::default();
        config.rooms.clear();
        assert!(Pipeline::new(config).is_err());
    }
}
