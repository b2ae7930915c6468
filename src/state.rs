use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use crate::config::AppConfig;
use crate::dashboard::controls::{ControlEvent, Controls};
use crate::dashboard::render::{render_pass, DashboardView, RenderOptions};
use crate::dashboard::{Layout, Variant};
use crate::data::cache::TableCache;
use crate::data::loader::LoadOptions;
use crate::data::model::Table;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub variant: Variant,

    /// Options of the table currently shown.
    pub source: LoadOptions,

    /// Memoized tables; lives as long as the process.
    cache: TableCache,

    /// The table currently shown.
    pub table: Arc<Table>,

    pub layout: Layout,

    /// Filter and picker widget values.
    pub controls: Controls,

    pub render_options: RenderOptions,

    /// Result of the last render pass.
    pub view: DashboardView,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Load the configured source. Fails when the file cannot be loaded, in
    /// which case no dashboard must be shown.
    pub fn load(config: &AppConfig) -> Result<Self> {
        let mut cache = TableCache::default();
        let table = cache.get_or_load(&config.source)?;
        if table.is_empty() {
            log::warn!("{} has no data rows", config.source.path.display());
        }
        let layout = config.variant.layout(&table);
        let controls = Controls::new(&table, &layout);
        let render_options = config.render_options();
        let view = render_pass(&table, &layout, &controls, &render_options);

        Ok(Self {
            variant: config.variant,
            source: config.source.clone(),
            cache,
            table,
            layout,
            controls,
            render_options,
            view,
            status_message: None,
        })
    }

    /// Number of distinct sources parsed so far.
    pub fn files_parsed(&self) -> usize {
        self.cache.loads()
    }

    /// Rerun the pipeline: filter, aggregate, lay out.
    pub fn refresh(&mut self) {
        self.view = render_pass(&self.table, &self.layout, &self.controls, &self.render_options);
    }

    /// Apply widget interactions, then rerun the pipeline once if any of
    /// them changed something.
    pub fn handle(&mut self, events: Vec<ControlEvent>) {
        let mut changed = false;
        for event in events {
            log::debug!("Control event: {event:?}");
            changed |= self.controls.apply(&self.table, event);
        }
        if changed {
            self.refresh();
        }
    }

    /// Switch to another file with the current load options. A failure keeps
    /// the current dashboard and is reported in the status line.
    pub fn open(&mut self, path: PathBuf) {
        let source = LoadOptions {
            path,
            ..self.source.clone()
        };
        match self.cache.get_or_load(&source) {
            Ok(table) => {
                self.layout = self.variant.layout(&table);
                self.controls = Controls::new(&table, &self.layout);
                self.table = table;
                self.source = source;
                self.status_message = None;
                self.refresh();
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn write_csv(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn config(path: PathBuf) -> AppConfig {
        AppConfig {
            source: LoadOptions::new(path),
            ..AppConfig::default()
        }
    }

    const PATIENTS: &str = "Country_Region,Cancer_Type,Cancer_Stage,Treatment_Cost_USD,Survival_Years\n\
                            A,X,Stage I,100,1\n\
                            B,Y,Stage II,300,3\n";

    #[test]
    fn missing_file_produces_no_state() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppState::load(&config(dir.path().join("nope.csv"))).is_err());
    }

    #[test]
    fn events_trigger_a_new_render_pass() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::load(&config(write_csv(&dir, "p.csv", PATIENTS))).unwrap();
        assert_eq!(state.view.visible_rows, 2);

        state.handle(vec![ControlEvent::Toggle {
            column: "Country_Region".into(),
            value: CellValue::Text("B".into()),
        }]);
        assert_eq!(state.view.visible_rows, 1);
        assert_eq!(state.view.metrics[1].value, "100.00");
    }

    #[test]
    fn failed_open_keeps_the_current_dashboard() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::load(&config(write_csv(&dir, "p.csv", PATIENTS))).unwrap();

        state.open(dir.path().join("missing.csv"));
        assert!(state.status_message.is_some());
        assert_eq!(state.view.total_rows, 2);

        let other = write_csv(&dir, "q.csv", "Country_Region\nC\n");
        state.open(other.clone());
        assert_eq!(state.status_message, None);
        assert_eq!(state.source.path, other);
        assert_eq!(state.view.total_rows, 1);
    }

    #[test]
    fn reopening_a_file_uses_the_cache() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_csv(&dir, "p.csv", PATIENTS);
        let mut state = AppState::load(&config(first.clone())).unwrap();
        assert_eq!(state.files_parsed(), 1);

        state.open(write_csv(&dir, "q.csv", "Country_Region\nC\n"));
        state.open(first);
        assert_eq!(state.files_parsed(), 2);
        assert_eq!(state.view.total_rows, 2);
    }
}
