//! Shared "load + recompute" logic used by the CLI commands.
//!
//! The same controller the TUI drives is fed the selector values as events,
//! so `report` and `export` show exactly what the dashboard would.

use std::sync::Arc;
use std::time::Duration;

use crate::cli::{SelectionArgs, SourceArgs};
use crate::controller::{Controller, DashboardView, DatasetStatus, SelectionEvent};
use crate::data::{DatasetSource, SampleConfig};
use crate::domain::{Dataset, ReportMode, Selection};
use crate::error::AppError;

/// Outputs of one non-interactive recomputation.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub dataset: Arc<Dataset>,
    pub view: DashboardView,
}

/// Pick the dataset source from flags: csv, then sample, then url.
pub fn source_from_args(args: &SourceArgs) -> DatasetSource {
    if let Some(path) = &args.csv {
        DatasetSource::File(path.clone())
    } else if args.sample {
        DatasetSource::Sample(SampleConfig {
            seed: args.seed,
            ..SampleConfig::default()
        })
    } else {
        DatasetSource::Url(args.url.clone())
    }
}

pub fn load_dataset(args: &SourceArgs) -> Result<Arc<Dataset>, AppError> {
    let source = source_from_args(args);
    Ok(Arc::new(source.load(Duration::from_secs(args.timeout_secs))?))
}

pub fn selection_from_args(args: &SelectionArgs) -> Selection {
    let mode = args.mode.unwrap_or_default();
    if args.year.is_some() && mode != ReportMode::Yearly {
        tracing::warn!(
            mode = mode.display_name(),
            "--year only applies to the yearly report; ignoring it"
        );
    }
    Selection::new(mode, args.year)
}

/// Replay a selection through the controller against a loaded dataset.
pub fn run_view(dataset: Arc<Dataset>, selection: Selection) -> RunOutput {
    let mut controller = Controller::new(DatasetStatus::Ready(Arc::clone(&dataset)));
    controller.handle(SelectionEvent::ReportModeChanged(selection.report_mode));
    let view = controller
        .handle(SelectionEvent::YearChanged(selection.selected_year))
        .clone();
    RunOutput { dataset, view }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::ViewState;
    use std::path::PathBuf;

    fn source_args() -> SourceArgs {
        SourceArgs {
            csv: None,
            url: "http://example.invalid/data.csv".to_string(),
            sample: false,
            seed: 7,
            timeout_secs: 5,
        }
    }

    #[test]
    fn source_precedence_is_csv_then_sample_then_url() {
        let mut args = source_args();
        assert!(matches!(source_from_args(&args), DatasetSource::Url(_)));

        args.sample = true;
        assert_eq!(
            source_from_args(&args),
            DatasetSource::Sample(SampleConfig {
                seed: 7,
                ..SampleConfig::default()
            })
        );

        args.csv = Some(PathBuf::from("sales.csv"));
        assert_eq!(source_from_args(&args), DatasetSource::File(PathBuf::from("sales.csv")));
    }

    #[test]
    fn run_view_on_sample_data() {
        let mut args = source_args();
        args.sample = true;
        let dataset = load_dataset(&args).unwrap();

        let out = run_view(Arc::clone(&dataset), Selection::new(ReportMode::Yearly, Some(2008)));
        assert_eq!(out.view.state, ViewState::YearlyViewReady { year: 2008 });
        assert_eq!(out.view.layout.len(), 4);

        // Year is dropped by the reducer outside yearly mode.
        let out = run_view(dataset, Selection::new(ReportMode::RecessionPeriod, Some(2008)));
        assert_eq!(out.view.state, ViewState::RecessionView);
        assert_eq!(out.view.selection.selected_year, None);
    }

    #[test]
    fn missing_mode_means_unset() {
        let sel = selection_from_args(&SelectionArgs { mode: None, year: None });
        assert_eq!(sel, Selection::default());
    }
}
