//! Reactive controller.
//!
//! Selector events flow through a pure reducer into a new [`Selection`]; the
//! selection (plus the dataset status) is then classified into a [`ViewState`]
//! and the matching pipeline runs to produce a fresh [`DashboardView`].
//!
//! Front-ends only ever see `DashboardView`: every core failure is folded into
//! an empty layout plus a [`Notice`].

use std::sync::Arc;

use serde::Serialize;

use crate::aggregate::{recession, yearly};
use crate::domain::{ChartLayout, Dataset, ReportMode, Selection, YEAR_MAX, YEAR_MIN, year_options};
use crate::error::DashboardError;

/// A value-changed notification from one of the two selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    ReportModeChanged(ReportMode),
    YearChanged(Option<i32>),
}

/// Apply one selector event.
///
/// Mirrors what the host UI does around the enablement rule: switching to a
/// mode that disables the year input clears the year, and year changes that
/// arrive while the input is disabled are dropped.
pub fn reduce(selection: Selection, event: SelectionEvent) -> Selection {
    match event {
        SelectionEvent::ReportModeChanged(mode) => Selection {
            report_mode: mode,
            selected_year: if crate::domain::year_input_disabled(mode) {
                None
            } else {
                selection.selected_year
            },
        },
        SelectionEvent::YearChanged(year) => {
            if selection.year_input_disabled() {
                selection
            } else {
                Selection {
                    selected_year: year,
                    ..selection
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ViewState {
    Idle,
    RecessionView,
    YearlyViewIncomplete,
    YearlyViewReady { year: i32 },
}

impl ViewState {
    /// Classify a selection. An out-of-range year is reported alongside the
    /// (incomplete) state rather than as a failure.
    pub fn resolve(selection: &Selection) -> (Self, Option<DashboardError>) {
        match (selection.report_mode, selection.selected_year) {
            (ReportMode::Unset, _) => (ViewState::Idle, None),
            (ReportMode::RecessionPeriod, _) => (ViewState::RecessionView, None),
            (ReportMode::Yearly, None) => (ViewState::YearlyViewIncomplete, None),
            (ReportMode::Yearly, Some(year)) if !year_options().contains(&year) => (
                ViewState::YearlyViewIncomplete,
                Some(DashboardError::InvalidSelection {
                    year,
                    min: YEAR_MIN,
                    max: YEAR_MAX,
                }),
            ),
            (ReportMode::Yearly, Some(year)) => (ViewState::YearlyViewReady { year }, None),
        }
    }

    pub fn display_name(self) -> String {
        match self {
            ViewState::Idle => "idle".to_string(),
            ViewState::RecessionView => "recession".to_string(),
            ViewState::YearlyViewIncomplete => "yearly (select a year)".to_string(),
            ViewState::YearlyViewReady { year } => format!("yearly {year}"),
        }
    }
}

/// Why a view carries no charts (or carries a caveat).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "notice", content = "detail", rename_all = "snake_case")]
pub enum Notice {
    Loading,
    NoData(String),
    InvalidYear(i32),
    EmptyInput(&'static str),
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Notice::Loading => "Loading dataset...".to_string(),
            Notice::NoData(reason) => format!("No data: {reason}"),
            Notice::InvalidYear(year) => {
                format!("Year {year} is outside {YEAR_MIN}-{YEAR_MAX}; select another year.")
            }
            Notice::EmptyInput(pipeline) => format!("No rows available for the {pipeline} report."),
        }
    }

    fn from_error(err: DashboardError) -> Self {
        match err {
            DashboardError::InvalidSelection { year, .. } => Notice::InvalidYear(year),
            DashboardError::EmptyAggregationGroup { pipeline } => Notice::EmptyInput(pipeline),
            DashboardError::DatasetUnavailable(reason) => Notice::NoData(reason),
            DashboardError::UnknownReportMode(mode) => Notice::NoData(format!("unknown report mode '{mode}'")),
        }
    }
}

/// Everything a front-end needs to draw after one recomputation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub state: ViewState,
    pub selection: Selection,
    pub year_input_disabled: bool,
    pub layout: ChartLayout,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

/// What the dataset provider can currently offer.
#[derive(Debug, Clone)]
pub enum DatasetStatus {
    Loading,
    Ready(Arc<Dataset>),
    Unavailable(String),
}

impl DatasetStatus {
    pub fn dataset(&self) -> Result<&Dataset, DashboardError> {
        match self {
            DatasetStatus::Ready(ds) => Ok(ds),
            DatasetStatus::Loading => Err(DashboardError::DatasetUnavailable("still loading".to_string())),
            DatasetStatus::Unavailable(reason) => Err(DashboardError::DatasetUnavailable(reason.clone())),
        }
    }
}

/// Build the chart layout for a selection. Pure: same inputs, same layout.
pub fn compute_layout(selection: &Selection, dataset: &Dataset) -> Result<ChartLayout, DashboardError> {
    let (state, invalid) = ViewState::resolve(selection);
    if let Some(err) = invalid {
        return Err(err);
    }

    match state {
        ViewState::Idle | ViewState::YearlyViewIncomplete => Ok(ChartLayout::empty()),
        ViewState::RecessionView => Ok(ChartLayout::grid(recession::run(dataset)?)),
        ViewState::YearlyViewReady { year } => Ok(ChartLayout::grid(yearly::run(dataset, year)?)),
    }
}

/// Recompute the full view from scratch. Never fails; failures become notices.
pub fn compute_view(selection: Selection, status: &DatasetStatus) -> DashboardView {
    let (state, _) = ViewState::resolve(&selection);
    let year_input_disabled = selection.year_input_disabled();

    let result = match status {
        // Idle never needs data, so it renders the same with or without a table.
        DatasetStatus::Loading if state != ViewState::Idle => Err(None),
        _ => status
            .dataset()
            .and_then(|ds| compute_layout(&selection, ds))
            .map_err(Some),
    };

    let (layout, notice) = match result {
        Ok(layout) => (layout, None),
        Err(None) => (ChartLayout::empty(), Some(Notice::Loading)),
        Err(Some(err)) if state == ViewState::Idle => {
            tracing::debug!(error = %err, "idle view without dataset");
            (ChartLayout::empty(), None)
        }
        Err(Some(err)) => {
            tracing::warn!(error = %err, state = ?state, "recomputation fell back to an empty layout");
            (ChartLayout::empty(), Some(Notice::from_error(err)))
        }
    };

    DashboardView {
        state,
        selection,
        year_input_disabled,
        layout,
        notice,
    }
}

/// Generation-stamped handle for one recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub generation: u64,
    pub selection: Selection,
}

/// A finished recomputation, waiting to be accepted or discarded.
#[derive(Debug, Clone)]
pub struct Computed {
    pub generation: u64,
    pub view: DashboardView,
}

/// Owns the selection, the dataset status, and the currently shown view.
///
/// Each event or dataset change issues a new [`Ticket`]; only the result for
/// the latest ticket is accepted (last writer wins).
#[derive(Debug)]
pub struct Controller {
    selection: Selection,
    dataset: DatasetStatus,
    generation: u64,
    view: DashboardView,
}

impl Controller {
    pub fn new(dataset: DatasetStatus) -> Self {
        let selection = Selection::default();
        let view = compute_view(selection, &dataset);
        Self {
            selection,
            dataset,
            generation: 0,
            view,
        }
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    pub fn dataset_status(&self) -> &DatasetStatus {
        &self.dataset
    }

    /// Apply an event to the selection and issue a ticket for the recomputation.
    pub fn dispatch(&mut self, event: SelectionEvent) -> Ticket {
        self.selection = reduce(self.selection, event);
        self.next_ticket()
    }

    /// Swap the dataset status (load finished or failed) and issue a ticket.
    pub fn set_dataset(&mut self, status: DatasetStatus) -> Ticket {
        self.dataset = status;
        self.next_ticket()
    }

    /// Run the recomputation for a ticket against the current dataset.
    pub fn compute(&self, ticket: &Ticket) -> Computed {
        Computed {
            generation: ticket.generation,
            view: compute_view(ticket.selection, &self.dataset),
        }
    }

    /// Accept a result only if it belongs to the latest ticket.
    pub fn complete(&mut self, computed: Computed) -> bool {
        if computed.generation != self.generation {
            tracing::debug!(
                stale = computed.generation,
                latest = self.generation,
                "discarding stale recomputation"
            );
            return false;
        }
        self.view = computed.view;
        true
    }

    /// Dispatch, compute and complete in one synchronous step.
    pub fn handle(&mut self, event: SelectionEvent) -> &DashboardView {
        let ticket = self.dispatch(event);
        self.refresh(ticket)
    }

    /// Replace the dataset status and recompute synchronously.
    pub fn replace_dataset(&mut self, status: DatasetStatus) -> &DashboardView {
        let ticket = self.set_dataset(status);
        self.refresh(ticket)
    }

    fn refresh(&mut self, ticket: Ticket) -> &DashboardView {
        let computed = self.compute(&ticket);
        self.complete(computed);
        tracing::debug!(
            generation = ticket.generation,
            state = ?self.view.state,
            charts = self.view.layout.len(),
            "view recomputed"
        );
        &self.view
    }

    fn next_ticket(&mut self) -> Ticket {
        self.generation += 1;
        Ticket {
            generation: self.generation,
            selection: self.selection,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::testing::{RecordBuilder, dataset};
    use crate::aggregate::{recession, yearly};
    use crate::domain::ChartKind;

    fn ready() -> DatasetStatus {
        DatasetStatus::Ready(Arc::new(dataset(vec![
            RecordBuilder::new(1980, 1, "Sports").sales(10.0).ad(3.0).rate(7.0).recession().build(),
            RecordBuilder::new(1981, 5, "Executivecar").sales(4.0).ad(1.0).rate(8.0).recession().build(),
            RecordBuilder::new(2015, 3, "Sports").sales(40.0).ad(9.0).build(),
            RecordBuilder::new(2015, 7, "Supperminicar").sales(20.0).ad(2.0).build(),
            RecordBuilder::new(2016, 7, "Mediumfamilycar").sales(30.0).ad(4.0).build(),
        ])))
    }

    fn view_for(mode: ReportMode, year: Option<i32>) -> DashboardView {
        compute_view(Selection::new(mode, year), &ready())
    }

    #[test]
    fn unset_mode_is_idle_empty_and_disables_year() {
        let view = view_for(ReportMode::Unset, Some(2015));
        assert_eq!(view.state, ViewState::Idle);
        assert!(view.layout.is_empty());
        assert!(view.year_input_disabled);
        assert!(view.notice.is_none());
    }

    #[test]
    fn recession_mode_yields_two_rows_of_two_and_ignores_year() {
        let view = view_for(ReportMode::RecessionPeriod, Some(2015));
        assert_eq!(view.state, ViewState::RecessionView);
        assert!(view.year_input_disabled);
        assert_eq!(view.layout.rows().len(), 2);
        assert_eq!(view.layout.len(), 4);

        let titles: Vec<&str> = view.layout.charts().map(|c| c.title.as_str()).collect();
        assert_eq!(
            titles,
            [
                recession::TITLE_YEARLY_AVG,
                recession::TITLE_AVG_BY_TYPE,
                recession::TITLE_AD_SHARE,
                recession::TITLE_UNEMPLOYMENT,
            ]
        );
        assert_eq!(view.layout, view_for(ReportMode::RecessionPeriod, None).layout);
    }

    #[test]
    fn recession_view_without_recession_rows_keeps_four_empty_charts() {
        let status = DatasetStatus::Ready(Arc::new(dataset(vec![
            RecordBuilder::new(1990, 3, "Sports").sales(12.0).build(),
        ])));
        let rec = compute_view(Selection::new(ReportMode::RecessionPeriod, None), &status);
        assert_eq!(rec.state, ViewState::RecessionView);
        assert_eq!(rec.layout.len(), 4);
        assert!(rec.layout.charts().all(|c| c.series.is_empty()));
        assert!(rec.notice.is_none());

        let yearly = compute_view(Selection::new(ReportMode::Yearly, Some(1990)), &status);
        assert_eq!(yearly.layout.len(), 4);
        assert!(yearly.notice.is_none());
    }

    #[test]
    fn yearly_without_year_is_empty() {
        let view = view_for(ReportMode::Yearly, None);
        assert_eq!(view.state, ViewState::YearlyViewIncomplete);
        assert!(view.layout.is_empty());
        assert!(!view.year_input_disabled);
        assert!(view.notice.is_none());
    }

    #[test]
    fn yearly_2015_scopes_chart_three_to_2015_rows() {
        let view = view_for(ReportMode::Yearly, Some(2015));
        assert_eq!(view.state, ViewState::YearlyViewReady { year: 2015 });

        let chart3 = view.layout.chart(3).unwrap();
        assert!(chart3.title.contains("2015"));
        assert_eq!(chart3.kind, ChartKind::Bar);
        let labels: Vec<String> = chart3.series.iter().map(|p| p.x.label()).collect();
        assert_eq!(labels, ["Sports", "Supperminicar"]);

        let chart4 = view.layout.chart(4).unwrap();
        assert_eq!(chart4.title, yearly::title_ad_spend(2015));
        assert!(chart4.series.iter().all(|p| p.x.label() != "Mediumfamilycar"));

        let chart1 = view.layout.chart(1).unwrap();
        assert_eq!(chart1.series.len(), 4, "chart 1 covers every year");
    }

    #[test]
    fn out_of_range_year_is_incomplete_with_notice() {
        let view = view_for(ReportMode::Yearly, Some(1975));
        assert_eq!(view.state, ViewState::YearlyViewIncomplete);
        assert!(view.layout.is_empty());
        assert_eq!(view.notice, Some(Notice::InvalidYear(1975)));
    }

    #[test]
    fn layout_computation_is_idempotent() {
        let status = ready();
        for selection in [
            Selection::new(ReportMode::RecessionPeriod, None),
            Selection::new(ReportMode::Yearly, Some(2015)),
            Selection::new(ReportMode::Unset, None),
        ] {
            assert_eq!(compute_view(selection, &status), compute_view(selection, &status));
        }
    }

    #[test]
    fn unavailable_dataset_renders_no_data_layout() {
        let status = DatasetStatus::Unavailable("HTTP 503".to_string());
        let view = compute_view(Selection::new(ReportMode::RecessionPeriod, None), &status);
        assert!(view.layout.is_empty());
        assert_eq!(view.notice, Some(Notice::NoData("HTTP 503".to_string())));
    }

    #[test]
    fn loading_dataset_never_computes() {
        let view = compute_view(Selection::new(ReportMode::Yearly, Some(2015)), &DatasetStatus::Loading);
        assert!(view.layout.is_empty());
        assert_eq!(view.notice, Some(Notice::Loading));

        let idle = compute_view(Selection::default(), &DatasetStatus::Loading);
        assert_eq!(idle.notice, None);
    }

    #[test]
    fn reducer_clears_year_when_mode_disables_it() {
        let s = reduce(Selection::default(), SelectionEvent::ReportModeChanged(ReportMode::Yearly));
        let s = reduce(s, SelectionEvent::YearChanged(Some(2001)));
        assert_eq!(s, Selection::new(ReportMode::Yearly, Some(2001)));

        let s = reduce(s, SelectionEvent::ReportModeChanged(ReportMode::RecessionPeriod));
        assert_eq!(s.selected_year, None);

        // Disabled input: year events are dropped.
        let s = reduce(s, SelectionEvent::YearChanged(Some(1999)));
        assert_eq!(s, Selection::new(ReportMode::RecessionPeriod, None));
    }

    #[test]
    fn stale_results_are_discarded() {
        let mut controller = Controller::new(ready());
        let first = controller.dispatch(SelectionEvent::ReportModeChanged(ReportMode::RecessionPeriod));
        let stale = controller.compute(&first);

        let second = controller.dispatch(SelectionEvent::ReportModeChanged(ReportMode::Unset));
        let fresh = controller.compute(&second);

        assert!(controller.complete(fresh));
        assert!(!controller.complete(stale));
        assert_eq!(controller.view().state, ViewState::Idle);
        assert!(controller.view().layout.is_empty());
    }

    #[test]
    fn controller_walks_the_state_machine() {
        let mut controller = Controller::new(DatasetStatus::Loading);
        assert_eq!(controller.view().state, ViewState::Idle);

        let view = controller.handle(SelectionEvent::ReportModeChanged(ReportMode::Yearly));
        assert_eq!(view.notice, Some(Notice::Loading));

        let view = controller.replace_dataset(ready());
        assert_eq!(view.state, ViewState::YearlyViewIncomplete);
        assert!(view.notice.is_none());
        assert!(matches!(controller.dataset_status(), DatasetStatus::Ready(_)));

        let view = controller.handle(SelectionEvent::YearChanged(Some(2016)));
        assert_eq!(view.state, ViewState::YearlyViewReady { year: 2016 });
        assert_eq!(view.layout.len(), 4);

        let view = controller.handle(SelectionEvent::ReportModeChanged(ReportMode::Unset));
        assert_eq!(view.state, ViewState::Idle);
        assert_eq!(controller.selection().selected_year, None);
    }
}
