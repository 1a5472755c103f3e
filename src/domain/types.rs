//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - produced by the ingest layer and shared read-only across recomputations
//! - driven by any front-end (TUI, CLI report, tests) without a UI harness
//! - exported to JSON for other renderers

use std::ops::RangeInclusive;

use chrono::Month;
use serde::{Deserialize, Serialize};

use crate::error::DashboardError;

/// First year covered by the dataset and offered by the year selector.
pub const YEAR_MIN: i32 = 1980;
/// Last year covered by the dataset and offered by the year selector.
pub const YEAR_MAX: i32 = 2023;

/// Every year the year selector offers, in display order.
pub fn year_options() -> RangeInclusive<i32> {
    YEAR_MIN..=YEAR_MAX
}

/// One row of the sales dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub year: i32,
    pub month: Month,
    pub vehicle_type: String,
    pub automobile_sales: f64,
    pub advertising_expenditure: f64,
    pub unemployment_rate: f64,
    pub recession: bool,
}

/// Top-level report selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportMode {
    /// Nothing selected yet.
    #[default]
    Unset,
    /// Whole-range trends plus a breakdown for one selected year.
    Yearly,
    /// Aggregates over recession-flagged rows only.
    RecessionPeriod,
}

impl ReportMode {
    pub const ALL: [ReportMode; 3] = [ReportMode::Unset, ReportMode::Yearly, ReportMode::RecessionPeriod];

    /// Map a raw selector value onto a mode.
    ///
    /// `None` is the cleared dropdown. Short names (`yearly`, `recession`)
    /// and the dropdown labels (`Yearly Statistics`, `Recession Period
    /// Statistics`) are accepted, ignoring case.
    pub fn parse_selector(value: Option<&str>) -> Result<Self, DashboardError> {
        let Some(raw) = value else {
            return Ok(ReportMode::Unset);
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "yearly" | "yearly statistics" => Ok(ReportMode::Yearly),
            "recession" | "recessionperiod" | "recession_period" | "recession period statistics" => {
                Ok(ReportMode::RecessionPeriod)
            }
            _ => Err(DashboardError::UnknownReportMode(raw.trim().to_string())),
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ReportMode::Unset => "Select a report type",
            ReportMode::Yearly => "Yearly Statistics",
            ReportMode::RecessionPeriod => "Recession Period Statistics",
        }
    }

    /// Cycle order used by the TUI selector.
    pub fn next(self) -> Self {
        match self {
            ReportMode::Unset => ReportMode::Yearly,
            ReportMode::Yearly => ReportMode::RecessionPeriod,
            ReportMode::RecessionPeriod => ReportMode::Unset,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ReportMode::Unset => ReportMode::RecessionPeriod,
            ReportMode::Yearly => ReportMode::Unset,
            ReportMode::RecessionPeriod => ReportMode::Yearly,
        }
    }
}

/// The two user-controlled inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    pub report_mode: ReportMode,
    pub selected_year: Option<i32>,
}

impl Selection {
    pub fn new(report_mode: ReportMode, selected_year: Option<i32>) -> Self {
        Self {
            report_mode,
            selected_year,
        }
    }

    pub fn year_input_disabled(&self) -> bool {
        year_input_disabled(self.report_mode)
    }
}

/// Enablement rule for the year selector: only Yearly reports take a year.
pub fn year_input_disabled(mode: ReportMode) -> bool {
    mode != ReportMode::Yearly
}

/// Calendar order.
pub const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// Three-letter label used on month axes.
pub fn month_abbrev(month: Month) -> &'static str {
    &month.name()[..3]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_input_enabled_only_for_yearly() {
        for mode in ReportMode::ALL {
            assert_eq!(year_input_disabled(mode), mode != ReportMode::Yearly, "{mode:?}");
        }
        assert!(Selection::default().year_input_disabled());
    }

    #[test]
    fn parse_selector_accepts_short_names_and_dropdown_labels() {
        assert_eq!(ReportMode::parse_selector(None).unwrap(), ReportMode::Unset);
        assert_eq!(ReportMode::parse_selector(Some("Yearly")).unwrap(), ReportMode::Yearly);
        assert_eq!(
            ReportMode::parse_selector(Some("Recession Period Statistics")).unwrap(),
            ReportMode::RecessionPeriod
        );
        assert_eq!(ReportMode::parse_selector(Some("recession")).unwrap(), ReportMode::RecessionPeriod);
        assert_eq!(ReportMode::parse_selector(Some("YEARLY")).unwrap(), ReportMode::Yearly);
        assert!(ReportMode::parse_selector(Some("unset")).is_err());
        assert_eq!(
            ReportMode::parse_selector(Some("Monthly")),
            Err(DashboardError::UnknownReportMode("Monthly".to_string()))
        );
    }

    #[test]
    fn mode_cycle_visits_every_mode() {
        let mut mode = ReportMode::Unset;
        for _ in 0..3 {
            assert_eq!(mode.next().prev(), mode);
            mode = mode.next();
        }
        assert_eq!(mode, ReportMode::Unset);
    }

    #[test]
    fn year_options_cover_dataset_range() {
        let years: Vec<i32> = year_options().collect();
        assert_eq!(years.len(), 44);
        assert_eq!(years.first(), Some(&1980));
        assert_eq!(years.last(), Some(&2023));
        assert_eq!(month_abbrev(Month::September), "Sep");
    }
}
