//! Recession-period pipeline: four charts over rows flagged `Recession = 1`.

use crate::domain::{ChartKind, ChartSpec, Dataset, Record, SeriesPoint, XValue};
use crate::error::DashboardError;

use super::fields::{
    ADVERTISING_EXPENDITURE, AUTOMOBILE_SALES, UNEMPLOYMENT_RATE, VEHICLE_TYPE, YEAR,
};
use super::group::{RateKey, Reducer, group_by};

pub const PIPELINE: &str = "recession";

pub const TITLE_YEARLY_AVG: &str = "Automobile sales over Recession Period";
pub const TITLE_AVG_BY_TYPE: &str = "Vehicles sold by vehicle type";
pub const TITLE_AD_SHARE: &str =
    "Pie chart for total expenditure share by vehicle type during recessions";
pub const TITLE_UNEMPLOYMENT: &str = "Effect of Unemployment Rate on Vehicle Type and Sales";

/// Run the full recession pipeline.
///
/// A table without recession rows still yields four charts, all with empty
/// series. Fails only on an empty table.
pub fn run(dataset: &Dataset) -> Result<[ChartSpec; 4], DashboardError> {
    if dataset.is_empty() {
        return Err(DashboardError::EmptyAggregationGroup { pipeline: PIPELINE });
    }
    let rows = recession_rows(dataset.records());

    Ok([
        yearly_avg_sales(&rows),
        avg_sales_by_vehicle_type(&rows),
        ad_spend_share_by_vehicle_type(&rows),
        sales_by_unemployment_and_type(&rows),
    ])
}

pub fn recession_rows(records: &[Record]) -> Vec<&Record> {
    records.iter().filter(|r| r.recession).collect()
}

/// Mean sales per year, ascending by year.
pub fn yearly_avg_sales(rows: &[&Record]) -> ChartSpec {
    let series = group_by(rows.iter().copied(), |r| r.year, |r| r.automobile_sales, Reducer::Mean)
        .into_iter()
        .map(|(year, mean)| SeriesPoint::new(XValue::Number(f64::from(year)), mean))
        .collect();
    ChartSpec::new(ChartKind::Line, TITLE_YEARLY_AVG, YEAR, AUTOMOBILE_SALES, series)
}

/// Mean sales per vehicle type.
pub fn avg_sales_by_vehicle_type(rows: &[&Record]) -> ChartSpec {
    let series = by_vehicle_type(rows, |r| r.automobile_sales, Reducer::Mean);
    ChartSpec::new(ChartKind::Bar, TITLE_AVG_BY_TYPE, VEHICLE_TYPE, AUTOMOBILE_SALES, series)
}

/// Total advertising spend per vehicle type (pie slices).
pub fn ad_spend_share_by_vehicle_type(rows: &[&Record]) -> ChartSpec {
    let series = by_vehicle_type(rows, |r| r.advertising_expenditure, Reducer::Sum);
    ChartSpec::new(ChartKind::Pie, TITLE_AD_SHARE, VEHICLE_TYPE, ADVERTISING_EXPENDITURE, series)
}

/// Mean sales per (unemployment rate, vehicle type), colored by vehicle type.
pub fn sales_by_unemployment_and_type(rows: &[&Record]) -> ChartSpec {
    let series = group_by(
        rows.iter().copied(),
        |r| (RateKey(r.unemployment_rate), r.vehicle_type.clone()),
        |r| r.automobile_sales,
        Reducer::Mean,
    )
    .into_iter()
    .map(|((rate, vehicle_type), mean)| SeriesPoint::grouped(XValue::Number(rate.0), mean, vehicle_type))
    .collect();

    ChartSpec::new(ChartKind::Bar, TITLE_UNEMPLOYMENT, UNEMPLOYMENT_RATE, AUTOMOBILE_SALES, series)
        .with_labels("Unemployment Rate", "Average Automobile Sales")
        .with_color_field(VEHICLE_TYPE)
}

pub(super) fn by_vehicle_type(
    rows: &[&Record],
    value: impl Fn(&Record) -> f64,
    reducer: Reducer,
) -> Vec<SeriesPoint> {
    group_by(rows.iter().copied(), |r| r.vehicle_type.clone(), value, reducer)
        .into_iter()
        .map(|(vehicle_type, v)| SeriesPoint::new(XValue::Label(vehicle_type), v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::testing::{RecordBuilder, dataset};

    fn mixed_dataset() -> Dataset {
        dataset(vec![
            RecordBuilder::new(1980, 1, "Sports").sales(10.0).ad(100.0).rate(6.0).recession().build(),
            RecordBuilder::new(1980, 2, "Sports").sales(20.0).ad(50.0).rate(6.0).recession().build(),
            RecordBuilder::new(1981, 1, "Executivecar").sales(7.0).ad(0.0).rate(7.5).recession().build(),
            RecordBuilder::new(1982, 1, "Sports").sales(900.0).ad(9000.0).rate(3.0).build(),
            RecordBuilder::new(1982, 2, "Supperminicar").sales(800.0).ad(8000.0).rate(3.0).build(),
        ])
    }

    #[test]
    fn every_series_excludes_non_recession_rows() {
        let charts = run(&mixed_dataset()).unwrap();

        assert_eq!(
            charts[0].series,
            vec![
                SeriesPoint::new(XValue::Number(1980.0), 15.0),
                SeriesPoint::new(XValue::Number(1981.0), 7.0),
            ]
        );

        // Supperminicar only appears in a non-recession year.
        for chart in &charts[1..3] {
            let labels: Vec<String> = chart.series.iter().map(|p| p.x.label()).collect();
            assert_eq!(labels, ["Executivecar", "Sports"], "{}", chart.title);
        }
        assert!(charts[3].series.iter().all(|p| p.x.as_number() != Some(3.0)));
    }

    #[test]
    fn ad_share_keeps_zero_sum_slice() {
        let charts = run(&mixed_dataset()).unwrap();
        let pie = &charts[2];
        assert_eq!(pie.kind, ChartKind::Pie);
        assert_eq!(
            pie.series,
            vec![
                SeriesPoint::new(XValue::Label("Executivecar".to_string()), 0.0),
                SeriesPoint::new(XValue::Label("Sports".to_string()), 150.0),
            ]
        );
    }

    #[test]
    fn unemployment_chart_is_grouped_by_vehicle_type() {
        let charts = run(&mixed_dataset()).unwrap();
        let chart = &charts[3];
        assert_eq!(chart.color_field.as_deref(), Some("Vehicle_Type"));
        assert_eq!(chart.x_label, "Unemployment Rate");
        assert_eq!(chart.y_label, "Average Automobile Sales");
        assert_eq!(
            chart.series,
            vec![
                SeriesPoint::grouped(XValue::Number(6.0), 15.0, "Sports"),
                SeriesPoint::grouped(XValue::Number(7.5), 7.0, "Executivecar"),
            ]
        );
    }

    #[test]
    fn titles_follow_report_order() {
        let charts = run(&mixed_dataset()).unwrap();
        let titles: Vec<&str> = charts.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, [TITLE_YEARLY_AVG, TITLE_AVG_BY_TYPE, TITLE_AD_SHARE, TITLE_UNEMPLOYMENT]);
    }

    #[test]
    fn no_recession_rows_still_yields_four_empty_charts() {
        let ds = dataset(vec![RecordBuilder::new(1990, 3, "Sports").sales(1.0).build()]);
        let charts = run(&ds).unwrap();
        let titles: Vec<&str> = charts.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, [TITLE_YEARLY_AVG, TITLE_AVG_BY_TYPE, TITLE_AD_SHARE, TITLE_UNEMPLOYMENT]);
        assert!(charts.iter().all(|c| c.series.is_empty()));
    }
}
