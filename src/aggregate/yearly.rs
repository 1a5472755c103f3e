//! Yearly pipeline: two whole-range trends plus a breakdown for one year.

use crate::domain::{ChartKind, ChartSpec, Dataset, Record, SeriesPoint, XValue, month_abbrev};
use crate::error::DashboardError;

use super::fields::{ADVERTISING_EXPENDITURE, AUTOMOBILE_SALES, MONTH, VEHICLE_TYPE, YEAR};
use super::group::{Reducer, group_by};
use super::recession::by_vehicle_type;

pub const PIPELINE: &str = "yearly";

pub const TITLE_YEARLY_AVG: &str = "Average Yearly Automobile Sales";
pub const TITLE_MONTHLY_TOTAL: &str = "Total Monthly Automobile Sales";

pub fn title_avg_by_type(year: i32) -> String {
    format!("Average Vehicles Sold by Vehicle Type in {year}")
}

pub fn title_ad_spend(year: i32) -> String {
    format!("Total Ad Expenditure per Vehicle Type in {year}")
}

/// Run the full yearly pipeline for `year`.
///
/// Charts 1 and 2 always cover the whole dataset; charts 3 and 4 only the
/// rows of `year` (possibly none, which yields empty series).
pub fn run(dataset: &Dataset, year: i32) -> Result<[ChartSpec; 4], DashboardError> {
    let all: Vec<&Record> = dataset.records().iter().collect();
    if all.is_empty() {
        return Err(DashboardError::EmptyAggregationGroup { pipeline: PIPELINE });
    }
    let year_rows = rows_for_year(dataset.records(), year);

    Ok([
        yearly_avg_sales_all_years(&all),
        monthly_total_sales(&all),
        avg_sales_by_vehicle_type_for_year(&year_rows, year),
        ad_spend_by_vehicle_type_for_year(&year_rows, year),
    ])
}

pub fn rows_for_year(records: &[Record], year: i32) -> Vec<&Record> {
    records.iter().filter(|r| r.year == year).collect()
}

/// Mean sales per year over every row, ascending by year.
pub fn yearly_avg_sales_all_years(rows: &[&Record]) -> ChartSpec {
    let series = group_by(rows.iter().copied(), |r| r.year, |r| r.automobile_sales, Reducer::Mean)
        .into_iter()
        .map(|(year, mean)| SeriesPoint::new(XValue::Number(f64::from(year)), mean))
        .collect();
    ChartSpec::new(ChartKind::Line, TITLE_YEARLY_AVG, YEAR, AUTOMOBILE_SALES, series)
}

/// Total sales per calendar month, January first.
pub fn monthly_total_sales(rows: &[&Record]) -> ChartSpec {
    let series = group_by(
        rows.iter().copied(),
        |r| r.month.number_from_month(),
        |r| r.automobile_sales,
        Reducer::Sum,
    )
    .into_iter()
    .filter_map(|(number, total)| {
        let month = crate::domain::MONTHS.get(number.checked_sub(1)? as usize)?;
        Some(SeriesPoint::new(XValue::Label(month_abbrev(*month).to_string()), total))
    })
    .collect();
    ChartSpec::new(ChartKind::Line, TITLE_MONTHLY_TOTAL, MONTH, AUTOMOBILE_SALES, series)
}

/// Mean sales per vehicle type within `year`.
pub fn avg_sales_by_vehicle_type_for_year(year_rows: &[&Record], year: i32) -> ChartSpec {
    let series = by_vehicle_type(year_rows, |r| r.automobile_sales, Reducer::Mean);
    ChartSpec::new(ChartKind::Bar, title_avg_by_type(year), VEHICLE_TYPE, AUTOMOBILE_SALES, series)
}

/// Total advertising spend per vehicle type within `year` (pie slices).
pub fn ad_spend_by_vehicle_type_for_year(year_rows: &[&Record], year: i32) -> ChartSpec {
    let series = by_vehicle_type(year_rows, |r| r.advertising_expenditure, Reducer::Sum);
    ChartSpec::new(ChartKind::Pie, title_ad_spend(year), VEHICLE_TYPE, ADVERTISING_EXPENDITURE, series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::testing::{RecordBuilder, dataset};

    fn three_year_dataset() -> Dataset {
        dataset(vec![
            RecordBuilder::new(2014, 12, "Sports").sales(100.0).ad(10.0).build(),
            RecordBuilder::new(2015, 2, "Sports").sales(30.0).ad(5.0).build(),
            RecordBuilder::new(2015, 9, "Sports").sales(10.0).ad(7.0).build(),
            RecordBuilder::new(2015, 4, "Executivecar").sales(50.0).ad(1.0).build(),
            RecordBuilder::new(2016, 1, "Mediumfamilycar").sales(60.0).ad(3.0).recession().build(),
        ])
    }

    #[test]
    fn year_scoped_charts_only_use_selected_year() {
        let charts = run(&three_year_dataset(), 2015).unwrap();

        assert!(charts[2].title.contains("2015"));
        assert!(charts[3].title.contains("2015"));
        assert_eq!(
            charts[2].series,
            vec![
                SeriesPoint::new(XValue::Label("Executivecar".to_string()), 50.0),
                SeriesPoint::new(XValue::Label("Sports".to_string()), 20.0),
            ]
        );
        assert_eq!(
            charts[3].series,
            vec![
                SeriesPoint::new(XValue::Label("Executivecar".to_string()), 1.0),
                SeriesPoint::new(XValue::Label("Sports".to_string()), 12.0),
            ]
        );
    }

    #[test]
    fn vehicle_type_absent_from_year_is_omitted_not_zero() {
        let charts = run(&three_year_dataset(), 2015).unwrap();
        for chart in &charts[2..] {
            assert!(
                chart.series.iter().all(|p| p.x.label() != "Mediumfamilycar"),
                "{}",
                chart.title
            );
        }
    }

    #[test]
    fn whole_range_charts_ignore_selected_year() {
        let ds = three_year_dataset();
        let a = run(&ds, 2015).unwrap();
        let b = run(&ds, 1999).unwrap();
        assert_eq!(a[0], b[0]);
        assert_eq!(a[1], b[1]);

        let years: Vec<String> = a[0].series.iter().map(|p| p.x.label()).collect();
        assert_eq!(years, ["2014", "2015", "2016"]);
        assert_eq!(a[0].series[1].y, 30.0);

        // A year with no rows still yields four charts, the scoped ones empty.
        assert!(b[2].series.is_empty());
        assert!(b[3].series.is_empty());
    }

    #[test]
    fn months_follow_calendar_order() {
        let charts = run(&three_year_dataset(), 2015).unwrap();
        let months: Vec<String> = charts[1].series.iter().map(|p| p.x.label()).collect();
        assert_eq!(months, ["Jan", "Feb", "Apr", "Sep", "Dec"]);
        let totals: Vec<f64> = charts[1].series.iter().map(|p| p.y).collect();
        assert_eq!(totals, vec![60.0, 30.0, 50.0, 10.0, 100.0]);
    }
}
