//! Aggregation engine.
//!
//! Two independent, pure pipelines turn the read-only dataset into chart specs:
//!
//! - `recession`: four charts over recession-flagged rows
//! - `yearly`: two whole-range trends plus two charts for one selected year
//!
//! Nothing here caches or mutates; every call builds fresh series.

pub mod group;
pub mod recession;
pub mod yearly;

/// Dataset column names, used as chart field names.
pub mod fields {
    pub const YEAR: &str = "Year";
    pub const MONTH: &str = "Month";
    pub const VEHICLE_TYPE: &str = "Vehicle_Type";
    pub const AUTOMOBILE_SALES: &str = "Automobile_Sales";
    pub const ADVERTISING_EXPENDITURE: &str = "Advertising_Expenditure";
    pub const UNEMPLOYMENT_RATE: &str = "unemployment_rate";
    pub const RECESSION: &str = "Recession";
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::domain::{Dataset, MONTHS, Record};

    /// Small builder so tests only spell out the fields they care about.
    pub struct RecordBuilder(Record);

    impl RecordBuilder {
        pub fn new(year: i32, month: usize, vehicle_type: &str) -> Self {
            Self(Record {
                year,
                month: MONTHS[month - 1],
                vehicle_type: vehicle_type.to_string(),
                automobile_sales: 0.0,
                advertising_expenditure: 0.0,
                unemployment_rate: 5.0,
                recession: false,
            })
        }

        pub fn sales(mut self, v: f64) -> Self {
            self.0.automobile_sales = v;
            self
        }

        pub fn ad(mut self, v: f64) -> Self {
            self.0.advertising_expenditure = v;
            self
        }

        pub fn rate(mut self, v: f64) -> Self {
            self.0.unemployment_rate = v;
            self
        }

        pub fn recession(mut self) -> Self {
            self.0.recession = true;
            self
        }

        pub fn build(self) -> Record {
            self.0
        }
    }

    pub fn record(year: i32, month: usize, vehicle_type: &str, sales: f64) -> Record {
        RecordBuilder::new(year, month, vehicle_type).sales(sales).build()
    }

    pub fn dataset(records: Vec<Record>) -> Dataset {
        Dataset::from_records(records, "test").expect("test dataset must not be empty")
    }
}
