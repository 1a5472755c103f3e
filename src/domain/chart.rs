//! Chart specs and layouts: the renderer-independent output of the controller.

use serde::{Deserialize, Serialize};

/// Which mark a renderer should draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
}

/// X coordinate (or category) of one series point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum XValue {
    Number(f64),
    Label(String),
}

impl XValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            XValue::Number(v) => Some(*v),
            XValue::Label(_) => None,
        }
    }

    pub fn label(&self) -> String {
        match self {
            XValue::Number(v) if v.fract() == 0.0 => format!("{v:.0}"),
            XValue::Number(v) => format!("{v}"),
            XValue::Label(s) => s.clone(),
        }
    }
}

/// One `(x, y)` pair, or an `(x, y, group)` triple for grouped charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub x: XValue,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl SeriesPoint {
    pub fn new(x: XValue, y: f64) -> Self {
        Self { x, y, group: None }
    }

    pub fn grouped(x: XValue, y: f64, group: impl Into<String>) -> Self {
        Self {
            x,
            y,
            group: Some(group.into()),
        }
    }
}

/// Declarative description of one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    /// Dataset column plotted on the x axis (or the pie's names).
    pub x_field: String,
    /// Dataset column plotted on the y axis (or the pie's values).
    pub y_field: String,
    pub x_label: String,
    pub y_label: String,
    /// Column whose values split the series into colored groups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_field: Option<String>,
    pub series: Vec<SeriesPoint>,
}

impl ChartSpec {
    pub fn new(
        kind: ChartKind,
        title: impl Into<String>,
        x_field: &str,
        y_field: &str,
        series: Vec<SeriesPoint>,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            x_field: x_field.to_string(),
            y_field: y_field.to_string(),
            x_label: x_field.to_string(),
            y_label: y_field.to_string(),
            color_field: None,
            series,
        }
    }

    pub fn with_labels(mut self, x_label: &str, y_label: &str) -> Self {
        self.x_label = x_label.to_string();
        self.y_label = y_label.to_string();
        self
    }

    pub fn with_color_field(mut self, field: &str) -> Self {
        self.color_field = Some(field.to_string());
        self
    }

    /// Distinct group keys in first-seen order.
    pub fn groups(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for p in &self.series {
            if let Some(g) = p.group.as_deref() {
                if !out.contains(&g) {
                    out.push(g);
                }
            }
        }
        out
    }
}

/// Charts arranged in rows of two. Either empty or exactly two rows.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartLayout {
    rows: Vec<[ChartSpec; 2]>,
}

impl ChartLayout {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Lay four charts out as `[[c1, c2], [c3, c4]]`.
    pub fn grid(charts: [ChartSpec; 4]) -> Self {
        let [c1, c2, c3, c4] = charts;
        Self {
            rows: vec![[c1, c2], [c3, c4]],
        }
    }

    pub fn rows(&self) -> &[[ChartSpec; 2]] {
        &self.rows
    }

    pub fn charts(&self) -> impl Iterator<Item = &ChartSpec> {
        self.rows.iter().flat_map(|row| row.iter())
    }

    pub fn len(&self) -> usize {
        self.rows.len() * 2
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Chart by 1-based position (reading order).
    pub fn chart(&self, position: usize) -> Option<&ChartSpec> {
        position.checked_sub(1).and_then(|i| self.charts().nth(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(title: &str) -> ChartSpec {
        ChartSpec::new(ChartKind::Bar, title, "Vehicle_Type", "Automobile_Sales", Vec::new())
    }

    #[test]
    fn grid_is_two_rows_of_two_in_reading_order() {
        let layout = ChartLayout::grid([spec("a"), spec("b"), spec("c"), spec("d")]);
        assert_eq!(layout.rows().len(), 2);
        assert_eq!(layout.len(), 4);
        let titles: Vec<&str> = layout.charts().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, ["a", "b", "c", "d"]);
        assert_eq!(layout.chart(3).map(|c| c.title.as_str()), Some("c"));
        assert!(layout.chart(0).is_none());
        assert!(ChartLayout::empty().is_empty());
    }

    #[test]
    fn groups_keep_first_seen_order() {
        let mut chart = spec("g");
        chart.series = vec![
            SeriesPoint::grouped(XValue::Number(5.0), 1.0, "Sports"),
            SeriesPoint::grouped(XValue::Number(5.0), 2.0, "Executivecar"),
            SeriesPoint::grouped(XValue::Number(6.0), 3.0, "Sports"),
        ];
        assert_eq!(chart.groups(), ["Sports", "Executivecar"]);
    }

    #[test]
    fn x_labels_drop_integral_fraction() {
        assert_eq!(XValue::Number(2015.0).label(), "2015");
        assert_eq!(XValue::Number(5.5).label(), "5.5");
        assert_eq!(XValue::Label("Jan".to_string()).label(), "Jan");
    }
}
