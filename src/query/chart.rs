//! Bar chart derivation.
//!
//! Which queries get a chart, and from which columns, is a lookup table.
//! A rule whose columns are missing from the result yields no chart.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::db::{QueryResult, Value};

/// How to chart one catalog query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartRule {
    /// Catalog name the rule applies to.
    pub query: &'static str,
    /// Column for the bar categories.
    pub x_field: &'static str,
    /// Columns for the bar heights, first present wins.
    pub y_fields: &'static [&'static str],
    pub title: &'static str,
}

/// Chart rules, keyed by query name.
pub const CHART_RULES: &[ChartRule] = &[
    ChartRule {
        query: "Payment Type Dynamics",
        x_field: "payment_type",
        // Druid names the average tip per side of its self-join.
        y_fields: &["avg_tip", "avg_tip_amount_1"],
        title: "Average Tip by Payment Type",
    },
    ChartRule {
        query: "Busiest Hours",
        x_field: "hour_of_day",
        y_fields: &["total_trips"],
        title: "Busiest Hours of the Week",
    },
];

/// Minimal description of a bar chart plus the column data it plots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub x_field: String,
    pub y_field: String,
    pub title: String,
    /// Category values, in result row order.
    pub x: Vec<Value>,
    /// Bar heights, in result row order.
    pub y: Vec<Value>,
}

impl ChartSpec {
    /// Renders the chart as a Plotly figure (`data` + `layout`).
    pub fn to_plotly(&self) -> serde_json::Value {
        json!({
            "data": [{
                "type": "bar",
                "x": self.x,
                "y": self.y,
            }],
            "layout": {
                "title": { "text": self.title },
                "xaxis": { "title": { "text": self.x_field } },
                "yaxis": { "title": { "text": self.y_field } },
            },
        })
    }
}

/// Returns the chart rule for a query name, if any.
pub fn rule_for(query_name: &str) -> Option<&'static ChartRule> {
    CHART_RULES.iter().find(|rule| rule.query == query_name)
}

/// Builds the chart for a query result, or `None` when the query has no rule
/// or the result lacks the rule's columns.
pub fn derive_chart(query_name: &str, result: &QueryResult) -> Option<ChartSpec> {
    let rule = rule_for(query_name)?;
    rule.apply(result)
}

impl ChartRule {
    /// Applies the rule to a result.
    pub fn apply(&self, result: &QueryResult) -> Option<ChartSpec> {
        let x_index = result.column_index(self.x_field)?;
        let (y_field, y_index) = self
            .y_fields
            .iter()
            .find_map(|field| result.column_index(field).map(|index| (*field, index)))?;

        let column = |index: usize| -> Vec<Value> {
            result
                .rows
                .iter()
                .map(|row| row.get(index).cloned().unwrap_or_default())
                .collect()
        };

        Some(ChartSpec {
            x_field: self.x_field.to_string(),
            y_field: y_field.to_string(),
            title: self.title.to_string(),
            x: column(x_index),
            y: column(y_index),
        })
    }
}
