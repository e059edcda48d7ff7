use anyhow::Result;
use async_trait::async_trait;

use crate::params::StatsField;
use crate::stats::StatsReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Pie,
    Bar,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSlice {
    pub label: String,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub slices: Vec<ChartSlice>,
    pub captions: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait ChartRenderer: Send + Sync {
    async fn render(&self, chart: &ChartSpec) -> Result<RenderedChart>;
}

impl ChartSpec {
    pub fn from_report(by: StatsField, report: &StatsReport) -> Self {
        let (kind, x_label, y_label) = match by {
            StatsField::Genres => (
                ChartKind::Bar,
                Some("Genres".to_string()),
                Some("Percentage".to_string()),
            ),
            _ => (ChartKind::Pie, None, None),
        };
        let slices = report
            .values
            .0
            .iter()
            .map(|b| ChartSlice {
                label: format!("{} ({}%)", b.label, b.percent),
                percent: b.percent,
            })
            .collect();
        Self {
            kind,
            title: format!(
                "Percentage distribution of {} of all TV shows in the database",
                by.as_str()
            ),
            x_label,
            y_label,
            slices,
            captions: vec![
                format!("Total number of TV shows in database: {}", report.total),
                format!(
                    "Total number of TV shows updated in the past 24 hours: {}",
                    report.total_updated
                ),
            ],
        }
    }
}
