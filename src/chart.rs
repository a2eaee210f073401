use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use crate::error::{ReportError, ReportResult};
use crate::search_console::DailyMetric;

pub const DEFAULT_CHART_BASE: &str = "https://quickchart.io";

const CHART_WIDTH: u32 = 600;
const CHART_HEIGHT: u32 = 300;

/// Renders the daily series into PNG chart bytes
#[async_trait]
pub trait ChartRenderer: Send + Sync {
    async fn render(&self, series: &[DailyMetric]) -> ReportResult<Vec<u8>>;
}

/// Chart.js line-chart config for the series: clicks on the left axis,
/// impressions on the right, since impressions usually run an order of
/// magnitude higher and would flatten the clicks line on a shared scale.
pub fn chart_config(series: &[DailyMetric]) -> Value {
    let labels: Vec<String> = series
        .iter()
        .map(|m| m.date.format("%m-%d").to_string())
        .collect();
    let clicks: Vec<u64> = series.iter().map(|m| m.clicks).collect();
    let impressions: Vec<u64> = series.iter().map(|m| m.impressions).collect();

    json!({
        "type": "line",
        "data": {
            "labels": labels,
            "datasets": [
                {
                    "label": "Clicks",
                    "data": clicks,
                    "yAxisID": "clicks",
                    "borderColor": "#3366CC",
                    "fill": false
                },
                {
                    "label": "Impressions",
                    "data": impressions,
                    "yAxisID": "impressions",
                    "borderColor": "#DC3912",
                    "fill": false
                }
            ]
        },
        "options": {
            "title": { "display": true, "text": "Clicks vs. Impressions (Last 28 Days)" },
            "legend": { "position": "top" },
            "scales": {
                "xAxes": [
                    { "scaleLabel": { "display": true, "labelString": "Date" } }
                ],
                "yAxes": [
                    {
                        "id": "clicks",
                        "position": "left",
                        "scaleLabel": { "display": true, "labelString": "Clicks" }
                    },
                    {
                        "id": "impressions",
                        "position": "right",
                        "scaleLabel": { "display": true, "labelString": "Impressions" }
                    }
                ]
            }
        }
    })
}

/// Chart renderer backed by the QuickChart HTTP service
#[derive(Debug, Clone)]
pub struct QuickChartRenderer {
    client: Client,
    base_url: String,
}

impl QuickChartRenderer {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_CHART_BASE)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for QuickChartRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChartRenderer for QuickChartRenderer {
    async fn render(&self, series: &[DailyMetric]) -> ReportResult<Vec<u8>> {
        let body = json!({
            "chart": chart_config(series),
            "width": CHART_WIDTH,
            "height": CHART_HEIGHT,
            "format": "png"
        });

        let resp = self
            .client
            .post(format!("{}/chart", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| ReportError::Render(format!("chart service unreachable: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ReportError::Render(format!(
                "chart service returned {status}: {}",
                resp.text().await.unwrap_or_default()
            )));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| ReportError::Render(format!("failed to read chart bytes: {e}")))?;

        Ok(bytes.to_vec())
    }
}
