use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ReportError, ReportResult};
use crate::window::ReportWindow;

pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/webmasters/v3";

/// Traffic surface the analytics query is scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficType {
    Web,
    Discover,
}

impl TrafficType {
    /// Lowercase value sent to the API
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Discover => "discover",
        }
    }

    /// Uppercase tag used in the notification text
    pub fn tag(self) -> &'static str {
        match self {
            Self::Web => "WEB",
            Self::Discover => "DISCOVER",
        }
    }
}

impl fmt::Display for TrafficType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One day of search metrics, as reported upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyMetric {
    pub date: NaiveDate,
    pub clicks: u64,
    pub impressions: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    start_date: String,
    end_date: String,
    dimensions: [&'a str; 1],
    search_type: &'a str,
    // "all" asks for fresh rows that upstream may still revise
    data_state: &'a str,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    rows: Vec<ApiRow>,
}

#[derive(Debug, Deserialize)]
struct ApiRow {
    keys: Vec<String>,
    // the API reports counts as JSON doubles; absent values mean zero
    #[serde(default)]
    clicks: f64,
    #[serde(default)]
    impressions: f64,
}

/// Fetches the daily metric series for a property over a date window.
/// Implementations make no ordering guarantee on the returned rows.
#[async_trait]
pub trait MetricsFetcher: Send + Sync {
    async fn fetch(
        &self,
        token: &str,
        site_url: &str,
        window: &ReportWindow,
        traffic: TrafficType,
    ) -> ReportResult<Vec<DailyMetric>>;
}

/// Search Analytics query client for the Search Console API
#[derive(Debug, Clone)]
pub struct SearchConsoleClient {
    client: Client,
    base_url: String,
}

impl SearchConsoleClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_API_BASE)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for SearchConsoleClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetricsFetcher for SearchConsoleClient {
    async fn fetch(
        &self,
        token: &str,
        site_url: &str,
        window: &ReportWindow,
        traffic: TrafficType,
    ) -> ReportResult<Vec<DailyMetric>> {
        let url = format!(
            "{}/sites/{}/searchAnalytics/query",
            self.base_url,
            urlencoding::encode(site_url)
        );

        let body = QueryRequest {
            start_date: window.start_date.format("%Y-%m-%d").to_string(),
            end_date: window.end_date.format("%Y-%m-%d").to_string(),
            dimensions: ["date"],
            search_type: traffic.as_str(),
            data_state: "all",
        };

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {token}"))
            .json(&body)
            .send()
            .await
            .map_err(|e| ReportError::Upstream {
                status: 0,
                body: format!("request failed: {e}"),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ReportError::Upstream {
                status: status.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            });
        }

        let parsed: QueryResponse = resp.json().await.map_err(|e| ReportError::Upstream {
            status: status.as_u16(),
            body: format!("unparseable response body: {e}"),
        })?;

        parsed.rows.into_iter().map(parse_row).collect()
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_row(row: ApiRow) -> ReportResult<DailyMetric> {
    let date_key = row.keys.first().ok_or_else(|| ReportError::Upstream {
        status: 200,
        body: "row without a date key".to_string(),
    })?;

    let date =
        NaiveDate::parse_from_str(date_key, "%Y-%m-%d").map_err(|e| ReportError::Upstream {
            status: 200,
            body: format!("bad date key {date_key:?}: {e}"),
        })?;

    Ok(DailyMetric {
        date,
        clicks: row.clicks.max(0.0).round() as u64,
        impressions: row.impressions.max(0.0).round() as u64,
    })
}
