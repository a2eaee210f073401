use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::analyze::{analyze, TrendResult};
use crate::auth::TokenProvider;
use crate::chart::ChartRenderer;
use crate::config::Config;
use crate::error::ReportResult;
use crate::search_console::MetricsFetcher;
use crate::telegram::{format_message, MessageSink};
use crate::window::compute_window;

/// The full report pipeline, wired over trait objects so every external
/// collaborator can be swapped for a test double.
pub struct ReportJob<'a> {
    config: &'a Config,
    tokens: &'a dyn TokenProvider,
    metrics: &'a dyn MetricsFetcher,
    renderer: &'a dyn ChartRenderer,
    sink: &'a dyn MessageSink,
}

impl<'a> ReportJob<'a> {
    pub fn new(
        config: &'a Config,
        tokens: &'a dyn TokenProvider,
        metrics: &'a dyn MetricsFetcher,
        renderer: &'a dyn ChartRenderer,
        sink: &'a dyn MessageSink,
    ) -> Self {
        Self {
            config,
            tokens,
            metrics,
            renderer,
            sink,
        }
    }

    /// Run the five stages in order. No stage failure is recovered here;
    /// the first error aborts the run and surfaces to the caller.
    pub async fn run(&self, now: DateTime<Utc>) -> ReportResult<TrendResult> {
        let tz = self.config.timezone()?;
        let window = compute_window(now, tz);
        info!(
            start = %window.start_date,
            end = %window.end_date,
            "generating report for window"
        );

        let token = self.tokens.fetch_token().await?;

        let series = self
            .metrics
            .fetch(
                &token,
                &self.config.site_url,
                &window,
                self.config.traffic_type,
            )
            .await?;
        info!(rows = series.len(), "fetched daily metrics");

        let trend = analyze(series.clone())?;
        info!(
            clicks = trend.current_clicks,
            reference_average = trend.reference_average,
            percent_change = trend.percent_change,
            "computed weekday trend"
        );

        let message = format_message(
            &trend,
            &self.config.site_name,
            self.config.traffic_type,
            &self.config.emoji,
            window.weekday_label,
        );

        let mut chart_series = series;
        chart_series.sort_by_key(|m| m.date);
        let image = self.renderer.render(&chart_series).await?;

        self.sink.deliver(&message, Some(image)).await?;
        info!("report delivered");

        Ok(trend)
    }

    /// Run the pipeline and, when `notify_on_failure` is set, push a
    /// best-effort plain-text notice to the chat before surfacing the
    /// error. Errors delivering the notice itself are logged and swallowed
    /// so the run's own failure decides the outcome.
    pub async fn run_notifying(&self, now: DateTime<Utc>) -> ReportResult<TrendResult> {
        match self.run(now).await {
            Ok(trend) => Ok(trend),
            Err(e) => {
                if self.config.notify_on_failure {
                    let notice =
                        format!("search-pulse run for {} failed: {e}", self.config.site_name);
                    if let Err(notice_err) = self.sink.deliver(&notice, None).await {
                        warn!("failed to deliver failure notice: {notice_err}");
                    }
                }
                Err(e)
            }
        }
    }
}
