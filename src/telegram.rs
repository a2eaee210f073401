use async_trait::async_trait;
use reqwest::multipart;
use reqwest::Client;

use crate::analyze::{Band, TrendResult};
use crate::error::{ReportError, ReportResult};
use crate::search_console::TrafficType;

pub const DEFAULT_TELEGRAM_BASE: &str = "https://api.telegram.org";

/// Build the notification text for a computed trend.
///
/// Percentages are rounded to the nearest whole number (halves round away
/// from zero); the DOWN bands report the absolute value since the verb
/// already carries the direction.
#[allow(clippy::cast_possible_truncation)]
pub fn format_message(
    trend: &TrendResult,
    site_label: &str,
    traffic: TrafficType,
    emoji: &str,
    weekday_label: &str,
) -> String {
    let pct = (trend.percent_change * 100.0).round() as i64;
    let phrase = match trend.band {
        Band::Up => format!("rose by *{pct}%* 🟢"),
        Band::Flat => format!("held steady (*{pct}%*) ⏹️"),
        Band::Down => format!("fell by *{}%* 🔴", pct.abs()),
        Band::SevereDown => format!("fell by *{}%* ⚠️", pct.abs()),
    };

    format!(
        "*[{}]* {emoji} Clicks for *{site_label}* {phrase} compared to the average of the last four *{weekday_label}*.",
        traffic.tag()
    )
}

/// Delivers a finished report to the notification channel
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Send `text` with `image` as a captioned photo when one is available,
    /// falling back to a plain text message otherwise.
    async fn deliver(&self, text: &str, image: Option<Vec<u8>>) -> ReportResult<()>;
}

/// Telegram Bot API transport
#[derive(Debug, Clone)]
pub struct TelegramSink {
    client: Client,
    base_url: String,
    bot_token: String,
    chat_id: String,
}

impl TelegramSink {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_TELEGRAM_BASE, bot_token, chat_id)
    }

    pub fn with_base_url(
        base_url: impl Into<String>,
        bot_token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.base_url, self.bot_token)
    }

    async fn send_photo(&self, caption: &str, image: Vec<u8>) -> ReportResult<()> {
        let photo = multipart::Part::bytes(image)
            .file_name("trend.png")
            .mime_str("image/png")
            .map_err(|e| ReportError::Delivery(format!("invalid photo part: {e}")))?;

        let form = multipart::Form::new()
            .text("chat_id", self.chat_id.clone())
            .text("caption", caption.to_string())
            .text("parse_mode", "Markdown")
            .part("photo", photo);

        let resp = self
            .client
            .post(self.method_url("sendPhoto"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ReportError::Delivery(format!("sendPhoto failed: {e}")))?;

        check_response(resp).await
    }

    async fn send_text(&self, text: &str) -> ReportResult<()> {
        let resp = self
            .client
            .get(self.method_url("sendMessage"))
            .query(&[
                ("chat_id", self.chat_id.as_str()),
                ("text", text),
                ("parse_mode", "Markdown"),
            ])
            .send()
            .await
            .map_err(|e| ReportError::Delivery(format!("sendMessage failed: {e}")))?;

        check_response(resp).await
    }
}

async fn check_response(resp: reqwest::Response) -> ReportResult<()> {
    let status = resp.status();
    if !status.is_success() {
        return Err(ReportError::Delivery(format!(
            "Telegram returned {status}: {}",
            resp.text().await.unwrap_or_default()
        )));
    }
    Ok(())
}

#[async_trait]
impl MessageSink for TelegramSink {
    async fn deliver(&self, text: &str, image: Option<Vec<u8>>) -> ReportResult<()> {
        match image {
            Some(bytes) => self.send_photo(text, bytes).await,
            None => self.send_text(text).await,
        }
    }
}
