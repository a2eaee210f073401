//! Search Console weekday trend reporter.
//!
//! Fetches a property's daily clicks and impressions for the trailing
//! 29 days, compares yesterday against the average of the same weekday
//! over the prior four weeks, and pushes a chart plus a short verdict
//! to a Telegram chat.

pub mod analyze;
pub mod auth;
pub mod chart;
pub mod config;
pub mod error;
pub mod job;
pub mod search_console;
pub mod telegram;
pub mod window;
