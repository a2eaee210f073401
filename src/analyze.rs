use crate::error::{ReportError, ReportResult};
use crate::search_console::DailyMetric;

/// Indices back from the last row that hit the same weekday
const REFERENCE_OFFSETS: [usize; 4] = [7, 14, 21, 28];

/// Rows needed: yesterday plus a reference point 28 days earlier
pub const MIN_ROWS: usize = 29;

/// Narrative classification of the week-over-week change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Up,
    Flat,
    Down,
    SevereDown,
}

impl Band {
    /// Classify a fractional change. Thresholds are evaluated in order,
    /// first match wins: anything within ±0.5% counts as flat, and drops
    /// of 50% or more get their own severity so they stand out.
    pub fn classify(percent_change: f64) -> Self {
        if percent_change >= 0.005 {
            Self::Up
        } else if percent_change > -0.005 {
            Self::Flat
        } else if percent_change > -0.5 {
            Self::Down
        } else {
            Self::SevereDown
        }
    }
}

/// Yesterday's clicks compared against the same weekday over four weeks
#[derive(Debug, Clone, PartialEq)]
pub struct TrendResult {
    pub current_clicks: u64,
    pub reference_average: f64,
    pub percent_change: f64,
    pub band: Band,
}

/// Compare the newest day against the average of the four prior same-weekday
/// values. Input row order is not trusted; the series is sorted by date
/// before indexing, so the last row is yesterday and the reference rows sit
/// exactly 7, 14, 21 and 28 positions earlier.
#[allow(clippy::cast_precision_loss)]
pub fn analyze(mut series: Vec<DailyMetric>) -> ReportResult<TrendResult> {
    if series.len() < MIN_ROWS {
        return Err(ReportError::InsufficientData { rows: series.len() });
    }

    series.sort_by_key(|m| m.date);

    let last_index = series.len() - 1;
    let current_clicks = series[last_index].clicks;

    let reference_sum: u64 = REFERENCE_OFFSETS
        .iter()
        .map(|offset| series[last_index - offset].clicks)
        .sum();
    let reference_average = reference_sum as f64 / REFERENCE_OFFSETS.len() as f64;

    // No baseline means no change, not a division error. The difference
    // quotient keeps exact boundary values (e.g. 201 vs 200 -> 0.005)
    // landing on the classification thresholds instead of one ulp below.
    let percent_change = if reference_average == 0.0 {
        0.0
    } else {
        (current_clicks as f64 - reference_average) / reference_average
    };

    Ok(TrendResult {
        current_clicks,
        reference_average,
        percent_change,
        band: Band::classify(percent_change),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_boundaries() {
        assert_eq!(Band::classify(0.005), Band::Up);
        assert_eq!(Band::classify(0.0049), Band::Flat);
        assert_eq!(Band::classify(0.0), Band::Flat);
        assert_eq!(Band::classify(-0.0049), Band::Flat);
        assert_eq!(Band::classify(-0.005), Band::Down);
        assert_eq!(Band::classify(-0.4999), Band::Down);
        assert_eq!(Band::classify(-0.5), Band::SevereDown);
        assert_eq!(Band::classify(-1.0), Band::SevereDown);
    }
}
