// 9.0: performance statistics over a portfolio value series.
// every metric is an Option: None means not enough data, never NaN or inf.
// callers pass (timestamp, value) points; each function sorts a local copy
// by time and leaves the input untouched.

use crate::types::{Cash, Timestamp};
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// One observation of total portfolio value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuePoint {
    pub timestamp: Timestamp,
    pub value: Cash,
}

impl ValuePoint {
    pub fn new(timestamp: Timestamp, value: Cash) -> Self {
        Self { timestamp, value }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawdownWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub total_return: Option<Decimal>,
    pub annualized_return: Option<Decimal>,
    pub sharpe_ratio: Option<Decimal>,
    pub win_rate: Option<Decimal>,
    pub max_drawdown: Option<Decimal>,
    pub drawdown_window: Option<DrawdownWindow>,
}

fn sorted_by_time(series: &[ValuePoint]) -> Vec<ValuePoint> {
    let mut points = series.to_vec();
    points.sort_by_key(|p| p.timestamp);
    points
}

// 9.1: growth of the whole series, as a percentage of the initial value.
pub fn total_return(series: &[ValuePoint]) -> Option<Decimal> {
    if series.len() < 2 {
        return None;
    }
    let points = sorted_by_time(series);
    let initial = points[0].value.value();
    let last = points[points.len() - 1].value.value();
    if initial.is_zero() {
        return None;
    }
    Some((last - initial) / initial * dec!(100))
}

// compounds the total return over the calendar span: ((1 + tr)^(365/days) - 1).
// days is the whole-day span; anything under a full day has no annualization.
pub fn annualized_return(series: &[ValuePoint]) -> Option<Decimal> {
    let tr = total_return(series)?;
    let points = sorted_by_time(series);
    let days = points[0].timestamp.elapsed_days(&points[points.len() - 1].timestamp);
    if days <= 0 {
        return None;
    }
    let growth = Decimal::ONE + tr / dec!(100);
    let compounded = growth.checked_powd(dec!(365) / Decimal::from(days))?;
    Some((compounded - Decimal::ONE) * dec!(100))
}

/// Per-interval fractional returns between consecutive points. None when any
/// interval starts at a zero value, since the ratio is undefined there.
pub fn period_returns(series: &[ValuePoint]) -> Option<Vec<Decimal>> {
    let points = sorted_by_time(series);
    let mut returns = Vec::with_capacity(points.len().saturating_sub(1));
    for pair in points.windows(2) {
        let prev = pair[0].value.value();
        if prev.is_zero() {
            return None;
        }
        returns.push((pair[1].value.value() - prev) / prev);
    }
    Some(returns)
}

// 9.2: annualized sharpe over per-period returns, assuming daily sampling:
// (mean * 252 - rfr) / (sample std * sqrt(252)). the risk free rate is a raw
// annual fraction, e.g. 0.02 for 2%.
pub fn sharpe_ratio(series: &[ValuePoint], risk_free_rate: Decimal) -> Option<Decimal> {
    let returns = period_returns(series)?;
    if returns.len() < 2 {
        return None;
    }

    let n = Decimal::from(returns.len());
    let mean = returns.iter().sum::<Decimal>() / n;
    // sample variance, n - 1 denominator
    let variance = returns
        .iter()
        .map(|r| (*r - mean) * (*r - mean))
        .sum::<Decimal>()
        / (n - Decimal::ONE);
    let std_dev = variance.sqrt()?;
    if std_dev.is_zero() {
        return None;
    }

    let annualizer = dec!(252).sqrt()?;
    Some((mean * dec!(252) - risk_free_rate) / (std_dev * annualizer))
}

// 9.3: worst peak-to-trough decline. drawdown at each point is the percentage
// below the running peak; the window runs from the first occurrence of the
// series maximum to the first point where the worst drawdown is hit.
pub fn max_drawdown(series: &[ValuePoint]) -> Option<(Decimal, DrawdownWindow)> {
    if series.len() < 2 {
        return None;
    }
    let points = sorted_by_time(series);

    let mut peak = points[0].value.value();
    let mut peak_at = points[0].timestamp;
    let mut worst = Decimal::ZERO;
    let mut worst_at = points[0].timestamp;

    for point in &points {
        let value = point.value.value();
        if value > peak {
            peak = value;
            peak_at = point.timestamp;
        }
        if peak.is_zero() {
            return None;
        }
        let drawdown = (value - peak) / peak * dec!(100);
        if drawdown < worst {
            worst = drawdown;
            worst_at = point.timestamp;
        }
    }

    Some((
        worst,
        DrawdownWindow {
            start: peak_at,
            end: worst_at,
        },
    ))
}

// 9.4: everything at once. win rate stays None: the flat transaction log does
// not pair entries with exits, so per-trade outcomes cannot be counted.
pub fn performance_report(series: &[ValuePoint], risk_free_rate: Decimal) -> PerformanceReport {
    let (max_dd, window) = match max_drawdown(series) {
        Some((dd, w)) => (Some(dd), Some(w)),
        None => (None, None),
    };
    PerformanceReport {
        total_return: total_return(series),
        annualized_return: annualized_return(series),
        sharpe_ratio: sharpe_ratio(series, risk_free_rate),
        win_rate: None,
        max_drawdown: max_dd,
        drawdown_window: window,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const DAY_MS: i64 = 86_400_000;

    fn series(values: &[Decimal]) -> Vec<ValuePoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| ValuePoint::new(Timestamp::from_millis(i as i64 * DAY_MS), Cash::new(*v)))
            .collect()
    }

    #[test]
    fn total_return_basic() {
        let points = series(&[dec!(100000), dec!(105000)]);
        assert_eq!(total_return(&points), Some(dec!(5)));
    }

    #[test]
    fn total_return_needs_two_points_and_nonzero_start() {
        assert_eq!(total_return(&[]), None);
        assert_eq!(total_return(&series(&[dec!(100000)])), None);
        assert_eq!(total_return(&series(&[dec!(0), dec!(50)])), None);
    }

    #[test]
    fn unsorted_input_is_sorted_first() {
        let mut points = series(&[dec!(100000), dec!(102000), dec!(105000)]);
        points.swap(0, 2);
        assert_eq!(total_return(&points), Some(dec!(5)));
    }

    #[test]
    fn annualized_return_compounds_up_over_short_spans() {
        // 5% over 30 days annualizes to roughly 81%
        let points = vec![
            ValuePoint::new(Timestamp::from_millis(0), Cash::new(dec!(100000))),
            ValuePoint::new(Timestamp::from_millis(30 * DAY_MS), Cash::new(dec!(105000))),
        ];
        let annualized = annualized_return(&points).unwrap();
        assert!(annualized > dec!(75));
        assert!(annualized < dec!(90));
    }

    #[test]
    fn annualized_return_needs_a_full_day() {
        let points = vec![
            ValuePoint::new(Timestamp::from_millis(0), Cash::new(dec!(100000))),
            ValuePoint::new(Timestamp::from_millis(DAY_MS / 2), Cash::new(dec!(105000))),
        ];
        assert_eq!(annualized_return(&points), None);
    }

    #[test]
    fn sharpe_sign_follows_mean_return() {
        let points = series(&[dec!(100000), dec!(101000), dec!(100500), dec!(102000)]);

        let sharpe = sharpe_ratio(&points, Decimal::ZERO).unwrap();
        assert!(sharpe > Decimal::ZERO);

        // an absurd hurdle rate flips the sign
        let hurdle = sharpe_ratio(&points, dec!(10)).unwrap();
        assert!(hurdle < Decimal::ZERO);
    }

    #[test]
    fn sharpe_unavailable_without_dispersion() {
        // flat series: every return is zero, std is zero
        let flat = series(&[dec!(100000), dec!(100000), dec!(100000)]);
        assert_eq!(sharpe_ratio(&flat, Decimal::ZERO), None);

        // one return is not enough for a sample std
        let short = series(&[dec!(100000), dec!(101000)]);
        assert_eq!(sharpe_ratio(&short, Decimal::ZERO), None);
    }

    #[test]
    fn zero_interim_value_makes_sharpe_unavailable() {
        let points = series(&[dec!(100), dec!(0), dec!(50)]);
        assert_eq!(period_returns(&points), None);
        assert_eq!(sharpe_ratio(&points, Decimal::ZERO), None);
    }

    #[test]
    fn drawdown_peak_to_trough() {
        let points = series(&[dec!(100000), dec!(110000), dec!(95000), dec!(105000)]);
        let (dd, window) = max_drawdown(&points).unwrap();

        assert_eq!(dd.round_dp(2), dec!(-13.64));
        assert_eq!(window.start, Timestamp::from_millis(DAY_MS)); // the 110000 point
        assert_eq!(window.end, Timestamp::from_millis(2 * DAY_MS)); // the 95000 point
    }

    #[test]
    fn rising_series_never_draws_down() {
        let points = series(&[dec!(100), dec!(110), dec!(120)]);
        let (dd, _) = max_drawdown(&points).unwrap();
        assert_eq!(dd, Decimal::ZERO);
    }

    #[test]
    fn report_on_empty_series_is_all_none() {
        let report = performance_report(&[], Decimal::ZERO);
        assert_eq!(report.total_return, None);
        assert_eq!(report.annualized_return, None);
        assert_eq!(report.sharpe_ratio, None);
        assert_eq!(report.win_rate, None);
        assert_eq!(report.max_drawdown, None);
        assert_eq!(report.drawdown_window, None);
    }

    #[test]
    fn win_rate_is_never_available() {
        let points = series(&[dec!(100000), dec!(101000), dec!(102000), dec!(99000)]);
        let report = performance_report(&points, Decimal::ZERO);
        assert_eq!(report.win_rate, None);
        // while the rest of the report is populated
        assert!(report.total_return.is_some());
        assert!(report.max_drawdown.is_some());
    }
}
