//! ADX — Average Directional Index (Wilder).
//!
//! Steps:
//! 1. Compute +DM and -DM from consecutive bars
//! 2. Smooth +DM, -DM, and TR using Wilder smoothing (alpha = 1/period)
//! 3. +DI = 100 * smoothed(+DM) / smoothed(TR)
//! 4. -DI = 100 * smoothed(-DM) / smoothed(TR)
//! 5. DX = 100 * |+DI - -DI| / (+DI + -DI)
//! 6. ADX = Wilder-smoothed DX
//!
//! Lookback: 2 * period (period for DI smoothing, then period for ADX
//! smoothing). Values are NaN until the lookback is satisfied.

use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Adx {
    period: usize,
}

impl Adx {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ADX period must be >= 1");
        Self { period }
    }

    pub fn lookback(&self) -> usize {
        2 * self.period
    }

    /// Precompute the ADX series for a bar sequence.
    pub fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        if n < 2 {
            return vec![f64::NAN; n];
        }

        // Step 1: +DM and -DM. Index 0 has no previous bar.
        let mut plus_dm = vec![f64::NAN; n];
        let mut minus_dm = vec![f64::NAN; n];
        for i in 1..n {
            let up_move = bars[i].high - bars[i - 1].high;
            let down_move = bars[i - 1].low - bars[i].low;

            plus_dm[i] = if up_move > down_move && up_move > 0.0 {
                up_move
            } else {
                0.0
            };
            minus_dm[i] = if down_move > up_move && down_move > 0.0 {
                down_move
            } else {
                0.0
            };
        }

        // Step 2: Wilder smooth +DM, -DM, and TR
        let mut tr = true_range(bars);
        // TR[0] has no previous close; exclude it so the seed window lines
        // up with the DM series.
        tr[0] = f64::NAN;
        let smooth_tr = wilder_smooth(&tr, self.period);
        let smooth_plus_dm = wilder_smooth(&plus_dm, self.period);
        let smooth_minus_dm = wilder_smooth(&minus_dm, self.period);

        // Steps 3-5: DI and DX
        let mut dx = vec![f64::NAN; n];
        for i in 0..n {
            if smooth_tr[i].is_nan()
                || smooth_plus_dm[i].is_nan()
                || smooth_minus_dm[i].is_nan()
                || smooth_tr[i] == 0.0
            {
                continue;
            }

            let plus_di = 100.0 * smooth_plus_dm[i] / smooth_tr[i];
            let minus_di = 100.0 * smooth_minus_dm[i] / smooth_tr[i];
            let di_sum = plus_di + minus_di;

            dx[i] = if di_sum == 0.0 {
                0.0
            } else {
                100.0 * (plus_di - minus_di).abs() / di_sum
            };
        }

        // Step 6: Wilder smooth DX into ADX
        wilder_smooth(&dx, self.period)
    }
}

/// Compute the True Range series from bars.
/// TR[0] = high[0] - low[0] (no previous close).
/// TR[t] = max(high[t]-low[t], |high[t]-close[t-1]|, |low[t]-close[t-1]|).
pub fn true_range(bars: &[Bar]) -> Vec<f64> {
    let n = bars.len();
    let mut tr = vec![f64::NAN; n];
    if n == 0 {
        return tr;
    }
    tr[0] = bars[0].high - bars[0].low;
    for i in 1..n {
        let h = bars[i].high;
        let l = bars[i].low;
        let pc = bars[i - 1].close;
        tr[i] = (h - l).max((h - pc).abs()).max((l - pc).abs());
    }
    tr
}

/// Apply Wilder smoothing to a series. Alpha = 1/period.
/// Seed: mean of the first `period` consecutive non-NaN values.
pub fn wilder_smooth(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if n < period || period == 0 {
        return result;
    }

    // First index with `period` consecutive non-NaN values.
    let seed_start = values
        .windows(period)
        .position(|w| w.iter().all(|v| !v.is_nan()));
    let seed_start = match seed_start {
        Some(s) => s,
        None => return result,
    };
    let seed_end = seed_start + period;

    let seed: f64 = values[seed_start..seed_end].iter().sum::<f64>() / period as f64;
    result[seed_end - 1] = seed;

    let alpha = 1.0 / period as f64;
    let mut prev = seed;
    for i in seed_end..n {
        if values[i].is_nan() {
            // A hole after the seed invalidates everything downstream.
            for val in result.iter_mut().skip(i) {
                *val = f64::NAN;
            }
            return result;
        }
        let smoothed = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = smoothed;
        prev = smoothed;
    }

    result
}
