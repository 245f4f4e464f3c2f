//! Strategy parameters and the named parameter sets the optimizer sweeps.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Invalid strategy configuration. Fails only the affected run or
/// sweep combination, never the whole sweep.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("parameter '{name}' must be positive (got {value})")]
    NonPositive { name: &'static str, value: f64 },

    #[error("period must be a whole number >= 1 (got {0})")]
    InvalidPeriod(f64),

    #[error("z_exit must be non-negative and below z_entry (got {z_exit}, z_entry {z_entry})")]
    InvalidZExit { z_exit: f64, z_entry: f64 },

    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),
}

/// Ordered mapping of parameter name to numeric value.
///
/// Used both as a grid point during optimization and to override the base
/// strategy configuration. BTreeMap keeps serialization deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamSet {
    values: BTreeMap<String, f64>,
}

impl ParamSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: impl Into<String>, value: f64) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, &v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, f64)> for ParamSet {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Full mean-reversion configuration.
///
/// Defaults mirror the classic setup: 20-bar window, enter beyond 1.5
/// sigma, 2-point stop, 4-point target, trend filter off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyParams {
    /// Rolling window length for SMA / sigma / z-score.
    pub period: usize,
    /// Entry threshold in sigmas. Entries fire strictly beyond it.
    pub z_entry: f64,
    /// Optional score-reversion exit: close once |z| <= z_exit.
    /// None keeps exits strictly stop/target bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_exit: Option<f64>,
    /// Stop distance in price points.
    pub sl_distance: f64,
    /// Target distance in price points.
    pub tp_distance: f64,
    /// Gate entries on the ADX trend filter.
    pub adx_filter: bool,
    /// ADX lookback period.
    pub adx_period: usize,
    /// Entries are suppressed while ADX >= this threshold.
    pub max_adx: f64,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            period: 20,
            z_entry: 1.5,
            z_exit: None,
            sl_distance: 2.0,
            tp_distance: 4.0,
            adx_filter: false,
            adx_period: 14,
            max_adx: 20.0,
        }
    }
}

impl StrategyParams {
    /// Overlay named values from a [`ParamSet`] onto this configuration.
    ///
    /// Unknown names are rejected so a typo in a sweep grid fails the
    /// combination loudly instead of silently sweeping nothing.
    pub fn with_overrides(&self, overrides: &ParamSet) -> Result<Self, ConfigError> {
        let mut params = self.clone();
        for (name, value) in overrides.iter() {
            match name {
                "period" => {
                    if value < 1.0 || value.fract() != 0.0 {
                        return Err(ConfigError::InvalidPeriod(value));
                    }
                    params.period = value as usize;
                }
                "z_entry" => params.z_entry = value,
                "z_exit" => params.z_exit = Some(value),
                "sl_distance" => params.sl_distance = value,
                "tp_distance" => params.tp_distance = value,
                "adx_filter" => params.adx_filter = value != 0.0,
                "adx_period" => {
                    if value < 1.0 || value.fract() != 0.0 {
                        return Err(ConfigError::InvalidPeriod(value));
                    }
                    params.adx_period = value as usize;
                }
                "max_adx" => params.max_adx = value,
                other => return Err(ConfigError::UnknownParameter(other.to_string())),
            }
        }
        params.validate()?;
        Ok(params)
    }

    /// Check every numeric constraint. Called before a run starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.period < 1 {
            return Err(ConfigError::InvalidPeriod(self.period as f64));
        }
        if self.z_entry <= 0.0 {
            return Err(ConfigError::NonPositive {
                name: "z_entry",
                value: self.z_entry,
            });
        }
        if self.sl_distance <= 0.0 {
            return Err(ConfigError::NonPositive {
                name: "sl_distance",
                value: self.sl_distance,
            });
        }
        if self.tp_distance <= 0.0 {
            return Err(ConfigError::NonPositive {
                name: "tp_distance",
                value: self.tp_distance,
            });
        }
        if self.adx_period < 1 {
            return Err(ConfigError::InvalidPeriod(self.adx_period as f64));
        }
        if let Some(z_exit) = self.z_exit {
            if z_exit < 0.0 || z_exit >= self.z_entry {
                return Err(ConfigError::InvalidZExit {
                    z_exit,
                    z_entry: self.z_entry,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(StrategyParams::default().validate().is_ok());
    }

    #[test]
    fn overrides_apply_in_order() {
        let ps = ParamSet::new()
            .set("z_entry", 2.0)
            .set("sl_distance", 1.0)
            .set("period", 10.0);
        let params = StrategyParams::default().with_overrides(&ps).unwrap();
        assert_eq!(params.period, 10);
        assert_eq!(params.z_entry, 2.0);
        assert_eq!(params.sl_distance, 1.0);
        // Untouched fields keep defaults
        assert_eq!(params.tp_distance, 4.0);
    }

    #[test]
    fn rejects_unknown_parameter() {
        let ps = ParamSet::new().set("zz_entry", 2.0);
        assert!(matches!(
            StrategyParams::default().with_overrides(&ps),
            Err(ConfigError::UnknownParameter(name)) if name == "zz_entry"
        ));
    }

    #[test]
    fn rejects_non_positive_period() {
        let ps = ParamSet::new().set("period", 0.0);
        assert!(matches!(
            StrategyParams::default().with_overrides(&ps),
            Err(ConfigError::InvalidPeriod(_))
        ));
    }

    #[test]
    fn rejects_fractional_period() {
        let ps = ParamSet::new().set("period", 2.5);
        assert!(matches!(
            StrategyParams::default().with_overrides(&ps),
            Err(ConfigError::InvalidPeriod(_))
        ));
    }

    #[test]
    fn rejects_non_positive_distances() {
        let mut params = StrategyParams::default();
        params.sl_distance = 0.0;
        assert!(matches!(
            params.validate(),
            Err(ConfigError::NonPositive { name: "sl_distance", .. })
        ));

        let mut params = StrategyParams::default();
        params.tp_distance = -1.0;
        assert!(matches!(
            params.validate(),
            Err(ConfigError::NonPositive { name: "tp_distance", .. })
        ));
    }

    #[test]
    fn rejects_z_exit_at_or_above_entry() {
        let mut params = StrategyParams::default();
        params.z_exit = Some(1.5);
        assert!(matches!(
            params.validate(),
            Err(ConfigError::InvalidZExit { .. })
        ));
    }

    #[test]
    fn accepts_z_exit_below_entry() {
        let mut params = StrategyParams::default();
        params.z_exit = Some(0.5);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn param_set_is_ordered_and_deterministic() {
        let a = ParamSet::new().set("b", 2.0).set("a", 1.0);
        let b = ParamSet::new().set("a", 1.0).set("b", 2.0);
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
