//! Alert condition grammar.
//!
//! Conditions are written in the configuration file as a short string such
//! as `"> 90%"` or `"< 10"`. They are decoded once, at configuration load
//! time, into an explicit `{operator, threshold, unit}` record rather than
//! being re-split ad hoc at every call site.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Comparison direction for a metric alarm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOp {
    Gt,
    Ge,
    Lt,
    Le,
}

impl ComparisonOp {
    /// Token as written in a condition string.
    pub fn token(self) -> &'static str {
        match self {
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
        }
    }
}

/// Whether the threshold is a percentage or a raw value.
///
/// The unit only affects presentation; the numeric threshold sent to the
/// provider is the bare number either way (`"> 90%"` keeps threshold 90.0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdUnit {
    Percent,
    Raw,
}

/// A parsed alert condition: `<operator> <threshold>[%]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AlertCondition {
    pub operator: ComparisonOp,
    pub threshold: f64,
    pub unit: ThresholdUnit,
}

impl FromStr for AlertCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let op = parts
            .next()
            .ok_or_else(|| format!("empty alert condition: {s:?}"))?;
        let value = parts
            .next()
            .ok_or_else(|| format!("alert condition {s:?} is missing a threshold"))?;
        if parts.next().is_some() {
            return Err(format!("alert condition {s:?} has trailing tokens"));
        }

        let operator = match op {
            ">" => ComparisonOp::Gt,
            ">=" => ComparisonOp::Ge,
            "<" => ComparisonOp::Lt,
            "<=" => ComparisonOp::Le,
            other => return Err(format!("unsupported comparison operator {other:?}")),
        };

        let (number, unit) = match value.strip_suffix('%') {
            Some(stripped) => (stripped, ThresholdUnit::Percent),
            None => (value, ThresholdUnit::Raw),
        };
        let threshold: f64 = number
            .parse()
            .map_err(|_| format!("invalid threshold {value:?} in alert condition"))?;
        if !threshold.is_finite() {
            return Err(format!("threshold {value:?} is not finite"));
        }

        Ok(Self { operator, threshold, unit })
    }
}

impl TryFrom<String> for AlertCondition {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AlertCondition> for String {
    fn from(condition: AlertCondition) -> Self {
        condition.to_string()
    }
}

impl fmt::Display for AlertCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.operator.token(), self.threshold)?;
        if self.unit == ThresholdUnit::Percent {
            write!(f, "%")?;
        }
        Ok(())
    }
}
