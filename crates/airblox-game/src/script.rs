//! Scripted keyboard input for reproducible headless flights.
//!
//! A script is a comma-separated list of `keys:ticks` steps. Keys are joined
//! with `+`; `none` (or nothing) holds no keys. For example
//! `w:120,none:60,d+w:30` pulls up for two seconds, coasts for one, then
//! pulls up while rolling right for half a second.

use airblox_input::normalize_key;
use std::str::FromStr;

/// Errors raised while parsing an input script.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ScriptError {
    /// The script has no steps.
    #[error("input script is empty")]
    Empty,

    /// A step is not of the form `keys:ticks`.
    #[error("malformed script step `{0}`: expected keys:ticks")]
    Malformed(String),

    /// A step's tick count is not a non-negative integer.
    #[error("bad tick count in script step `{0}`")]
    BadTicks(String),
}

/// Keys held for a number of ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptStep {
    pub keys: Vec<String>,
    pub ticks: u64,
}

/// A parsed input script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputScript {
    steps: Vec<ScriptStep>,
}

impl InputScript {
    /// Hands off the controls for `ticks` ticks.
    #[must_use]
    pub fn idle(ticks: u64) -> Self {
        Self {
            steps: vec![ScriptStep {
                keys: Vec::new(),
                ticks,
            }],
        }
    }

    pub fn steps(&self) -> &[ScriptStep] {
        &self.steps
    }

    #[must_use]
    pub fn total_ticks(&self) -> u64 {
        self.steps.iter().map(|step| step.ticks).fold(0, u64::saturating_add)
    }

    /// Held keys for every tick, in order.
    pub fn ticks(&self) -> impl Iterator<Item = &[String]> {
        self.steps.iter().flat_map(|step| {
            std::iter::repeat_n(step.keys.as_slice(), usize::try_from(step.ticks).unwrap_or(usize::MAX))
        })
    }
}

impl FromStr for InputScript {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let steps = s
            .split(',')
            .map(str::trim)
            .filter(|step| !step.is_empty())
            .map(parse_step)
            .collect::<Result<Vec<_>, _>>()?;
        if steps.is_empty() {
            return Err(ScriptError::Empty);
        }
        Ok(Self { steps })
    }
}

fn parse_step(step: &str) -> Result<ScriptStep, ScriptError> {
    let (keys, ticks) = step
        .rsplit_once(':')
        .ok_or_else(|| ScriptError::Malformed(step.to_string()))?;
    let ticks = ticks
        .trim()
        .parse()
        .map_err(|_| ScriptError::BadTicks(step.to_string()))?;
    let keys = match keys.trim() {
        "" => Vec::new(),
        k if k.eq_ignore_ascii_case("none") => Vec::new(),
        k => k
            .split('+')
            .map(normalize_key)
            .filter(|key| !key.is_empty())
            .collect(),
    };
    Ok(ScriptStep { keys, ticks })
}
