//! Cycle-aware difficulty modifier.
//!
//! The tracked menstrual cycle shades the daily loop: willpower recovery,
//! shield eligibility, and guard-prompt suppression all consult the mode
//! derived here. The derivation is a pure function over calendar dates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::constants::{
    CYCLE_LEN_DEFAULT, CYCLE_LEN_MAX, CYCLE_LEN_MIN, PMS_WINDOW_DAYS, RECOVERY_NORMAL,
    RECOVERY_PMS, RECOVERY_REST, REST_WINDOW_DAYS,
};

/// Difficulty mode derived from the tracked cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CycleMode {
    #[default]
    Normal,
    Pms,
    Rest,
}

impl CycleMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Pms => "pms",
            Self::Rest => "rest",
        }
    }

    /// Base willpower recovery granted at daily reset.
    #[must_use]
    pub(crate) const fn daily_recovery(self) -> i32 {
        match self {
            Self::Normal => RECOVERY_NORMAL,
            Self::Pms => RECOVERY_PMS,
            Self::Rest => RECOVERY_REST,
        }
    }

    /// Whether the monthly shield may be raised under this mode.
    #[must_use]
    pub const fn shield_eligible(self) -> bool {
        matches!(self, Self::Pms | Self::Rest)
    }

    /// Whether the daily guard prompt is suppressed under this mode.
    #[must_use]
    pub const fn suppresses_guard_prompt(self) -> bool {
        matches!(self, Self::Rest)
    }
}

impl fmt::Display for CycleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation failure for cycle-tracking settings edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CycleConfigError {
    #[error("average cycle length {0} is outside the supported {CYCLE_LEN_MIN}..={CYCLE_LEN_MAX} day range")]
    LengthOutOfRange(u32),
}

/// Tracked cycle settings: a reference start date and an average length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleTracking {
    #[serde(default)]
    pub reference_date: NaiveDate,
    #[serde(default = "default_cycle_len")]
    pub average_len: u32,
}

const fn default_cycle_len() -> u32 {
    CYCLE_LEN_DEFAULT
}

impl Default for CycleTracking {
    fn default() -> Self {
        Self {
            reference_date: NaiveDate::default(),
            average_len: CYCLE_LEN_DEFAULT,
        }
    }
}

impl CycleTracking {
    /// Build validated settings from an explicit edit.
    ///
    /// # Errors
    ///
    /// Returns `CycleConfigError::LengthOutOfRange` when `average_len` is
    /// outside the supported range.
    pub fn configure(reference_date: NaiveDate, average_len: u32) -> Result<Self, CycleConfigError> {
        if !(CYCLE_LEN_MIN..=CYCLE_LEN_MAX).contains(&average_len) {
            return Err(CycleConfigError::LengthOutOfRange(average_len));
        }
        Ok(Self {
            reference_date,
            average_len,
        })
    }

    /// Mode in effect on the given day.
    #[must_use]
    pub fn mode_on(&self, today: NaiveDate) -> CycleMode {
        derive_mode(today, self.reference_date, self.average_len)
    }
}

/// Derive the difficulty mode for `today` from the tracked reference date.
///
/// `diff` is the whole-day distance from today to the reference (positive =
/// reference lies ahead), reduced modulo the cycle length so the window
/// pattern repeats every cycle. Within one cycle the windows are exactly
/// `[-4, 0]` days around the reference (rest) and the 10-day run-up before
/// it (pms).
#[must_use]
pub fn derive_mode(today: NaiveDate, reference: NaiveDate, cycle_len: u32) -> CycleMode {
    let cycle_len = i64::from(cycle_len.max(CYCLE_LEN_MIN));
    let diff = (reference - today).num_days();
    let m = diff.rem_euclid(cycle_len);
    if m == 0 || m > cycle_len - REST_WINDOW_DAYS {
        CycleMode::Rest
    } else if m <= PMS_WINDOW_DAYS {
        CycleMode::Pms
    } else {
        CycleMode::Normal
    }
}
