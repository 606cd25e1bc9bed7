//! End-of-period rollover: grading, loot liquidation, periodic resets.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::actions::Resolution;
use crate::constants::{
    GRADE_A_MIN_PCT, GRADE_B_MIN_PCT, GRADE_S_MIN_PCT, RESIDUE_LIQUIDATION_RATE, WILLPOWER_MAX,
};
use crate::numbers;
use crate::state::UserState;

/// Month grade derived from the final budget-health percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    S,
    A,
    B,
    C,
}

impl Grade {
    #[must_use]
    pub fn for_health(pct: f64) -> Self {
        if pct > GRADE_S_MIN_PCT {
            Self::S
        } else if pct > GRADE_A_MIN_PCT {
            Self::A
        } else if pct > GRADE_B_MIN_PCT {
            Self::B
        } else {
            Self::C
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::S => "S",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
        }
    }

    /// Grades good enough to advance progression.
    #[must_use]
    pub const fn advances_level(self) -> bool {
        matches!(self, Self::S | Self::A)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable record of one settled month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRecord {
    /// Period key, "YYYY-MM".
    pub period: String,
    pub grade: Grade,
    pub total_spent: i64,
    pub final_health_pct: i32,
    pub residue_liquidated: u32,
}

/// Settle the named period: grade the month, liquidate residue into a
/// one-time budget bonus, append the history record, and reset the periodic
/// fields. Progression (level, assets, equipment, collection) persists.
///
/// Settling the same period twice is a no-op.
#[must_use]
pub fn settle_month(state: &UserState, period: &str) -> Resolution {
    if state
        .history
        .last()
        .is_some_and(|record| record.period == period)
    {
        return Resolution::unchanged(state, format!("{period} is already settled."));
    }

    let mut next = state.clone();
    let health_pct = next.budget_health_pct();
    let grade = Grade::for_health(health_pct);
    let liquidated = next.inventory.residue;
    let bonus = i64::from(liquidated) * RESIDUE_LIQUIDATION_RATE;
    let total_spent = next.counters.monthly_total_spend;

    next.history.push(MonthRecord {
        period: period.to_string(),
        grade,
        total_spent,
        final_health_pct: numbers::round_f64_to_i32(health_pct),
        residue_liquidated: liquidated,
    });

    next.inventory.residue = 0;
    next.budget.current = next.budget.total + bonus;
    next.runtime.willpower = WILLPOWER_MAX;
    next.runtime.shield_active = false;
    next.counters.defense_actions_today = 0;
    next.counters.residue_obtained_today = 0;
    next.counters.daily_total_spend = 0;
    next.counters.had_spending_today = false;
    next.counters.guard_prompt_shown_today = false;
    next.counters.shield_uses_this_month = 0;
    next.counters.monthly_total_spend = 0;

    if grade.advances_level() {
        next.profile.level = next.profile.level.saturating_add(1);
    }

    let message = format!(
        "Month {period} settled: grade {grade}, {liquidated} residue liquidated for +{bonus}."
    );
    Resolution {
        state: next,
        message,
    }
}
