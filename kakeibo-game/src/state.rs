//! The authoritative user-state aggregate.
//!
//! One `UserState` value is owned by the caller; every resolver consumes a
//! snapshot and returns a replacement. All fields deserialize with defaults
//! so that partial saves from older builds load cleanly (see `save`).

use chrono::NaiveDate;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::archetype::Archetype;
use crate::assets::Assets;
use crate::constants::{DEFAULT_MONTHLY_BUDGET, WILLPOWER_MAX};
use crate::cycle::{CycleMode, CycleTracking};
use crate::inventory::Inventory;
use crate::numbers;
use crate::settlement::MonthRecord;

/// Display identity and progression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub archetype: Archetype,
    #[serde(default = "default_level")]
    pub level: u32,
}

fn default_level() -> u32 {
    1
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            display_name: String::new(),
            archetype: Archetype::default(),
            level: 1,
        }
    }
}

/// Period allowance bookkeeping. `current` is intentionally unclamped:
/// negative means over budget and the engine keeps it that way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    #[serde(default = "default_budget_total")]
    pub total: i64,
    #[serde(default = "default_budget_total")]
    pub current: i64,
    #[serde(default)]
    pub fixed_cost: i64,
    #[serde(default)]
    pub start_date: NaiveDate,
}

fn default_budget_total() -> i64 {
    DEFAULT_MONTHLY_BUDGET
}

impl Default for Budget {
    fn default() -> Self {
        Self {
            total: DEFAULT_MONTHLY_BUDGET,
            current: DEFAULT_MONTHLY_BUDGET,
            fixed_cost: 0,
            start_date: NaiveDate::default(),
        }
    }
}

/// Transient per-session values. Willpower persists across days but refills
/// to the cap at month settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Runtime {
    #[serde(default = "default_willpower")]
    pub willpower: i32,
    #[serde(default)]
    pub shield_active: bool,
}

fn default_willpower() -> i32 {
    WILLPOWER_MAX
}

impl Default for Runtime {
    fn default() -> Self {
        Self {
            willpower: WILLPOWER_MAX,
            shield_active: false,
        }
    }
}

/// Per-day and cross-day counters.
///
/// The per-day group (`defense_actions_today` through
/// `guard_prompt_shown_today`) is zeroed together, exactly once per calendar
/// day, keyed by `last_daily_reset_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Counters {
    #[serde(default)]
    pub defense_actions_today: u32,
    #[serde(default)]
    pub residue_obtained_today: u32,
    #[serde(default)]
    pub daily_total_spend: i64,
    #[serde(default)]
    pub had_spending_today: bool,
    #[serde(default)]
    pub guard_prompt_shown_today: bool,
    #[serde(default)]
    pub no_spend_streak: u32,
    #[serde(default)]
    pub last_daily_reset_date: Option<NaiveDate>,
    #[serde(default)]
    pub last_day_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub shield_uses_this_month: u32,
    #[serde(default)]
    pub monthly_total_spend: i64,
}

impl Counters {
    /// Zero the per-day group and stamp the reset date.
    pub(crate) fn reset_for_day(&mut self, today: NaiveDate) {
        self.defense_actions_today = 0;
        self.residue_obtained_today = 0;
        self.daily_total_spend = 0;
        self.had_spending_today = false;
        self.guard_prompt_shown_today = false;
        self.last_daily_reset_date = Some(today);
    }
}

/// A deferred transaction note. Written by the UI, read by the settlement
/// view; the engine stores them untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingNote {
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub created_on: NaiveDate,
}

/// A recurring-charge definition consumed by the due-charge sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub amount: i64,
    /// Day of month the charge falls due (1..=31).
    #[serde(default = "default_billing_day")]
    pub billing_day: u32,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub last_charged: Option<NaiveDate>,
}

fn default_billing_day() -> u32 {
    1
}

const fn default_active() -> bool {
    true
}

/// Single root aggregate, exclusively owned by the engine. The UI only
/// reads it and dispatches actions.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserState {
    #[serde(default)]
    pub profile: Profile,
    #[serde(default)]
    pub cycle: CycleTracking,
    #[serde(default)]
    pub budget: Budget,
    #[serde(default)]
    pub runtime: Runtime,
    #[serde(default)]
    pub counters: Counters,
    #[serde(default)]
    pub inventory: Inventory,
    #[serde(default)]
    pub assets: Assets,
    #[serde(default)]
    pub pending: Vec<PendingNote>,
    #[serde(default)]
    pub history: Vec<MonthRecord>,
    #[serde(default)]
    pub subscriptions: Vec<Subscription>,
    #[serde(skip)]
    pub rng: Option<ChaCha20Rng>,
}

impl UserState {
    /// Attach a seeded RNG for the random gameplay hooks.
    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = Some(ChaCha20Rng::seed_from_u64(seed));
        self
    }

    /// Cycle mode in effect on the given day.
    #[must_use]
    pub fn cycle_mode_on(&self, today: NaiveDate) -> CycleMode {
        self.cycle.mode_on(today)
    }

    /// Remaining-budget health percentage, clamped to [0, 100] for display
    /// and grading. The stored `budget.current` is never clamped.
    #[must_use]
    pub fn budget_health_pct(&self) -> f64 {
        numbers::budget_health_pct(self.budget.current, self.budget.total)
    }

    #[must_use]
    pub const fn is_over_budget(&self) -> bool {
        self.budget.current < 0
    }
}
