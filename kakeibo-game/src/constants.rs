//! Centralized balance and tuning constants for the Money Room game loop.
//!
//! These values define the deterministic math for action resolution.
//! Keeping them together ensures that gameplay can only be adjusted via
//! code changes reviewed in version control.

// Willpower ----------------------------------------------------------------
pub(crate) const WILLPOWER_MAX: i32 = 100;
pub(crate) const RECOVERY_NORMAL: i32 = 10;
pub(crate) const RECOVERY_PMS: i32 = 6;
pub(crate) const RECOVERY_REST: i32 = 12;
pub(crate) const SAGE_RECOVERY_CYCLE_BONUS: i32 = 8;
pub(crate) const SAGE_RECOVERY_FLAT_BONUS: i32 = 3;

// Defense ------------------------------------------------------------------
pub(crate) const DEFEND_DAILY_CAP: u32 = 3;
pub(crate) const DEFEND_WILLPOWER_GAIN: i32 = 5;

// Spending and residue -----------------------------------------------------
pub(crate) const RESIDUE_SPEND_THRESHOLD: i64 = 5_000;
pub(crate) const RESIDUE_DAILY_CAP: u32 = 10;
pub(crate) const DISCOVERY_CHANCE: f64 = 0.25;
pub(crate) const GUARD_SUCCESS_CHANCE: f64 = 0.30;

// Purification -------------------------------------------------------------
pub(crate) const PURIFY_WILLPOWER_COST: i32 = 10;
pub(crate) const PURIFY_RESIDUE_COST: u32 = 3;
pub(crate) const PURIFY_SALT_COST: u32 = 1;
pub(crate) const PURIFY_OUTPUT_YIELD: u32 = 1;
pub(crate) const CRAFT_DOUBLE_CHANCE: f64 = 0.20;

// Crafting -----------------------------------------------------------------
pub(crate) const CRAFT_WAREHOUSE_GAIN: u32 = 5;

// Streaks ------------------------------------------------------------------
pub(crate) const STREAK_BADGE_DAYS: [u32; 2] = [3, 7];

// Shield -------------------------------------------------------------------
pub(crate) const SHIELD_MONTHLY_CAP: u32 = 3;

// Assets -------------------------------------------------------------------
pub(crate) const ASSET_LEVEL_THRESHOLDS: [u32; 3] = [10, 30, 100];

// Settlement ---------------------------------------------------------------
pub(crate) const GRADE_S_MIN_PCT: f64 = 80.0;
pub(crate) const GRADE_A_MIN_PCT: f64 = 50.0;
pub(crate) const GRADE_B_MIN_PCT: f64 = 20.0;
pub(crate) const RESIDUE_LIQUIDATION_RATE: i64 = 100;

// Cycle tracking -----------------------------------------------------------
pub(crate) const CYCLE_LEN_MIN: u32 = 15;
pub(crate) const CYCLE_LEN_MAX: u32 = 60;
pub(crate) const CYCLE_LEN_DEFAULT: u32 = 28;
pub(crate) const REST_WINDOW_DAYS: i64 = 5;
pub(crate) const PMS_WINDOW_DAYS: i64 = 10;

// Budget -------------------------------------------------------------------
pub(crate) const DEFAULT_MONTHLY_BUDGET: i64 = 100_000;
