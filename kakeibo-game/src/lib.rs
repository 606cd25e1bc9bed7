//! Kakeibo Quest Game Engine
//!
//! Platform-agnostic core logic for the Money Room, the gamified budget
//! tracker. This crate owns the authoritative `UserState` aggregate and the
//! pure action resolvers that advance it; rendering, auth, and remote
//! document sync live with the host application.

pub mod actions;
pub mod archetype;
pub mod assets;
pub mod constants;
pub mod cycle;
pub mod inventory;
pub mod numbers;
pub mod recipes;
pub mod save;
pub mod settlement;
pub mod state;

// Re-export commonly used types
pub use actions::{
    Resolution, add_pending, add_subscription, change_class, clear_pending, craft, daily_reset,
    day_end, defend, mark_guard_prompt_shown, purify, raise_shield, rename,
    set_subscription_active, should_prompt_guard, spend, sweep_subscriptions,
    update_budget, update_cycle_settings,
};
pub use archetype::Archetype;
pub use assets::{AssetKind, Assets};
pub use cycle::{CycleConfigError, CycleMode, CycleTracking, derive_mode};
pub use inventory::{CollectionCategory, CollectionEntry, Inventory, MaterialId};
pub use recipes::{Recipe, RecipeCosts, catalog, find_recipe};
pub use save::{SAVE_SLOT_KEY, merge_save, merge_save_text};
pub use settlement::{Grade, MonthRecord, settle_month};
pub use state::{Budget, Counters, PendingNote, Profile, Runtime, Subscription, UserState};

/// Trait for abstracting the client-local key-value slot the save lives in.
/// Platform-specific implementations should provide this.
pub trait StateStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist the serialized aggregate under the given key.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be written.
    fn save_state(&self, key: &str, payload: &str) -> Result<(), Self::Error>;

    /// Read back the serialized aggregate, if any was ever written.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be read.
    fn load_state(&self, key: &str) -> Result<Option<String>, Self::Error>;
}

/// Engine wrapper binding the state lifecycle to a storage implementation.
pub struct KakeiboEngine<S>
where
    S: StateStorage,
{
    storage: S,
}

impl<S> KakeiboEngine<S>
where
    S: StateStorage,
{
    /// Create a new engine over the provided storage.
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Load the aggregate, reconciling whatever shape is stored against the
    /// current schema. A missing or malformed slot yields the default state;
    /// only storage-layer failures surface.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage slot cannot be read.
    pub fn load(&self) -> Result<UserState, S::Error> {
        Ok(match self.storage.load_state(SAVE_SLOT_KEY)? {
            Some(text) => save::merge_save_text(&text),
            None => UserState::default(),
        })
    }

    /// Serialize and persist the aggregate.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the storage write fails.
    pub fn save(&self, state: &UserState) -> Result<(), anyhow::Error>
    where
        S::Error: Into<anyhow::Error>,
    {
        let payload = serde_json::to_string(state)?;
        self.storage
            .save_state(SAVE_SLOT_KEY, &payload)
            .map_err(Into::into)
    }
}
