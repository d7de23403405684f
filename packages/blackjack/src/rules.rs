use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Dealer draws while under this total and stands on anything at or above it.
pub const DEALER_STANDS_ON: u32 = 17;

/// Balance used when the ledger has nothing stored or cannot be reached.
pub const DEFAULT_CHIPS: u64 = 1000;

/// Presentation pacing for the automatic steps of a round, in milliseconds.
///
/// None of these affect the outcome; `Pacing::instant()` plays identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pacing {
    /// Delay before a natural blackjack stands on its own
    pub auto_stand_ms: u64,

    /// Delay between the player standing and the dealer's first draw
    pub dealer_start_ms: u64,

    /// Delay between dealer draws
    pub dealer_draw_ms: u64,

    /// Delay between the dealer stopping and settlement
    pub settle_ms: u64,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            auto_stand_ms: 500,
            dealer_start_ms: 1000,
            dealer_draw_ms: 800,
            settle_ms: 500,
        }
    }
}

impl Pacing {
    pub fn instant() -> Self {
        Self {
            auto_stand_ms: 0,
            dealer_start_ms: 0,
            dealer_draw_ms: 0,
            settle_ms: 0,
        }
    }

    pub fn auto_stand(&self) -> Duration {
        Duration::from_millis(self.auto_stand_ms)
    }

    pub fn dealer_start(&self) -> Duration {
        Duration::from_millis(self.dealer_start_ms)
    }

    pub fn dealer_draw(&self) -> Duration {
        Duration::from_millis(self.dealer_draw_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

/// Table configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Starting balance when the ledger has none
    pub default_chips: u64,

    pub pacing: Pacing,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            default_chips: DEFAULT_CHIPS,
            pacing: Pacing::default(),
        }
    }
}

impl TableConfig {
    /// Same table with every automatic step firing immediately
    pub fn instant() -> Self {
        Self {
            pacing: Pacing::instant(),
            ..Self::default()
        }
    }
}
