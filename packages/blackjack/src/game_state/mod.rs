use crate::{Card, Hand, RoundResult};
use serde::{Deserialize, Serialize};

/// Current phase of the round. Phases only move forward; `Betting` opens the next round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Betting,
    PlayerTurn,
    DealerTurn,
    RoundOver,
}

pub const PLACE_BET: &str = "Place your bet";
pub const YOUR_TURN: &str = "Your turn - Hit or Stand?";
pub const DEALER_PLAYING: &str = "Dealer is playing...";

/// Snapshot of the table. A new value is published on every transition and
/// never modified after that.
///
/// Holds at all times:
/// - `bet == 0` exactly when `phase == Betting`
/// - `result` and `payout` are set exactly when `phase == RoundOver`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    pub phase: Phase,
    pub player_hand: Hand,
    pub dealer_hand: Hand,
    pub bet: u64,
    pub chips: u64,
    pub result: Option<RoundResult>,
    pub payout: Option<u64>,
    pub message: String,
    /// Rounds started since the table opened
    pub round: u64,
}

impl RoundState {
    pub fn new(chips: u64) -> Self {
        Self {
            phase: Phase::Betting,
            player_hand: Hand::new(),
            dealer_hand: Hand::new(),
            bet: 0,
            chips,
            result: None,
            payout: None,
            message: PLACE_BET.to_string(),
            round: 0,
        }
    }

    pub fn player_total(&self) -> u32 {
        self.player_hand.total()
    }

    pub fn dealer_total(&self) -> u32 {
        self.dealer_hand.total()
    }

    pub fn dealer_up_card(&self) -> Option<&Card> {
        self.dealer_hand.first()
    }

    pub fn is_settled(&self) -> bool {
        self.phase == Phase::RoundOver
    }

    /// Same table, fresh hands, back to betting. Chips and round count carry over.
    pub fn reset(&self) -> Self {
        Self {
            round: self.round,
            ..Self::new(self.chips)
        }
    }

    pub fn with_message(&self, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests;
