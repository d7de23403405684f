use crate::hand::BLACKJACK;
use crate::{GameError, Hand};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundResult {
    Win,
    Lose,
    Push,
}

impl fmt::Display for RoundResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundResult::Win => write!(f, "win"),
            RoundResult::Lose => write!(f, "lose"),
            RoundResult::Push => write!(f, "push"),
        }
    }
}

/// Outcome of a finished round. `payout` is what goes back on the chip stack:
/// the stake plus winnings, the stake alone on a push, nothing on a loss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub result: RoundResult,
    pub payout: u64,
    pub player_total: u32,
    pub dealer_total: u32,
    pub message: String,
}

/// Compare both hands once the dealer has finished drawing.
///
/// Fails with `ChipOverflow` when a winning payout does not fit in a `u64`.
pub fn settle(player: &Hand, dealer: &Hand, bet: u64) -> Result<Settlement, GameError> {
    let player_total = player.total();
    let dealer_total = dealer.total();

    let (result, message) = if dealer_total > BLACKJACK {
        (RoundResult::Win, "Dealer busted! You win!")
    } else if player_total > dealer_total {
        (RoundResult::Win, "You win!")
    } else if player_total < dealer_total {
        (RoundResult::Lose, "Dealer wins!")
    } else {
        (RoundResult::Push, "Push - bet returned")
    };
    let payout = match result {
        RoundResult::Win => bet.checked_mul(2).ok_or(GameError::ChipOverflow)?,
        RoundResult::Lose => 0,
        RoundResult::Push => bet,
    };

    Ok(Settlement {
        result,
        payout,
        player_total,
        dealer_total,
        message: message.to_string(),
    })
}

/// A busted player loses before the dealer plays.
pub fn settle_bust(player: &Hand, dealer: &Hand) -> Settlement {
    Settlement {
        result: RoundResult::Lose,
        payout: 0,
        player_total: player.total(),
        dealer_total: dealer.total(),
        message: "You busted!".to_string(),
    }
}
