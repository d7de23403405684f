use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Move {
    Hit,
    Stand,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Hit => write!(f, "HIT"),
            Move::Stand => write!(f, "STAND"),
        }
    }
}

/// Get the move basic strategy recommends, hit or stand only.
///
/// `dealer_value` is the up-card's base value, so an ace counts as 11.
pub fn optimal_move(player_total: u32, dealer_value: u32) -> Move {
    if player_total >= 17 {
        Move::Stand
    } else if player_total <= 11 {
        // Cannot bust
        Move::Hit
    } else if (13..=16).contains(&player_total) {
        if dealer_value >= 7 {
            Move::Hit
        } else {
            Move::Stand
        }
    } else if player_total == 12 {
        if (4..=6).contains(&dealer_value) {
            Move::Stand
        } else {
            Move::Hit
        }
    } else {
        Move::Hit
    }
}

/// Basic strategy with a one-line explanation, used whenever no remote
/// advisor is available or it fails to answer.
pub fn explain_move(player_total: u32, dealer_value: u32) -> String {
    let mv = optimal_move(player_total, dealer_value);
    match (mv, player_total) {
        (Move::Stand, t) if t >= 17 => {
            "STAND - You have 17 or higher. Basic strategy says to stand.".to_string()
        }
        (Move::Hit, t) if t <= 11 => {
            "HIT - You have 11 or less. You cannot bust, so always hit.".to_string()
        }
        (Move::Hit, 13..=16) => format!(
            "HIT - Dealer shows strong card ({dealer_value}). Hit with {player_total}."
        ),
        (Move::Stand, 13..=16) => format!(
            "STAND - Dealer shows weak card ({dealer_value}). Stand and let dealer bust."
        ),
        (Move::Stand, 12) => "STAND - Dealer has weak card (4-6). Let them bust.".to_string(),
        (Move::Hit, 12) => "HIT - Dealer has strong card. Take another card.".to_string(),
        _ => format!("{mv} - Take another card to improve your hand."),
    }
}
