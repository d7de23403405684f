use crate::Card;
use serde::{Deserialize, Serialize};

/// Highest total a hand can have without busting.
pub const BLACKJACK: u32 = 21;

/// Returns the hand total and how many aces are still counted as 11.
fn evaluate(cards: &[Card]) -> (u32, u32) {
    let mut total = 0;
    let mut soft_aces = 0;

    for card in cards {
        if card.is_ace() {
            soft_aces += 1;
        }
        total += card.value();
    }

    // Re-price aces from 11 to 1 until the hand fits
    while total > BLACKJACK && soft_aces > 0 {
        total -= 10;
        soft_aces -= 1;
    }

    (total, soft_aces)
}

/// Calculate the value of a blackjack hand.
///
/// Aces start at 11 and are demoted to 1 one at a time while the hand is over
/// 21. A bust is reported as the raw total, not clamped.
pub fn calculate_hand_value(cards: &[Card]) -> u32 {
    evaluate(cards).0
}

/// Check if a hand is soft (has an ace counted as 11)
pub fn is_soft_hand(cards: &[Card]) -> bool {
    evaluate(cards).1 > 0
}

pub fn is_busted(cards: &[Card]) -> bool {
    calculate_hand_value(cards) > BLACKJACK
}

/// Check if a hand is blackjack (21 with 2 cards)
pub fn is_blackjack(cards: &[Card]) -> bool {
    cards.len() == 2 && calculate_hand_value(cards) == BLACKJACK
}

/// Cards held by one role at the table, in draw order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    pub cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
        }
    }

    pub fn total(&self) -> u32 {
        calculate_hand_value(&self.cards)
    }

    pub fn is_soft(&self) -> bool {
        is_soft_hand(&self.cards)
    }

    pub fn is_busted(&self) -> bool {
        is_busted(&self.cards)
    }

    pub fn is_blackjack(&self) -> bool {
        is_blackjack(&self.cards)
    }

    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn first(&self) -> Option<&Card> {
        self.cards.first()
    }

    pub fn to_display(&self) -> String {
        self.cards
            .iter()
            .map(Card::to_display)
            .collect::<Vec<_>>()
            .join(" ")
    }
}
