use super::*;
use crate::{Rank, Suit};

#[test]
fn test_round_state_new() {
    let state = RoundState::new(1000);
    assert_eq!(state.phase, Phase::Betting);
    assert_eq!(state.chips, 1000);
    assert_eq!(state.bet, 0);
    assert!(state.result.is_none());
    assert!(state.payout.is_none());
    assert!(state.player_hand.is_empty());
    assert!(state.dealer_hand.is_empty());
    assert_eq!(state.message, PLACE_BET);
}

#[test]
fn test_reset_keeps_chips_and_round() {
    let mut state = RoundState::new(500);
    state.phase = Phase::RoundOver;
    state.bet = 20;
    state.round = 3;
    state.result = Some(RoundResult::Win);
    state.payout = Some(40);
    state.player_hand.add_card(Card::new(Rank::King, Suit::Spades));
    state.dealer_hand.add_card(Card::new(Rank::Five, Suit::Hearts));

    let reset = state.reset();
    assert_eq!(reset.phase, Phase::Betting);
    assert_eq!(reset.chips, 500);
    assert_eq!(reset.round, 3);
    assert_eq!(reset.bet, 0);
    assert!(reset.result.is_none());
    assert!(reset.payout.is_none());
    assert!(reset.player_hand.is_empty());
    assert!(reset.dealer_hand.is_empty());
}

#[test]
fn test_with_message_leaves_original_untouched() {
    let state = RoundState::new(10);
    let updated = state.with_message("Insufficient chips!");
    assert_eq!(state.message, PLACE_BET);
    assert_eq!(updated.message, "Insufficient chips!");
    assert_eq!(updated.chips, 10);
}

#[test]
fn test_dealer_up_card() {
    let mut state = RoundState::new(10);
    assert!(state.dealer_up_card().is_none());
    state.dealer_hand.add_card(Card::new(Rank::Six, Suit::Clubs));
    assert_eq!(state.dealer_up_card().map(|c| c.value()), Some(6));
}

#[test]
fn test_snapshot_serializes() {
    let state = RoundState::new(1000);
    let json = serde_json::to_string(&state).unwrap();
    let back: RoundState = serde_json::from_str(&json).unwrap();
    assert_eq!(back, state);
}
