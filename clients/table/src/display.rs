use blackjack::{Hand, HistoryRecord, Phase, RoundState, Stats};
use std::io::Write;
use time::format_description::well_known::Rfc3339;
use tokio::sync::watch;

pub fn render(state: &RoundState) -> String {
    let mut out = format!("Chips: {}", state.chips);
    if state.phase != Phase::Betting {
        out.push_str(&format!("  Bet: {}", state.bet));
        out.push_str(&format!("\n  Dealer: {}", hand_line(&state.dealer_hand)));
        out.push_str(&format!("\n  You:    {}", hand_line(&state.player_hand)));
    }
    if state.is_settled() {
        let result = state.result.map(|r| r.to_string()).unwrap_or_default();
        let payout = state.payout.unwrap_or_default();
        out.push_str(&format!("\n  Result: {result}, paid {payout}"));
    }
    out.push_str(&format!("\n{}", state.message));
    out
}

/// Print every snapshot until the table shuts down, including the last one
/// published before it did.
pub async fn follow<W: Write>(mut updates: watch::Receiver<RoundState>, mut out: W) -> W {
    while updates.changed().await.is_ok() {
        let state = updates.borrow_and_update().clone();
        if let Err(e) = writeln!(out, "\n{}", render(&state)) {
            log::warn!("Failed to print table: {e}");
        }
    }
    out
}

fn hand_line(hand: &Hand) -> String {
    let soft = if hand.is_soft() { "soft " } else { "" };
    format!("{} ({soft}{})", hand.to_display(), hand.total())
}

pub fn history_line(record: &HistoryRecord) -> String {
    let played_at = record.played_at.format(&Rfc3339).unwrap_or_default();
    format!(
        "{played_at}  bet {:>5}  {:>2} vs {:<2}  {}  {:+}",
        record.bet,
        record.player_total,
        record.dealer_total,
        record.result,
        record.net()
    )
}

pub fn stats_line(stats: &Stats) -> String {
    format!(
        "Games {}  Wins {}  Losses {}  Pushes {}  Win rate {:.1}%",
        stats.games,
        stats.wins,
        stats.losses,
        stats.pushes,
        stats.win_rate()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use blackjack::{settle, Card, Rank, RoundResult, Suit};

    #[test]
    fn test_betting_shows_balance_and_prompt() {
        let rendered = render(&RoundState::new(1000));
        assert_eq!(rendered, "Chips: 1000\nPlace your bet");
    }

    #[test]
    fn test_settled_round_shows_hands_and_payout() {
        let mut state = RoundState::new(950);
        state.phase = Phase::RoundOver;
        state.bet = 50;
        state.chips = 1050;
        state.player_hand = Hand::from_cards([
            Card::new(Rank::King, Suit::Spades),
            Card::new(Rank::Queen, Suit::Hearts),
        ]);
        state.dealer_hand = Hand::from_cards([
            Card::new(Rank::Ten, Suit::Clubs),
            Card::new(Rank::Six, Suit::Diamonds),
            Card::new(Rank::Eight, Suit::Clubs),
        ]);
        state.result = Some(RoundResult::Win);
        state.payout = Some(100);
        state.message = "Dealer busted! You win!".to_string();

        let rendered = render(&state);
        assert!(rendered.contains("Dealer: 10♣ 6♦ 8♣ (24)"));
        assert!(rendered.contains("You:    K♠ Q♥ (20)"));
        assert!(rendered.contains("Result: win, paid 100"));
        assert!(rendered.ends_with("Dealer busted! You win!"));
    }

    #[tokio::test]
    async fn test_follow_prints_final_snapshot_after_close() {
        let (sender, updates) = watch::channel(RoundState::new(1000));
        let printer = tokio::spawn(follow(updates, Vec::new()));

        let mut over = RoundState::new(1100);
        over.phase = Phase::RoundOver;
        over.result = Some(RoundResult::Win);
        over.payout = Some(200);
        over.message = "You win!".to_string();
        sender.send_replace(over);
        drop(sender);

        let printed = String::from_utf8(printer.await.unwrap()).unwrap();
        assert!(printed.contains("Chips: 1100"));
        assert!(printed.trim_end().ends_with("You win!"));
    }

    #[test]
    fn test_soft_totals_are_marked() {
        let mut state = RoundState::new(990);
        state.phase = Phase::PlayerTurn;
        state.bet = 10;
        state.player_hand = Hand::from_cards([
            Card::new(Rank::Ace, Suit::Spades),
            Card::new(Rank::Six, Suit::Hearts),
        ]);
        state.dealer_hand = Hand::from_cards([Card::new(Rank::Nine, Suit::Clubs)]);

        let rendered = render(&state);
        assert!(rendered.contains("You:    A♠ 6♥ (soft 17)"));
        assert!(rendered.contains("Dealer: 9♣ (9)"));
        assert!(!rendered.contains("Result"));
    }

    #[test]
    fn test_history_line_shows_net() {
        let player = Hand::from_cards([
            Card::new(Rank::Ten, Suit::Spades),
            Card::new(Rank::Six, Suit::Spades),
        ]);
        let dealer = Hand::from_cards([
            Card::new(Rank::Ten, Suit::Hearts),
            Card::new(Rank::Nine, Suit::Hearts),
        ]);
        let settlement = settle(&player, &dealer, 25).unwrap();
        let line = history_line(&HistoryRecord::new(25, &player.cards, &dealer.cards, &settlement));
        assert!(line.contains("16 vs 19"));
        assert!(line.ends_with("-25"));
    }

    #[test]
    fn test_stats_line() {
        let stats = Stats { games: 4, wins: 1, losses: 2, pushes: 1 };
        assert_eq!(stats_line(&stats), "Games 4  Wins 1  Losses 2  Pushes 1  Win rate 25.0%");
    }
}
