//! Durable chip balance and round history.
//!
//! The table treats its ledger as best effort: every call may fail, and a
//! failure is logged and replaced by a default at the call site.

use crate::{Card, GatewayError, RoundResult, Settlement};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// One finished round, as written to history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub bet: u64,
    pub player_hand: Vec<Card>,
    pub dealer_hand: Vec<Card>,
    pub player_total: u32,
    pub dealer_total: u32,
    pub result: RoundResult,
    pub payout: u64,
    #[serde(with = "time::serde::rfc3339")]
    pub played_at: OffsetDateTime,
}

impl HistoryRecord {
    pub fn new(bet: u64, player: &[Card], dealer: &[Card], settlement: &Settlement) -> Self {
        Self {
            bet,
            player_hand: player.to_vec(),
            dealer_hand: dealer.to_vec(),
            player_total: settlement.player_total,
            dealer_total: settlement.dealer_total,
            result: settlement.result,
            payout: settlement.payout,
            played_at: OffsetDateTime::now_utc(),
        }
    }

    /// Chips won or lost on the round, stake included
    pub fn net(&self) -> i64 {
        self.payout as i64 - self.bet as i64
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub games: u64,
    pub wins: u64,
    pub losses: u64,
    pub pushes: u64,
}

impl Stats {
    pub fn record(&mut self, result: RoundResult) {
        self.games += 1;
        match result {
            RoundResult::Win => self.wins += 1,
            RoundResult::Lose => self.losses += 1,
            RoundResult::Push => self.pushes += 1,
        }
    }

    /// Percentage of games won, 0 when nothing has been played
    pub fn win_rate(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.wins as f64 / self.games as f64 * 100.0
    }
}

pub trait Ledger: Send {
    fn chip_balance(&self) -> Result<Option<u64>, GatewayError>;

    fn set_chip_balance(&mut self, chips: u64) -> Result<(), GatewayError>;

    /// Store a finished round and count it in the aggregate stats.
    fn append_history(&mut self, record: HistoryRecord) -> Result<(), GatewayError>;

    /// Most recent first, at most `limit` entries.
    fn history(&self, limit: usize) -> Result<Vec<HistoryRecord>, GatewayError>;

    fn aggregate_stats(&self) -> Result<Stats, GatewayError>;
}

impl<T: Ledger + ?Sized> Ledger for Box<T> {
    fn chip_balance(&self) -> Result<Option<u64>, GatewayError> {
        (**self).chip_balance()
    }

    fn set_chip_balance(&mut self, chips: u64) -> Result<(), GatewayError> {
        (**self).set_chip_balance(chips)
    }

    fn append_history(&mut self, record: HistoryRecord) -> Result<(), GatewayError> {
        (**self).append_history(record)
    }

    fn history(&self, limit: usize) -> Result<Vec<HistoryRecord>, GatewayError> {
        (**self).history(limit)
    }

    fn aggregate_stats(&self) -> Result<Stats, GatewayError> {
        (**self).aggregate_stats()
    }
}

/// Process-local ledger. History is kept oldest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryLedger {
    pub chip_balance: Option<u64>,
    pub history: Vec<HistoryRecord>,
    pub stats: Stats,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balance(chips: u64) -> Self {
        Self {
            chip_balance: Some(chips),
            ..Self::default()
        }
    }
}

impl Ledger for MemoryLedger {
    fn chip_balance(&self) -> Result<Option<u64>, GatewayError> {
        Ok(self.chip_balance)
    }

    fn set_chip_balance(&mut self, chips: u64) -> Result<(), GatewayError> {
        self.chip_balance = Some(chips);
        Ok(())
    }

    fn append_history(&mut self, record: HistoryRecord) -> Result<(), GatewayError> {
        self.stats.record(record.result);
        self.history.push(record);
        Ok(())
    }

    fn history(&self, limit: usize) -> Result<Vec<HistoryRecord>, GatewayError> {
        Ok(self.history.iter().rev().take(limit).cloned().collect())
    }

    fn aggregate_stats(&self) -> Result<Stats, GatewayError> {
        Ok(self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{settle, Hand, Rank, Suit};

    const DEALER_17: [Rank; 2] = [Rank::Ten, Rank::Seven];

    fn record(bet: u64, player: &[Rank], dealer: &[Rank]) -> HistoryRecord {
        let player = Hand::from_cards(player.iter().map(|r| Card::new(*r, Suit::Spades)));
        let dealer = Hand::from_cards(dealer.iter().map(|r| Card::new(*r, Suit::Hearts)));
        let settlement = settle(&player, &dealer, bet).unwrap();
        HistoryRecord::new(bet, &player.cards, &dealer.cards, &settlement)
    }

    #[test]
    fn test_history_is_most_recent_first() {
        let mut ledger = MemoryLedger::new();
        ledger.append_history(record(10, &[Rank::Ten, Rank::Nine], &DEALER_17)).unwrap();
        ledger.append_history(record(20, &[Rank::Ten, Rank::Six], &DEALER_17)).unwrap();
        ledger.append_history(record(30, &[Rank::Ten, Rank::Seven], &DEALER_17)).unwrap();

        let history = ledger.history(2).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].bet, 30);
        assert_eq!(history[1].bet, 20);
    }

    #[test]
    fn test_stats_follow_appended_results() {
        let mut ledger = MemoryLedger::new();
        ledger.append_history(record(10, &[Rank::Ten, Rank::Nine], &DEALER_17)).unwrap();
        ledger.append_history(record(10, &[Rank::Ten, Rank::Six], &DEALER_17)).unwrap();
        ledger.append_history(record(10, &[Rank::Ten, Rank::Seven], &DEALER_17)).unwrap();
        ledger.append_history(record(10, &[Rank::Ten, Rank::Ten], &DEALER_17)).unwrap();

        let stats = ledger.aggregate_stats().unwrap();
        assert_eq!(stats, Stats { games: 4, wins: 2, losses: 1, pushes: 1 });
        assert_eq!(stats.win_rate(), 50.0);
    }

    #[test]
    fn test_empty_stats_win_rate() {
        assert_eq!(Stats::default().win_rate(), 0.0);
    }

    #[test]
    fn test_record_net() {
        assert_eq!(record(10, &[Rank::Ten, Rank::Nine], &[Rank::Ten, Rank::Seven]).net(), 10);
        assert_eq!(record(10, &[Rank::Ten, Rank::Six], &[Rank::Ten, Rank::Seven]).net(), -10);
        assert_eq!(record(10, &[Rank::Ten, Rank::Seven], &[Rank::Ten, Rank::Seven]).net(), 0);
    }

    #[test]
    fn test_record_serializes_timestamp_as_rfc3339() {
        let rec = record(10, &[Rank::Ten, Rank::Nine], &[Rank::Ten, Rank::Seven]);
        let json = serde_json::to_value(&rec).unwrap();
        assert!(json["played_at"].as_str().unwrap().contains('T'));
        assert_eq!(json["result"], "win");
        let back: HistoryRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back.player_hand, rec.player_hand);
        assert_eq!(back.played_at.unix_timestamp(), rec.played_at.unix_timestamp());
    }
}
