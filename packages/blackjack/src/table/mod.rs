//! The round state machine.
//!
//! `Table` is the single writer of the round. Every accepted operation builds
//! a fresh `RoundState` and publishes it whole, so observers never see a half
//! applied transition. Automatic steps (natural auto-stand, dealer draws,
//! settlement) are returned to the caller as a `Continuation` instead of being
//! scheduled here; `Table::play_out` runs them back to back, the actor runs
//! them with presentation delays in between.

use crate::game_state::{DEALER_PLAYING, YOUR_TURN};
use crate::ledger::{HistoryRecord, Ledger, Stats};
use crate::rules::{TableConfig, DEALER_STANDS_ON};
use crate::settlement::{settle, settle_bust};
use crate::{
    AdviceRequest, Card, CardSource, GameError, GatewayError, Hand, Phase, RoundState, Settlement,
};
use tokio::sync::watch;

/// Automatic follow-up owed after an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    /// Nothing to do until the player acts
    Idle,
    /// The opening hand is a natural; stand on the player's behalf
    AutoStand,
    /// The dealer has to play out its hand
    PlayDealer,
}

/// Result of one dealer automaton step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DealerStep {
    Drew(Card),
    Stood(u32),
}

pub fn dealer_should_draw(hand: &Hand) -> bool {
    hand.total() < DEALER_STANDS_ON
}

/// Log a failed ledger call and carry on with `default`.
fn degrade<T>(result: Result<T, GatewayError>, what: &str, default: T) -> T {
    result.unwrap_or_else(|e| {
        log::warn!("Failed to {what}: {}", GameError::GatewayUnavailable(e));
        default
    })
}

pub struct Table<S, L> {
    shoe: S,
    ledger: L,
    config: TableConfig,
    state: watch::Sender<RoundState>,
}

impl<S: CardSource, L: Ledger> Table<S, L> {
    /// Open a table, seeding the chip balance from the ledger.
    pub fn new(shoe: S, ledger: L, config: TableConfig) -> Self {
        let chips = degrade(ledger.chip_balance(), "load chip balance", None)
            .unwrap_or(config.default_chips);
        log::info!("Table open with {chips} chips");

        let (state, _) = watch::channel(RoundState::new(chips));
        Self {
            shoe,
            ledger,
            config,
            state,
        }
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Current snapshot
    pub fn state(&self) -> RoundState {
        self.state.borrow().clone()
    }

    pub fn phase(&self) -> Phase {
        self.state.borrow().phase
    }

    /// Receive every snapshot published from now on.
    pub fn subscribe(&self) -> watch::Receiver<RoundState> {
        self.state.subscribe()
    }

    fn publish(&self, next: RoundState) {
        self.state.send_replace(next);
    }

    fn expect_phase(&self, action: &'static str, phase: Phase) -> Result<RoundState, GameError> {
        let current = self.state();
        if current.phase != phase {
            log::debug!("Ignoring {action} during {:?}", current.phase);
            return Err(GameError::IllegalTransition {
                action,
                phase: current.phase,
            });
        }
        Ok(current)
    }

    /// Take the wager and deal two cards to the player, one to the dealer.
    pub fn start_round(&mut self, bet: u64) -> Result<Continuation, GameError> {
        let current = self.expect_phase("start a round", Phase::Betting)?;

        if bet > current.chips {
            self.publish(current.with_message("Insufficient chips!"));
            return Err(GameError::InsufficientChips {
                bet,
                chips: current.chips,
            });
        }
        if bet == 0 {
            self.publish(current.with_message("Bet must be greater than 0!"));
            return Err(GameError::InvalidBet);
        }
        // A win returns twice the stake on top of the rest of the balance
        if current.chips.checked_add(bet).is_none() {
            self.publish(current.with_message("Bet is too large!"));
            return Err(GameError::InvalidBet);
        }

        let player_hand = Hand::from_cards([self.shoe.draw(), self.shoe.draw()]);
        let dealer_hand = Hand::from_cards([self.shoe.draw()]);
        let natural = player_hand.is_blackjack();

        let next = RoundState {
            phase: Phase::PlayerTurn,
            player_hand,
            dealer_hand,
            bet,
            chips: current.chips - bet,
            result: None,
            payout: None,
            message: YOUR_TURN.to_string(),
            round: current.round + 1,
        };
        log::info!(
            "Round {} started: bet {bet}, player {} ({}), dealer {}",
            next.round,
            next.player_hand.to_display(),
            next.player_total(),
            next.dealer_hand.to_display()
        );
        self.publish(next);

        if natural {
            log::info!("Blackjack! Standing automatically");
            Ok(Continuation::AutoStand)
        } else {
            Ok(Continuation::Idle)
        }
    }

    /// Draw one card for the player. Going over 21 ends the round on the spot.
    pub fn hit(&mut self) -> Result<Card, GameError> {
        let mut next = self.expect_phase("hit", Phase::PlayerTurn)?;

        let card = self.shoe.draw();
        next.player_hand.add_card(card);
        log::debug!("Player drew {card}, total {}", next.player_total());

        if next.player_hand.is_busted() {
            let settlement = settle_bust(&next.player_hand, &next.dealer_hand);
            self.finish(next, settlement)?;
        } else {
            self.publish(next);
        }
        Ok(card)
    }

    /// Hand the round to the dealer.
    pub fn stand(&mut self) -> Result<Continuation, GameError> {
        let current = self.expect_phase("stand", Phase::PlayerTurn)?;
        log::debug!("Player stands on {}", current.player_total());

        self.publish(RoundState {
            phase: Phase::DealerTurn,
            message: DEALER_PLAYING.to_string(),
            ..current
        });
        Ok(Continuation::PlayDealer)
    }

    /// One step of the dealer automaton: draw while under 17, otherwise stand.
    pub fn advance_dealer(&mut self) -> Result<DealerStep, GameError> {
        let mut next = self.expect_phase("advance the dealer", Phase::DealerTurn)?;

        if !dealer_should_draw(&next.dealer_hand) {
            return Ok(DealerStep::Stood(next.dealer_total()));
        }

        let card = self.shoe.draw();
        next.dealer_hand.add_card(card);
        log::debug!("Dealer drew {card}, total {}", next.dealer_total());
        self.publish(next);
        Ok(DealerStep::Drew(card))
    }

    /// Compare hands and pay out. The dealer must have finished drawing.
    pub fn settle(&mut self) -> Result<Settlement, GameError> {
        let current = self.expect_phase("settle", Phase::DealerTurn)?;
        if dealer_should_draw(&current.dealer_hand) {
            return Err(GameError::IllegalTransition {
                action: "settle before the dealer stands",
                phase: current.phase,
            });
        }

        let settlement = settle(&current.player_hand, &current.dealer_hand, current.bet)?;
        self.finish(current, settlement)
    }

    /// Run the dealer and settlement without pacing.
    pub fn play_out(&mut self) -> Result<Settlement, GameError> {
        while let DealerStep::Drew(_) = self.advance_dealer()? {}
        self.settle()
    }

    fn finish(
        &mut self,
        current: RoundState,
        settlement: Settlement,
    ) -> Result<Settlement, GameError> {
        let chips = current
            .chips
            .checked_add(settlement.payout)
            .ok_or(GameError::ChipOverflow)?;
        let record = HistoryRecord::new(
            current.bet,
            &current.player_hand.cards,
            &current.dealer_hand.cards,
            &settlement,
        );

        log::info!(
            "Round {} settled: {} ({} vs {}), payout {}, chips {chips}",
            current.round,
            settlement.result,
            settlement.player_total,
            settlement.dealer_total,
            settlement.payout
        );
        self.publish(RoundState {
            phase: Phase::RoundOver,
            chips,
            result: Some(settlement.result),
            payout: Some(settlement.payout),
            message: settlement.message.clone(),
            ..current
        });

        // The in-memory result stands whatever the ledger says
        degrade(self.ledger.set_chip_balance(chips), "save chip balance", ());
        degrade(self.ledger.append_history(record), "save round history", ());
        Ok(settlement)
    }

    /// Clear the table for the next wager. Refused while a round is in play.
    pub fn new_round(&mut self) -> Result<(), GameError> {
        let current = self.state();
        match current.phase {
            Phase::RoundOver | Phase::Betting => {
                self.publish(current.reset());
                Ok(())
            }
            phase => {
                log::debug!("Ignoring new round during {phase:?}");
                Err(GameError::IllegalTransition {
                    action: "start a new round",
                    phase,
                })
            }
        }
    }

    /// Credit chips in any phase. Returns the new balance.
    pub fn add_chips(&mut self, amount: u64) -> Result<u64, GameError> {
        let current = self.state();
        let in_play = match current.phase {
            Phase::Betting | Phase::RoundOver => 0,
            Phase::PlayerTurn | Phase::DealerTurn => current.bet,
        };
        // A winning stake still has to fit once it comes back
        let chips = current
            .chips
            .checked_add(amount)
            .filter(|chips| chips.checked_add(in_play * 2).is_some())
            .ok_or(GameError::ChipOverflow)?;
        let saved = chips + in_play;
        self.publish(RoundState { chips, ..current });
        log::info!("Added {amount} chips, balance {chips}");

        // Mid-round the saved figure counts the stake as still owned, as it was
        // when the round started; settlement saves the final balance
        degrade(self.ledger.set_chip_balance(saved), "save chip balance", ());
        Ok(chips)
    }

    pub fn advice_request(&self) -> Option<AdviceRequest> {
        AdviceRequest::from_state(&self.state.borrow())
    }

    pub fn history(&self, limit: usize) -> Vec<HistoryRecord> {
        degrade(self.ledger.history(limit), "load history", Vec::new())
    }

    pub fn stats(&self) -> Stats {
        degrade(self.ledger.aggregate_stats(), "load stats", Stats::default())
    }
}
