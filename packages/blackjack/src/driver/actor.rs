use super::ingress::{Mailbox, Message};
use crate::advisor::{advise, Advisor};
use crate::ledger::Ledger;
use crate::table::{Continuation, DealerStep, Table};
use crate::{CardSource, GameError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

/// Pending messages before callers start to wait on the mailbox.
const MAILBOX_SIZE: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    AutoStand,
    DealerDraw,
    Settle,
}

/// An automatic step owed to one round.
#[derive(Debug, Clone, Copy)]
struct Pending {
    at: Instant,
    round: u64,
    step: Step,
}

/// Owns a table and applies commands one at a time, interleaving the paced
/// automatic steps on the same task.
pub struct Actor<S, L> {
    table: Table<S, L>,
    advisor: Arc<dyn Advisor>,
    mailbox: mpsc::Receiver<Message>,
    pending: Option<Pending>,
}

impl<S, L> Actor<S, L>
where
    S: CardSource + Send + 'static,
    L: Ledger + 'static,
{
    pub fn new(table: Table<S, L>, advisor: Arc<dyn Advisor>) -> (Self, Mailbox) {
        let (sender, mailbox) = mpsc::channel(MAILBOX_SIZE);
        let state = table.subscribe();
        (
            Self {
                table,
                advisor,
                mailbox,
                pending: None,
            },
            Mailbox::new(sender, state),
        )
    }

    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(mut self) {
        loop {
            let deadline = self.pending.map(|pending| pending.at);
            tokio::select! {
                message = self.mailbox.recv() => match message {
                    Some(message) => self.handle(message),
                    None => break,
                },
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if let Some(pending) = self.pending.take() {
                        self.resume(pending);
                    }
                }
            }
        }

        // A dealer turn in progress always runs to completion
        while let Some(pending) = self.pending.take() {
            sleep_until(pending.at).await;
            self.resume(pending);
        }
        log::debug!("Table actor stopped");
    }

    fn handle(&mut self, message: Message) {
        match message {
            Message::StartRound { bet, response } => {
                let result = self.table.start_round(bet).map(|next| self.schedule(next));
                let _ = response.send(result);
            }
            Message::Hit { response } => {
                let _ = response.send(self.table.hit());
            }
            Message::Stand { response } => {
                let result = self.table.stand().map(|next| self.schedule(next));
                let _ = response.send(result);
            }
            Message::NewRound { response } => {
                let _ = response.send(self.table.new_round());
            }
            Message::AddChips { amount, response } => {
                let _ = response.send(self.table.add_chips(amount));
            }
            Message::Advice { response } => {
                let Some(request) = self.table.advice_request() else {
                    let _ = response.send(Err(GameError::IllegalTransition {
                        action: "ask for advice",
                        phase: self.table.phase(),
                    }));
                    return;
                };
                let advisor = Arc::clone(&self.advisor);
                tokio::spawn(async move {
                    let advice = advise(advisor.as_ref(), &request).await;
                    let _ = response.send(Ok(advice));
                });
            }
            Message::History { limit, response } => {
                let _ = response.send(self.table.history(limit));
            }
            Message::Stats { response } => {
                let _ = response.send(self.table.stats());
            }
        }
    }

    fn schedule(&mut self, next: Continuation) {
        let pacing = self.table.config().pacing;
        match next {
            Continuation::Idle => {}
            Continuation::AutoStand => self.defer(Step::AutoStand, pacing.auto_stand()),
            Continuation::PlayDealer => self.defer(Step::DealerDraw, pacing.dealer_start()),
        }
    }

    fn defer(&mut self, step: Step, delay: Duration) {
        self.pending = Some(Pending {
            at: Instant::now() + delay,
            round: self.table.state().round,
            step,
        });
    }

    fn resume(&mut self, pending: Pending) {
        let round = self.table.state().round;
        if pending.round != round {
            log::debug!("Dropping {:?} left over from round {}", pending.step, pending.round);
            return;
        }

        let pacing = self.table.config().pacing;
        let result = match pending.step {
            Step::AutoStand => self.table.stand().map(|next| self.schedule(next)),
            Step::DealerDraw => self.table.advance_dealer().map(|step| match step {
                DealerStep::Drew(_) => self.defer(Step::DealerDraw, pacing.dealer_draw()),
                DealerStep::Stood(_) => self.defer(Step::Settle, pacing.settle()),
            }),
            Step::Settle => self.table.settle().map(|_| ()),
        };
        if let Err(e) = result {
            log::debug!("Skipped {:?}: {e}", pending.step);
        }
    }
}
