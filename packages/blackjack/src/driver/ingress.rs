use crate::ledger::{HistoryRecord, Stats};
use crate::{Card, GameError, RoundState};
use tokio::sync::{mpsc, oneshot, watch};

/// Messages sent to the table actor.
pub enum Message {
    StartRound {
        bet: u64,
        response: oneshot::Sender<Result<(), GameError>>,
    },
    Hit {
        response: oneshot::Sender<Result<Card, GameError>>,
    },
    Stand {
        response: oneshot::Sender<Result<(), GameError>>,
    },
    NewRound {
        response: oneshot::Sender<Result<(), GameError>>,
    },
    AddChips {
        amount: u64,
        response: oneshot::Sender<Result<u64, GameError>>,
    },
    Advice {
        response: oneshot::Sender<Result<String, GameError>>,
    },
    History {
        limit: usize,
        response: oneshot::Sender<Vec<HistoryRecord>>,
    },
    Stats {
        response: oneshot::Sender<Stats>,
    },
}

/// Handle for driving a table from another task.
#[derive(Clone)]
pub struct Mailbox {
    sender: mpsc::Sender<Message>,
    state: watch::Receiver<RoundState>,
}

impl Mailbox {
    pub(super) fn new(sender: mpsc::Sender<Message>, state: watch::Receiver<RoundState>) -> Self {
        Self { sender, state }
    }

    async fn request<T>(
        &self,
        message: impl FnOnce(oneshot::Sender<T>) -> Message,
    ) -> Result<T, GameError> {
        let (response, receiver) = oneshot::channel();
        if self.sender.send(message(response)).await.is_err() {
            log::warn!("Table mailbox closed; request dropped");
            return Err(GameError::TableClosed);
        }
        receiver.await.map_err(|_| GameError::TableClosed)
    }

    pub async fn start_round(&self, bet: u64) -> Result<(), GameError> {
        self.request(|response| Message::StartRound { bet, response })
            .await?
    }

    pub async fn hit(&self) -> Result<Card, GameError> {
        self.request(|response| Message::Hit { response }).await?
    }

    pub async fn stand(&self) -> Result<(), GameError> {
        self.request(|response| Message::Stand { response }).await?
    }

    pub async fn new_round(&self) -> Result<(), GameError> {
        self.request(|response| Message::NewRound { response }).await?
    }

    pub async fn add_chips(&self, amount: u64) -> Result<u64, GameError> {
        self.request(|response| Message::AddChips { amount, response })
            .await?
    }

    /// Hit/stand advice for the hand in play. Never blocks the table.
    pub async fn advice(&self) -> Result<String, GameError> {
        self.request(|response| Message::Advice { response }).await?
    }

    pub async fn history(&self, limit: usize) -> Result<Vec<HistoryRecord>, GameError> {
        self.request(|response| Message::History { limit, response })
            .await
    }

    pub async fn stats(&self) -> Result<Stats, GameError> {
        self.request(|response| Message::Stats { response }).await
    }

    /// Latest published snapshot
    pub fn state(&self) -> RoundState {
        self.state.borrow().clone()
    }

    /// Receive every snapshot published from now on.
    pub fn subscribe(&self) -> watch::Receiver<RoundState> {
        let mut state = self.state.clone();
        state.borrow_and_update();
        state
    }
}
