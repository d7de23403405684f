pub mod advisor;
mod card;
pub mod driver;
mod error;
mod game_state;
mod hand;
pub mod ledger;
pub mod rules;
mod settlement;
mod shoe;
pub mod strategy;
pub mod table;

pub use advisor::{advise, AdviceRequest, Advisor, BasicStrategy};
pub use card::{Card, Rank, Suit};
pub use driver::{Actor, Mailbox};
pub use error::{GameError, GatewayError};
pub use game_state::{Phase, RoundState};
pub use hand::{calculate_hand_value, is_blackjack, is_busted, is_soft_hand, Hand};
pub use ledger::{HistoryRecord, Ledger, MemoryLedger, Stats};
pub use rules::{Pacing, TableConfig};
pub use settlement::{settle, settle_bust, RoundResult, Settlement};
pub use shoe::{CardSource, InfiniteShoe, StackedShoe};
pub use strategy::{optimal_move, Move};
pub use table::{Continuation, DealerStep, Table};
