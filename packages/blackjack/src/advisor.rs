use crate::strategy::explain_move;
use crate::{Card, GatewayError, Phase, RoundState};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// What an advisor gets to see: the player's cards and the dealer's up-card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdviceRequest {
    pub player_hand: Vec<Card>,
    pub dealer_up_card: Card,
    pub player_total: u32,
}

impl AdviceRequest {
    /// Only a round waiting on the player can be advised.
    pub fn from_state(state: &RoundState) -> Option<Self> {
        if state.phase != Phase::PlayerTurn {
            return None;
        }
        let dealer_up_card = *state.dealer_up_card()?;
        Some(Self {
            player_hand: state.player_hand.cards.clone(),
            dealer_up_card,
            player_total: state.player_total(),
        })
    }

    pub fn prompt(&self) -> String {
        format!(
            "You are a blackjack strategy advisor. Player has {} total. Dealer shows {}. \
             Should player HIT or STAND? Give brief advice in 1-2 sentences.",
            self.player_total,
            self.dealer_up_card.to_display()
        )
    }

    pub fn fallback(&self) -> String {
        explain_move(self.player_total, self.dealer_up_card.value())
    }
}

#[async_trait]
pub trait Advisor: Send + Sync {
    async fn suggest_move(&self, request: &AdviceRequest) -> Result<String, GatewayError>;
}

/// Answers from the built-in basic strategy table, never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicStrategy;

#[async_trait]
impl Advisor for BasicStrategy {
    async fn suggest_move(&self, request: &AdviceRequest) -> Result<String, GatewayError> {
        Ok(request.fallback())
    }
}

/// Ask `advisor`, falling back to basic strategy on error or an empty reply.
pub async fn advise(advisor: &dyn Advisor, request: &AdviceRequest) -> String {
    match advisor.suggest_move(request).await {
        Ok(advice) if !advice.trim().is_empty() => advice.trim().to_string(),
        Ok(_) => {
            log::warn!("Advisor returned an empty reply, using basic strategy");
            request.fallback()
        }
        Err(e) => {
            log::warn!("Advisor unavailable ({e}), using basic strategy");
            request.fallback()
        }
    }
}
