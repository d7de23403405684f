use crate::{Card, Rank, Suit};
use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Anything the table can draw cards from.
pub trait CardSource {
    fn draw(&mut self) -> Card;
}

/// Shoe with unlimited decks: every draw is an independent uniform pick of
/// suit and rank, so there is nothing to shuffle and nothing to run out of.
#[derive(Debug, Clone)]
pub struct InfiniteShoe<R = ChaCha8Rng> {
    rng: R,
}

impl InfiniteShoe<ChaCha8Rng> {
    pub fn from_entropy() -> Self {
        Self::new(ChaCha8Rng::from_entropy())
    }

    /// Reproducible shoe for replays and tests.
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> InfiniteShoe<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> CardSource for InfiniteShoe<R> {
    fn draw(&mut self) -> Card {
        let suit = Suit::ALL[self.rng.gen_range(0..Suit::ALL.len())];
        let rank = Rank::ALL[self.rng.gen_range(0..Rank::ALL.len())];
        Card::new(rank, suit)
    }
}

/// Deals a fixed card sequence, starting over once it is exhausted.
#[derive(Debug, Clone)]
pub struct StackedShoe {
    cards: Vec<Card>,
    position: usize,
}

impl StackedShoe {
    /// An empty list deals the ace of spades forever.
    pub fn new(cards: impl IntoIterator<Item = Card>) -> Self {
        let mut cards: Vec<Card> = cards.into_iter().collect();
        if cards.is_empty() {
            cards.push(Card::new(Rank::Ace, Suit::Spades));
        }
        Self { cards, position: 0 }
    }

    /// Build from ranks only; suits rotate through spades, hearts, diamonds, clubs.
    pub fn from_ranks(ranks: &[Rank]) -> Self {
        Self::new(
            ranks
                .iter()
                .enumerate()
                .map(|(i, rank)| Card::new(*rank, Suit::ALL[i % Suit::ALL.len()])),
        )
    }

    pub fn dealt(&self) -> usize {
        self.position
    }
}

impl CardSource for StackedShoe {
    fn draw(&mut self) -> Card {
        let card = self.cards[self.position % self.cards.len()];
        self.position += 1;
        card
    }
}

impl<T: CardSource + ?Sized> CardSource for Box<T> {
    fn draw(&mut self) -> Card {
        (**self).draw()
    }
}
