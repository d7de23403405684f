use async_trait::async_trait;
use blackjack::{
    AdviceRequest, Actor, Advisor, BasicStrategy, GameError, GatewayError, Mailbox, MemoryLedger,
    Phase, Rank, RoundResult, StackedShoe, Table, TableConfig,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};

fn start(ranks: &[Rank], advisor: Arc<dyn Advisor>) -> (Mailbox, JoinHandle<()>) {
    let table = Table::new(
        StackedShoe::from_ranks(ranks),
        MemoryLedger::new(),
        TableConfig::default(),
    );
    let (actor, mailbox) = Actor::new(table, advisor);
    (mailbox, actor.start())
}

struct Offline;

#[async_trait]
impl Advisor for Offline {
    async fn suggest_move(&self, _request: &AdviceRequest) -> Result<String, GatewayError> {
        Err(GatewayError::Http("request timed out".to_string()))
    }
}

#[tokio::test(start_paused = true)]
async fn test_dealer_turn_is_paced_and_observable() {
    // Player 10+9, dealer 6 then draws 5 and 7
    let (mailbox, _handle) = start(
        &[Rank::Ten, Rank::Nine, Rank::Six, Rank::Five, Rank::Seven],
        Arc::new(BasicStrategy),
    );
    mailbox.start_round(50).await.unwrap();
    assert_eq!(mailbox.state().chips, 950);

    let mut rx = mailbox.subscribe();
    let began = Instant::now();
    mailbox.stand().await.unwrap();

    let mut dealer_sizes = Vec::new();
    loop {
        rx.changed().await.unwrap();
        let state = rx.borrow_and_update().clone();
        match state.phase {
            Phase::DealerTurn => dealer_sizes.push(state.dealer_hand.len()),
            Phase::RoundOver => {
                assert_eq!(state.result, Some(RoundResult::Win));
                assert_eq!(state.chips, 1050);
                assert_eq!(state.dealer_total(), 18);
                break;
            }
            phase => panic!("unexpected phase {phase:?}"),
        }
    }

    assert_eq!(dealer_sizes, vec![1, 2, 3]);
    // dealer start, two draws, then the settle delay
    assert!(began.elapsed() >= Duration::from_millis(1000 + 800 + 800 + 500));
}

#[tokio::test(start_paused = true)]
async fn test_natural_stands_by_itself() {
    let (mailbox, _handle) = start(
        &[Rank::Ace, Rank::King, Rank::Nine, Rank::Nine],
        Arc::new(BasicStrategy),
    );
    let began = Instant::now();
    mailbox.start_round(100).await.unwrap();
    assert_eq!(mailbox.state().phase, Phase::PlayerTurn);

    let mut rx = mailbox.subscribe();
    let state = rx
        .wait_for(|state| state.phase == Phase::RoundOver)
        .await
        .unwrap()
        .clone();

    // Natural pays even money
    assert_eq!(state.result, Some(RoundResult::Win));
    assert_eq!(state.chips, 1100);
    assert!(began.elapsed() >= Duration::from_millis(500 + 1000 + 800 + 500));
}

#[tokio::test(start_paused = true)]
async fn test_stale_auto_stand_does_not_touch_next_round() {
    // Natural, then two hits bust it before the auto-stand fires
    let (mailbox, _handle) = start(
        &[
            Rank::Ace,
            Rank::King,
            Rank::Nine,
            Rank::King,
            Rank::King,
            Rank::Five,
            Rank::Six,
            Rank::Seven,
        ],
        Arc::new(BasicStrategy),
    );
    mailbox.start_round(10).await.unwrap();
    mailbox.hit().await.unwrap();
    mailbox.hit().await.unwrap();
    let busted = mailbox.state();
    assert_eq!(busted.phase, Phase::RoundOver);
    assert_eq!(busted.result, Some(RoundResult::Lose));

    mailbox.new_round().await.unwrap();
    mailbox.start_round(10).await.unwrap();
    assert_eq!(mailbox.state().player_total(), 11);

    sleep(Duration::from_secs(5)).await;
    let state = mailbox.state();
    assert_eq!(state.phase, Phase::PlayerTurn);
    assert_eq!(state.round, 2);
}

#[tokio::test(start_paused = true)]
async fn test_out_of_phase_commands_are_ignored() {
    let (mailbox, _handle) = start(&[Rank::Ten, Rank::Five, Rank::Six], Arc::new(BasicStrategy));
    let before = mailbox.state();

    assert!(mailbox.hit().await.unwrap_err().is_ignored());
    assert!(mailbox.stand().await.unwrap_err().is_ignored());
    assert!(mailbox.advice().await.unwrap_err().is_ignored());
    assert_eq!(mailbox.state(), before);

    let err = mailbox.start_round(5000).await.unwrap_err();
    assert!(matches!(err, GameError::InsufficientChips { bet: 5000, chips: 1000 }));
    assert_eq!(mailbox.state().message, "Insufficient chips!");
}

#[tokio::test(start_paused = true)]
async fn test_advice_falls_back_when_advisor_is_down() {
    let (mailbox, _handle) = start(&[Rank::Ten, Rank::Six, Rank::Queen], Arc::new(Offline));
    mailbox.start_round(10).await.unwrap();

    let advice = mailbox.advice().await.unwrap();
    assert_eq!(advice, "HIT - Dealer shows strong card (10). Hit with 16.");
    assert_eq!(mailbox.state().phase, Phase::PlayerTurn);
}

#[tokio::test(start_paused = true)]
async fn test_dealer_turn_finishes_after_mailbox_drops() {
    let (mailbox, handle) = start(
        &[Rank::Ten, Rank::Eight, Rank::Ten, Rank::Seven],
        Arc::new(BasicStrategy),
    );
    let rx = mailbox.subscribe();
    mailbox.start_round(20).await.unwrap();
    mailbox.stand().await.unwrap();
    drop(mailbox);

    handle.await.unwrap();
    let state = rx.borrow().clone();
    assert_eq!(state.phase, Phase::RoundOver);
    assert_eq!(state.result, Some(RoundResult::Win));
    assert_eq!(state.chips, 1020);
}

#[tokio::test(start_paused = true)]
async fn test_history_and_stats_through_mailbox() {
    let (mailbox, _handle) = start(
        &[Rank::Ten, Rank::Nine, Rank::Ten, Rank::Eight],
        Arc::new(BasicStrategy),
    );
    mailbox.start_round(10).await.unwrap();
    mailbox.stand().await.unwrap();
    mailbox
        .subscribe()
        .wait_for(|state| state.phase == Phase::RoundOver)
        .await
        .unwrap();

    let history = mailbox.history(20).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].result, RoundResult::Win);
    assert_eq!(history[0].dealer_total, 18);

    let stats = mailbox.stats().await.unwrap();
    assert_eq!(stats.games, 1);
    assert_eq!(stats.wins, 1);

    assert_eq!(mailbox.add_chips(100).await.unwrap(), 1110);
}
