use blackjack::{
    Actor, Advisor, BasicStrategy, GameError, InfiniteShoe, Ledger, Mailbox, MemoryLedger, Table,
    TableConfig,
};
use clap::Parser;
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

mod display;
mod file_ledger;
mod gemini;
mod input;

use file_ledger::FileLedger;
use gemini::GeminiAdvisor;
use input::{Input, HELP};

#[derive(Parser)]
#[command(name = "blackjack-table", about = "Single-player blackjack at the terminal")]
struct Cli {
    /// JSON file holding the chip balance and round history
    #[arg(long, env = "BLACKJACK_LEDGER", default_value = "blackjack-ledger.json")]
    ledger: PathBuf,

    /// Seed the shoe for a reproducible game
    #[arg(long, env = "BLACKJACK_SEED")]
    seed: Option<u64>,

    /// Gemini API key. Without one, advice comes from basic strategy
    #[arg(long, env = "GEMINI_API_KEY")]
    gemini_api_key: Option<String>,

    #[arg(long, env = "GEMINI_MODEL", default_value = "gemini-2.5-flash")]
    gemini_model: String,

    /// Skip the dealer animation delays
    #[arg(long)]
    fast: bool,

    /// Chips added by `add` with no amount
    #[arg(long, default_value = "100")]
    top_up: u64,

    /// Rounds listed by `history`
    #[arg(long, default_value = "20")]
    history: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let ledger: Box<dyn Ledger> = match FileLedger::open(&cli.ledger) {
        Ok(ledger) => {
            log::info!("Using ledger {}", ledger.path().display());
            Box::new(ledger)
        }
        Err(e) => {
            log::warn!(
                "Failed to open ledger {}: {e}; nothing will be saved",
                cli.ledger.display()
            );
            Box::new(MemoryLedger::new())
        }
    };

    let shoe = match cli.seed {
        Some(seed) => {
            log::info!("Shoe seeded with {seed}");
            InfiniteShoe::seeded(seed)
        }
        None => InfiniteShoe::from_entropy(),
    };

    let config = if cli.fast {
        TableConfig::instant()
    } else {
        TableConfig::default()
    };

    let advisor: Arc<dyn Advisor> = match cli.gemini_api_key.clone() {
        Some(api_key) => Arc::new(GeminiAdvisor::new(api_key, cli.gemini_model.clone())?),
        None => {
            log::info!("No Gemini API key, advice from basic strategy");
            Arc::new(BasicStrategy)
        }
    };

    let (actor, mailbox) = Actor::new(Table::new(shoe, ledger, config), advisor);
    let handle = actor.start();

    println!("{}\n", HELP);
    println!("{}", display::render(&mailbox.state()));
    let printer = tokio::spawn(display::follow(mailbox.subscribe(), std::io::stdout()));

    repl(&cli, &mailbox).await?;

    // The actor finishes a dealer turn in progress, then drops the table;
    // the printer drains what it published and stops
    drop(mailbox);
    handle.await?;
    printer.await?;
    Ok(())
}

async fn repl(cli: &Cli, mailbox: &Mailbox) -> Result<(), Box<dyn Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let input = match Input::parse(&line) {
            Ok(Some(input)) => input,
            Ok(None) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match input {
            Input::Bet(amount) => report(mailbox.start_round(amount).await),
            Input::Hit => report(mailbox.hit().await.map(|_| ())),
            Input::Stand => report(mailbox.stand().await),
            Input::NewRound => report(mailbox.new_round().await),
            Input::AddChips(amount) => {
                report(mailbox.add_chips(amount.unwrap_or(cli.top_up)).await.map(|_| ()))
            }
            Input::Advice => match mailbox.advice().await {
                Ok(advice) => println!("Advice: {advice}"),
                Err(e) => report(Err(e)),
            },
            Input::History => {
                let history = mailbox.history(cli.history).await?;
                if history.is_empty() {
                    println!("No rounds played yet");
                }
                for record in &history {
                    println!("{}", display::history_line(record));
                }
            }
            Input::Stats => println!("{}", display::stats_line(&mailbox.stats().await?)),
            Input::Help => println!("{HELP}"),
            Input::Quit => break,
        }
    }
    Ok(())
}

fn report(result: Result<(), GameError>) {
    match result {
        Ok(()) => {}
        Err(e) if e.is_ignored() => println!("Not now: {e}"),
        // Shown through the snapshot message
        Err(GameError::InvalidBet | GameError::InsufficientChips { .. }) => {}
        Err(e) => log::error!("{e}"),
    }
}
