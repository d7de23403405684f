/// One line typed at the table prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Bet(u64),
    Hit,
    Stand,
    NewRound,
    /// Top up, by the configured amount unless one is given
    AddChips(Option<u64>),
    Advice,
    History,
    Stats,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  bet <amount>    start a round
  hit | h         draw a card
  stand | s       hand over to the dealer
  new | n         clear the table for the next bet
  add [amount]    add chips
  advice | a      ask for hit/stand advice
  history         recent rounds
  stats           win/loss totals
  help            this text
  quit | q        leave the table";

impl Input {
    /// `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Ok(None);
        };
        let argument = words.next();

        let input = match command.to_ascii_lowercase().as_str() {
            "bet" | "b" => {
                let amount = argument.ok_or("Usage: bet <amount>")?;
                Input::Bet(parse_amount(amount)?)
            }
            "hit" | "h" => Input::Hit,
            "stand" | "s" => Input::Stand,
            "new" | "n" => Input::NewRound,
            "add" => Input::AddChips(argument.map(parse_amount).transpose()?),
            "advice" | "a" => Input::Advice,
            "history" => Input::History,
            "stats" => Input::Stats,
            "help" | "?" => Input::Help,
            "quit" | "q" | "exit" => Input::Quit,
            other => return Err(format!("Unknown command '{other}', type help")),
        };
        Ok(Some(input))
    }
}

fn parse_amount(raw: &str) -> Result<u64, String> {
    raw.parse()
        .map_err(|_| format!("'{raw}' is not a whole number of chips"))
}
