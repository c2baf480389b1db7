use anyhow::Result;
use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;

use crate::entity::SwapError;
use crate::presenter::SwapPresenter;
use crate::solana::utils::is_amount_text;

lazy_static! {
    static ref COMMAND_RE: Regex = Regex::new(r"^(\S+)(?:\s+(.+))?$").unwrap();
}

/// Commands understood by the terminal front end
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Tokens(Option<String>),
    From(String),
    To(String),
    Amount(String),
    Switch,
    Quote,
    Swap,
    History,
    Connect,
    Disconnect,
    Help,
    Quit,
    Unknown(String),
}

/// Command names and descriptions for help
pub fn register_commands() -> Vec<(&'static str, &'static str)> {
    vec![
        ("tokens [query]", "search the token list by symbol or name"),
        ("from <symbol|mint>", "select the token to pay with"),
        ("to <symbol|mint>", "select the token to receive"),
        ("amount <value>", "set the amount to pay (a bare number works too)"),
        ("switch", "swap the pay and receive tokens"),
        ("quote", "show the current quote"),
        ("swap", "submit the swap with the connected wallet"),
        ("history", "show recent transactions"),
        ("connect", "connect the configured wallet"),
        ("disconnect", "disconnect the wallet"),
        ("help", "display this help message"),
        ("quit", "exit"),
    ]
}

pub fn help_text() -> String {
    let mut text = String::from("Available commands:\n");
    for (name, description) in register_commands() {
        text.push_str(&format!("  {:<20} {}\n", name, description));
    }
    text
}

impl Command {
    /// Parse one input line. `None` for blank input.
    pub fn parse(line: &str) -> Option<Command> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        if is_amount_text(line) {
            return Some(Command::Amount(line.to_string()));
        }

        let captures = COMMAND_RE.captures(line)?;
        let name = captures.get(1)?.as_str().trim_start_matches('/').to_lowercase();
        let arg = captures.get(2).map(|m| m.as_str().trim().to_string());

        let command = match (name.as_str(), arg) {
            ("tokens", query) => Command::Tokens(query),
            ("from", Some(token)) => Command::From(token),
            ("to", Some(token)) => Command::To(token),
            ("amount", Some(amount)) => Command::Amount(amount),
            ("amount", None) => Command::Amount(String::new()),
            ("switch", None) => Command::Switch,
            ("quote", None) => Command::Quote,
            ("swap", None) => Command::Swap,
            ("history", None) => Command::History,
            ("connect", None) => Command::Connect,
            ("disconnect", None) => Command::Disconnect,
            ("help", None) => Command::Help,
            ("quit", None) | ("exit", None) => Command::Quit,
            _ => Command::Unknown(line.to_string()),
        };

        Some(command)
    }
}

/// Run a command. Returns false once the user asks to quit.
pub async fn handle_command(presenter: &dyn SwapPresenter, command: Command) -> Result<bool> {
    debug!("Handling command {:?}", command);

    match command {
        Command::Tokens(query) => {
            presenter.show_tokens(query.as_deref().unwrap_or("")).await?;
        }
        Command::From(query) => match presenter.select_input_token(&query).await {
            Ok(token) => println!("Paying with {}", token.symbol),
            Err(e) => println!("❌ {}", e),
        },
        Command::To(query) => match presenter.select_output_token(&query).await {
            Ok(token) => println!("Receiving {}", token.symbol),
            Err(e) => println!("❌ {}", e),
        },
        Command::Amount(amount) => {
            if let Err(e) = presenter.set_amount(&amount).await {
                println!("❌ {}", e);
            }
        }
        Command::Switch => presenter.switch_tokens().await,
        Command::Quote => presenter.show_quote().await?,
        Command::Swap => match presenter.execute_swap().await {
            Ok(_) => {}
            Err(e @ (SwapError::WalletNotConnected | SwapError::SwapUnavailable(_))) => {
                println!("❌ {}", e)
            }
            // Pipeline failures are already shown by the view
            Err(e) => warn!("Swap not completed: {}", e),
        },
        Command::History => presenter.show_history().await?,
        Command::Connect => match presenter.connect_wallet().await {
            Ok(address) => println!("Wallet connected: {}", address),
            Err(e) => println!("❌ {}", e),
        },
        Command::Disconnect => {
            presenter.disconnect_wallet().await?;
            println!("Wallet disconnected");
        }
        Command::Help => print!("{}", help_text()),
        Command::Quit => return Ok(false),
        Command::Unknown(input) => {
            println!("Unknown command: {}. Type 'help' for the list.", input);
        }
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solana::jupiter::models::USDC_MINT;
    use crate::test_support::Fakes;

    #[test]
    fn parses_commands_and_bare_amounts() {
        assert_eq!(Command::parse("   "), None);
        assert_eq!(Command::parse("1.5"), Some(Command::Amount("1.5".into())));
        assert_eq!(Command::parse(".25"), Some(Command::Amount(".25".into())));
        // zero still reaches amount validation instead of reading as a command
        assert_eq!(Command::parse("0"), Some(Command::Amount("0".into())));
        assert_eq!(Command::parse("amount 3"), Some(Command::Amount("3".into())));
        assert_eq!(Command::parse("from SOL"), Some(Command::From("SOL".into())));
        assert_eq!(
            Command::parse("to EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v"),
            Some(Command::To(USDC_MINT.into()))
        );
        assert_eq!(Command::parse("tokens"), Some(Command::Tokens(None)));
        assert_eq!(
            Command::parse("tokens us"),
            Some(Command::Tokens(Some("us".into())))
        );
        assert_eq!(Command::parse("/SWAP"), Some(Command::Swap));
        assert_eq!(Command::parse("exit"), Some(Command::Quit));
    }

    #[test]
    fn missing_or_extra_arguments_are_unknown() {
        assert_eq!(Command::parse("from"), Some(Command::Unknown("from".into())));
        assert_eq!(
            Command::parse("swap now"),
            Some(Command::Unknown("swap now".into()))
        );
    }

    #[test]
    fn help_lists_every_command() {
        let help = help_text();
        for (name, _) in register_commands() {
            assert!(help.contains(name));
        }
    }

    #[tokio::test]
    async fn commands_drive_the_presenter() {
        let fakes = Fakes::default();
        let presenter = fakes.presenter();
        presenter.load_tokens().await.unwrap();

        for line in ["to bonk", "from usdc", "2.5"] {
            let command = Command::parse(line).unwrap();
            assert!(handle_command(presenter.as_ref(), command).await.unwrap());
        }

        let snapshot = presenter.snapshot().await;
        assert_eq!(snapshot.input_token.unwrap().symbol, "USDC");
        assert_eq!(snapshot.output_token.unwrap().symbol, "Bonk");
        assert_eq!(snapshot.amount, "2.5");
        assert!(snapshot.quote.is_some());

        assert!(!handle_command(presenter.as_ref(), Command::Quit)
            .await
            .unwrap());
    }
}
