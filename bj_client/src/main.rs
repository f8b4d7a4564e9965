//! A text-mode client for an online blackjack server.
//!
//! The client keeps one session in step with the server: start or resume a
//! session, bet, hit or stand, then play again or stop.

use anyhow::{Context, Result};
use pico_args::Arguments;
use private_blackjack::{Presenter, SessionController};
use std::io;

use bj_client::{
    api_client::ApiClient,
    commands::{self, Command},
    config::{BetPolicy, ClientConfig, ConfigOverrides},
    console::ConsolePresenter,
    logging,
};

const HELP: &str = "\
Play blackjack against a remote server

USAGE:
  bj_client [OPTIONS]

OPTIONS:
  --server URL          Server URL  [default: http://localhost:8080]
  --username NAME       Username for the shared identity
  --password PASS       Password for the shared identity
  --timeout SECS        Per-request timeout in seconds [default: none]

FLAGS:
  --strict              Cap bets at BLACKJACK_BET_MAX [default]
  --lenient             Don't cap bets
  -h, --help            Print help information

Settings can also come from BLACKJACK_* environment variables or a .env file.
";

struct Args {
    server_url: Option<String>,
    username: Option<String>,
    password: Option<String>,
    timeout_secs: Option<u64>,
    bet_policy: Option<BetPolicy>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let lenient = pargs.contains("--lenient");
    let strict = pargs.contains("--strict");
    if lenient && strict {
        anyhow::bail!("--strict and --lenient can't be used together");
    }

    let args = Args {
        server_url: pargs.opt_value_from_str("--server")?,
        username: pargs.opt_value_from_str("--username")?,
        password: pargs.opt_value_from_str("--password")?,
        timeout_secs: pargs.opt_value_from_str("--timeout")?,
        bet_policy: match (strict, lenient) {
            (true, _) => Some(BetPolicy::Strict),
            (_, true) => Some(BetPolicy::Lenient),
            _ => None,
        },
    };

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        anyhow::bail!("Unexpected arguments: {remaining:?}");
    }

    // A missing .env file is fine
    let _ = dotenvy::dotenv();
    logging::init();

    run(args).await
}

async fn run(args: Args) -> Result<()> {
    let config = ClientConfig::from_env(ConfigOverrides {
        server_url: args.server_url,
        username: args.username,
        password: args.password,
        bet_policy: args.bet_policy,
        request_timeout_secs: args.timeout_secs,
    })?;
    config.validate()?;
    tracing::info!(
        server = %config.server_url,
        policy = ?config.bet_policy,
        "Configuration loaded"
    );

    let store = ApiClient::from_config(&config).context("Failed to create API client")?;
    let presenter = ConsolePresenter::new(io::stdin().lock(), io::stdout());
    let mut controller = SessionController::new(store, config.bet_rules(), presenter);

    controller.presenter_mut().say(&format!(
        "Connected to {} as {}. Type 'help' for commands.",
        config.server_url, config.credentials.username
    ));
    controller.presenter_mut().show(None);

    loop {
        let Some(line) = controller
            .presenter_mut()
            .read_command()
            .context("Failed to read command")?
        else {
            break;
        };
        if line.is_empty() {
            continue;
        }

        match commands::parse_command(&line) {
            Ok(Command::Play(intent)) => controller.dispatch(intent).await,
            Ok(Command::Help) => controller.presenter_mut().say(commands::HELP),
            Ok(Command::Quit) => break,
            Err(e) => controller.presenter_mut().show_error(&e.to_string()),
        }
    }

    controller.presenter_mut().say("Goodbye.");
    Ok(())
}
