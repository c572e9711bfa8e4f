use clap::Parser;
use spendbook::aggregate::CurrencyFormat;
use spendbook::args::{Args, Command};
use spendbook::model::Transaction;
use spendbook::{commands, Config, Result};
use std::io::{BufRead, Write};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().home().path();

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init => commands::init(home).await?.print(),

        Command::Add(add_args) => {
            let config = Config::load(home).await?;
            commands::add(config, add_args.clone()).await?.print()
        }

        Command::Delete(delete_args) => {
            let config = Config::load(home).await?;
            let currency = config.currency().clone();
            commands::delete(config, delete_args.clone(), |t| {
                confirm_delete(t, &currency)
            })
            .await?
            .print()
        }

        Command::List(list_args) => {
            let config = Config::load(home).await?;
            commands::list(config, list_args.clone()).await?.print()
        }

        Command::Summary => commands::summary(Config::load(home).await?)
            .await?
            .print(),

        Command::Months(months_args) => {
            let config = Config::load(home).await?;
            commands::months(config, months_args.clone())
                .await?
                .print()
        }

        Command::Payees => commands::payees(Config::load(home).await?)
            .await?
            .print(),
    };
    Ok(())
}

/// Asks on the terminal whether `transaction` should be deleted.
fn confirm_delete(transaction: &Transaction, currency: &CurrencyFormat) -> Result<bool> {
    let mut stderr = std::io::stderr();
    write!(
        stderr,
        "{} ",
        commands::confirmation_prompt(transaction, currency)
    )?;
    stderr.flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
