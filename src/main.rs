use clap::Parser;
use paisa::args::{Args, Command, InsertSubcommand, UpdateSubcommand};
use paisa::{commands, Config, Mode, Result};
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

    // This allows for testing the program without touching Google Sheets or the local book. When
    // PAISA_IN_TEST_MODE is set and non-zero in length, then the mode will be Mode::Test,
    // otherwise it will be Mode::Live.
    let mode = Mode::from_env();

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init(init_args) => commands::init(home, init_args.clone(), mode).await?.print(),

        Command::Insert(insert_args) => {
            let config = Config::load(home).await?;
            match insert_args.entity() {
                InsertSubcommand::Expense(expense_args) => {
                    commands::insert_expense(config, mode, expense_args.clone())
                        .await?
                        .print()
                }
                InsertSubcommand::Medicine(medicine_args) => {
                    commands::insert_medicine(config, mode, medicine_args.clone())
                        .await?
                        .print()
                }
                InsertSubcommand::Investment(investment_args) => {
                    commands::insert_investment(config, mode, investment_args.clone())
                        .await?
                        .print()
                }
                InsertSubcommand::Category(category_args) => {
                    commands::insert_category(config, mode, category_args.clone())
                        .await?
                        .print()
                }
            }
        }

        Command::Query(query_args) => {
            let config = Config::load(home).await?;
            commands::query(config, mode, query_args.clone()).await?.print()
        }

        Command::Update(update_args) => {
            let config = Config::load(home).await?;
            match update_args.entity() {
                UpdateSubcommand::Expense(expense_args) => {
                    commands::update_expense(config, mode, expense_args.clone())
                        .await?
                        .print()
                }
                UpdateSubcommand::Medicine(medicine_args) => {
                    commands::update_medicine(config, mode, medicine_args.clone())
                        .await?
                        .print()
                }
                UpdateSubcommand::Investment(investment_args) => {
                    commands::update_investment(config, mode, investment_args.clone())
                        .await?
                        .print()
                }
            }
        }

        Command::Delete(delete_args) => {
            let config = Config::load(home).await?;
            commands::delete(config, mode, delete_args.clone()).await?.print()
        }

        Command::Summary(summary_args) => {
            let config = Config::load(home).await?;
            commands::summary(config, mode, summary_args.clone())
                .await?
                .print()
        }

        Command::Export(export_args) => {
            let config = Config::load(home).await?;
            commands::export(config, mode, export_args.clone()).await?.print()
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
fn init_logger(level: LevelFilter) {
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
