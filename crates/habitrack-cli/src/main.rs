use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use habitrack_core::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "habitrack", version, about = "Habit tracker with streak analysis")]
struct Cli {
    /// Evaluate as of this date (YYYY-MM-DD) instead of the local date
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Habit(commands::habit::HabitCommand),
    #[command(flatten)]
    Analyse(commands::analyse::AnalyseCommand),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Delete every habit, check-in and segment
    Reset {
        /// Confirm clearing the database
        #[arg(long)]
        yes: bool,
    },
}

/// `RUST_LOG` wins over the configured filter. Logs go to stderr.
fn init_tracing() {
    let configured = Config::load()
        .map(|cfg| cfg.log.filter)
        .unwrap_or_else(|_| "warn".to_string());
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&configured))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());
    let result = match cli.command {
        Commands::Habit(command) => commands::habit::run(command, today),
        Commands::Analyse(command) => commands::analyse::run(command, today),
        Commands::Config { action } => commands::config::run(action),
        Commands::Reset { yes } => commands::reset(yes),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
