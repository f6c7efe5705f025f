use crate::report::{list_strategies, run_score, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use scam_score::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Scam Score",
    about = "Score applicant batches for scam, fraud, and debt-to-income risk",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a delimited applicant export and write the augmented table
    Score(ScoreArgs),
    /// List the available fraud score strategies
    Strategies,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score(args),
        Command::Strategies => {
            list_strategies();
            Ok(())
        }
    }
}
