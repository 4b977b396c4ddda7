use crate::demo::{run_advise, run_demo, run_diagnose, AdviseArgs, DemoArgs, DiagnoseArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use krishi_advisory::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Krishi Advisory",
    about = "Serve and demonstrate blended traditional and scientific farming advisories",
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
    /// Generate one advisory for a district and crop
    Advise(AdviseArgs),
    /// Diagnose a crop photo with the hosted plant-disease classifier
    Diagnose(DiagnoseArgs),
    /// Run a seeded walkthrough covering advisories, submissions and feedback
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Practice CSV export to load instead of the bundled seed data
    #[arg(long)]
    pub(crate) practices_csv: Option<PathBuf>,
    /// Soil test CSV export to load instead of the bundled seed data
    #[arg(long)]
    pub(crate) soil_csv: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Advise(args) => run_advise(args).await,
        Command::Diagnose(args) => run_diagnose(args).await,
        Command::Demo(args) => run_demo(args).await,
    }
}
