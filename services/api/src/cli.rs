use crate::demo::{run_compliance_export, run_demo, run_risk_report, ComplianceArgs, DemoArgs, RiskArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use vendor_intel::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Vendor Intelligence Engine",
    about = "Score supplier trust, forecast delivery risk, and audit compliance from the command line",
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
    /// Assess delivery risk across the seeded demo fleet
    Risk(RiskArgs),
    /// Export the compliance report for the seeded demo fleet
    Compliance(ComplianceArgs),
    /// Run an end-to-end demo covering trust, risk, and compliance
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
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Risk(args) => run_risk_report(args),
        Command::Compliance(args) => run_compliance_export(args),
        Command::Demo(args) => run_demo(args),
    }
}
