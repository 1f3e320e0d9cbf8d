use clap::Parser;
use miette::{IntoDiagnostic, Result};
use ppcp_button::interfaces::json::scenario::{read_scenario, run_scenario};
use ppcp_button::logging::{self, LogFormat};
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Scenario JSON file describing the checkout and the widget events
    scenario: PathBuf,

    /// Log output format. Defaults to the LOG_FORMAT environment variable.
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_format.unwrap_or_else(LogFormat::from_env));

    let file = File::open(&cli.scenario).into_diagnostic()?;
    let scenario = read_scenario(BufReader::new(file)).into_diagnostic()?;
    let report = run_scenario(scenario).await.into_diagnostic()?;

    // One JSON line per widget event, then the summary.
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for event in &report.events {
        serde_json::to_writer(&mut out, event).into_diagnostic()?;
        writeln!(out).into_diagnostic()?;
    }
    serde_json::to_writer(
        &mut out,
        &serde_json::json!({
            "finalState": report.final_state,
            "submittedOrders": report.submitted_orders,
            "navigations": report.navigations,
        }),
    )
    .into_diagnostic()?;
    writeln!(out).into_diagnostic()?;

    Ok(())
}
