use std::io::Read;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dictamen_client::{AnalysisClient, AnalysisSession, ServiceConfig, SubmitOutcome};
use dictamen_core::render;
use dictamen_core::report::Jurisdiction;

mod display;

/// Contract clause analysis against the Dictamen service.
#[derive(Parser, Debug)]
#[command(name = "dictamen", version, about = "Analyze contract clauses for legal risk")]
struct Cli {
    /// Base address of the analysis service. Overrides automatic selection.
    #[arg(long, env = "DICTAMEN_API_BASE", global = true, value_name = "URL")]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a contract clause
    Analyze(AnalyzeArgs),
    /// Check that the analysis service is reachable
    Health,
}

#[derive(Parser, Debug, Clone)]
struct AnalyzeArgs {
    /// Clause text; read from stdin when omitted
    #[arg(value_name = "CLAUSE")]
    clause: Option<String>,

    /// Jurisdiction code: ES, EU, US or INT
    #[arg(short, long, default_value = "ES")]
    jurisdiction: Jurisdiction,

    /// Print the raw report as JSON instead of the card
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    tracing::info!("dictamen v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let config = ServiceConfig {
        base_url: cli.api_base,
        host: None,
    };
    let client = AnalysisClient::new(config.resolve());

    match cli.command {
        Command::Analyze(args) => analyze(client, args).await,
        Command::Health => health(client).await,
    }
}

async fn analyze(client: AnalysisClient, args: AnalyzeArgs) -> anyhow::Result<()> {
    let clause = match args.clause {
        Some(clause) => clause,
        None => read_clause_from_stdin()?,
    };

    let session = AnalysisSession::new(client);
    if session.submit(&clause, args.jurisdiction).await == SubmitOutcome::EmptyClause {
        anyhow::bail!("no clause to analyze: pass one as an argument or on stdin");
    }

    let snapshot = session.snapshot();
    if let Some(message) = snapshot.error {
        anyhow::bail!("analysis failed: {message}");
    }
    if args.json {
        if let Some(report) = &snapshot.report {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        return Ok(());
    }
    if let Some(card) = render(snapshot.report.as_ref()) {
        display::print_report_card(&card);
    }
    Ok(())
}

async fn health(client: AnalysisClient) -> anyhow::Result<()> {
    let report = client.health().await?;
    display::print_health(&report);
    Ok(())
}

fn read_clause_from_stdin() -> anyhow::Result<String> {
    tracing::info!("reading clause from stdin");
    let mut clause = String::new();
    std::io::stdin()
        .read_to_string(&mut clause)
        .context("failed to read clause from stdin")?;
    Ok(clause)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_structure_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn analyze_defaults_to_spanish_jurisdiction() {
        let cli = Cli::parse_from(["dictamen", "analyze", "El Autor renuncia..."]);
        match cli.command {
            Command::Analyze(args) => {
                assert_eq!(args.clause.as_deref(), Some("El Autor renuncia..."));
                assert_eq!(args.jurisdiction, Jurisdiction::ES);
                assert!(!args.json);
            }
            Command::Health => panic!("expected analyze"),
        }
    }

    #[test]
    fn jurisdiction_flag_parses_case_insensitively() {
        let cli = Cli::parse_from(["dictamen", "analyze", "x", "--jurisdiction", "eu"]);
        match cli.command {
            Command::Analyze(args) => assert_eq!(args.jurisdiction, Jurisdiction::EU),
            Command::Health => panic!("expected analyze"),
        }
    }

    #[test]
    fn unknown_jurisdiction_is_rejected() {
        let result = Cli::try_parse_from(["dictamen", "analyze", "x", "--jurisdiction", "MX"]);
        assert!(result.is_err());
    }

    #[test]
    fn api_base_is_global() {
        let cli = Cli::parse_from(["dictamen", "analyze", "x", "--api-base", "http://localhost:9000"]);
        assert_eq!(cli.api_base.as_deref(), Some("http://localhost:9000"));
    }

    #[test]
    fn health_takes_no_arguments() {
        let cli = Cli::parse_from(["dictamen", "health"]);
        assert!(matches!(cli.command, Command::Health));
    }
}
