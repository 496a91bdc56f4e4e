//! `piawe` command line entry point.
//!
//! `piawe report` prints the weekly payment report for a roster as JSON on
//! stdout. `piawe serve` exposes the same engine over HTTP.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use piawe_engine::api::{AppState, create_router};
use piawe_engine::calculation::ReportBuilder;
use piawe_engine::config::{InputLoader, parse_report_date};

#[derive(Parser)]
#[command(name = "piawe")]
#[command(about = "Weekly PIAWE payment reports for injured workers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a payment report and print it as JSON
    Report {
        /// People document (JSON or YAML) with a top-level `people` array
        #[arg(long, short = 'p', env = "PIAWE_PEOPLE")]
        people: PathBuf,

        /// Rules document (JSON or YAML) with a top-level `rules` array
        #[arg(long, short = 'r', env = "PIAWE_RULES")]
        rules: PathBuf,

        /// Report date as YYYY/MM/DD (defaults to today)
        #[arg(long, short = 'd', env = "PIAWE_REPORT_DATE")]
        date: Option<String>,
    },

    /// Serve POST /report over HTTP
    Serve {
        /// Rules document (JSON or YAML) with a top-level `rules` array
        #[arg(long, short = 'r', env = "PIAWE_RULES")]
        rules: PathBuf,

        /// Address to listen on
        #[arg(long, env = "PIAWE_ADDR", default_value = "127.0.0.1:3000")]
        addr: SocketAddr,
    },
}

/// Logs go to stderr so stdout carries only the report.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn run_report(people: PathBuf, rules: PathBuf, date: Option<String>) -> Result<()> {
    let report_date = match date {
        Some(text) => parse_report_date(&text)?,
        None => Local::now().date_naive(),
    };

    let loader = InputLoader::load(&people, &rules)?;
    let report = loader.report(report_date)?;
    let rendered = serde_json::to_string_pretty(&report).context("failed to render report")?;
    println!("{rendered}");
    Ok(())
}

async fn run_server(rules: PathBuf, addr: SocketAddr) -> Result<()> {
    let records = InputLoader::load_rules(&rules)?;
    let builder = ReportBuilder::from_rule_records(&records)?;
    info!(rules = builder.rule_table().len(), path = %rules.display(), "Rule table loaded");

    let router = create_router(AppState::new(builder));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "Listening");

    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    match Cli::parse().command {
        Command::Report {
            people,
            rules,
            date,
        } => run_report(people, rules, date),
        Command::Serve { rules, addr } => run_server(rules, addr).await,
    }
}
