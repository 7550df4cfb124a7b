use anyhow::{Context, Result};
use edgarscraper::{config::PipelineConfig, export, pipeline};
use reqwest::Client;
use std::env;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Environment overrides for the default config, so one binary serves
/// multiple entities without a rebuild.
fn config_from_env() -> PipelineConfig {
    let mut cfg = PipelineConfig::default();
    if let Ok(ticker) = env::var("EDGAR_TICKER") {
        cfg.ticker = ticker;
    }
    if let Ok(cik) = env::var("EDGAR_CIK") {
        cfg.cik = cik;
    }
    if let Ok(ua) = env::var("EDGAR_USER_AGENT") {
        cfg.user_agent = ua;
    }
    if let Ok(phrase) = env::var("EDGAR_TARGET_PHRASE") {
        cfg.target_phrase = phrase;
    }
    if let Ok(count) = env::var("EDGAR_FILING_COUNT") {
        match count.parse() {
            Ok(n) => cfg.filing_count = n,
            Err(_) => warn!(value = %count, "ignoring bad EDGAR_FILING_COUNT"),
        }
    }
    if let Ok(path) = env::var("EDGAR_OUTPUT") {
        cfg.output_path = path;
    } else {
        cfg.output_path = format!(
            "{}_Last{}Filings_BalanceSheets_withMaster.xlsx",
            cfg.ticker, cfg.filing_count
        );
    }
    cfg
}

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) config + client ──────────────────────────────────────────
    let cfg = config_from_env();
    info!(ticker = %cfg.ticker, cik = %cfg.cik, count = cfg.filing_count, "configured");
    let client = Client::builder()
        .user_agent(cfg.user_agent.clone())
        .build()
        .context("building HTTP client")?;

    // ─── 3) fetch, segment and merge all filings ─────────────────────
    let output = pipeline::run(&client, &cfg).await?;
    if output.skipped > 0 {
        warn!(
            skipped = output.skipped,
            kept = output.raw_sheets.len(),
            "partial run: some filings were skipped"
        );
    }

    // ─── 4) write the workbook ───────────────────────────────────────
    export::write_workbook(&cfg.output_path, &output.raw_sheets, &output.master)?;
    info!(
        path = %cfg.output_path,
        filings = output.raw_sheets.len(),
        "done"
    );
    Ok(())
}
