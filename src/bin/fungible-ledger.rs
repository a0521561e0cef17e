use std::fs::File;

use anyhow::{Context, Result};
use fungible_ledger::{
    account::{AccountId, Amount},
    bin_utils::Service,
    ledger::{Ledger, LedgerEvent},
    processor::{LedgerProcessError, in_memory_processor::InMemoryLedgerProcessor},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let filename = args
        .next()
        .context("Expected an operations file name as the first argument")?;
    let admin: AccountId = args
        .next()
        .context("Expected the admin account as the second argument")?
        .parse()?;
    let initial_supply = args
        .next()
        .context("Expected the initial supply as the third argument")?;
    let initial_supply = Amount::from_dec_str(&initial_supply)
        .map_err(|err| anyhow::anyhow!("Invalid initial supply `{initial_supply}`: {err:?}"))?;
    let file = File::open(&filename).with_context(|| format!("Failed to open `{filename}`"))?;

    let service = Service {
        input: file,
        output: &mut std::io::stdout(),
        processor: InMemoryLedgerProcessor::new(Ledger::new(initial_supply, admin)),
        error_printer: Box::new(|line, err| {
            match err {
                LedgerProcessError::CommandErr(err) => {
                    eprintln!("Error at line {line}: {err}")
                }
                LedgerProcessError::LedgerErr(err) => {
                    // rejected operations are normal ledger outcomes, not input errors
                    info!(line, %err, "operation rejected");
                }
            }
        }),
        event_sink: Box::new(|event| match event {
            LedgerEvent::Transfer {
                from,
                to,
                value,
                operator,
            } => info!(%from, %to, %value, %operator, "Transfer"),
            LedgerEvent::Approval {
                owner,
                spender,
                value,
            } => info!(%owner, %spender, %value, "Approval"),
        }),
    };
    service.run()
}
