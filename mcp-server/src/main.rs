use anyhow::Result;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use lode_mcp::config;
use lode_mcp::{BillUseCase, DrawUseCase, MCPHandler, stdio};

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!("Ready to settle today's bills.");

    let price_table = Arc::new(config.price_table()?);

    let bill_use_case = BillUseCase::new(Arc::clone(&price_table));
    let draw_use_case = DrawUseCase::new();

    let handler = MCPHandler::new(Arc::new(bill_use_case), Arc::new(draw_use_case));

    let (reader, writer) = stdio();

    handler.serve(reader, writer).await.inspect_err(|e| {
        tracing::error!("serving error: {:?}", e);
    })?;

    Ok(())
}
