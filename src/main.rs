use anyhow::Result;
use tasktally::cli::run_cli;
use tracing::error;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    run_cli().await.inspect_err(|e| {
        error!("Command failed: {e:?}");
    })?;
    Ok(())
}
