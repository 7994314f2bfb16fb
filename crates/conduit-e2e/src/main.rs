use anyhow::Result;
use conduit_e2e::commands::run_app;
use conduit_e2e::ux;

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = run_app().await {
        ux::present_error(e);
        std::process::exit(1);
    }
    Ok(())
}
