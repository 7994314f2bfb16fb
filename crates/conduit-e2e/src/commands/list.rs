use anyhow::Result;
use conduit_e2e_core::Suite;
use conduit_e2e_core::config::Config;

/// Scenario ids selected by the configured pattern, in run order.
pub fn selected_ids(config: &Config) -> Result<Vec<String>> {
    let scenarios = Suite::builtin().select(&config.spec_pattern)?;
    Ok(scenarios.iter().map(|s| s.id()).collect())
}

pub fn execute(config: &Config) -> Result<()> {
    let ids = selected_ids(config)?;
    for id in &ids {
        println!("{id}");
    }
    println!("\n{} scenarios match '{}'", ids.len(), config.spec_pattern);
    Ok(())
}
