use console::style;
use std::path::Path;

use bridge_config::{ConfigLoader, EnvProvider};
use bridge_core::{BridgeError, DeploymentEnv, Zone};

/// Validate each zone in turn and print every problem, not just the first one.
pub(super) fn cmd_validate(
    zones: &[Zone],
    env: DeploymentEnv,
    config_dir: &Path,
    vars: &dyn EnvProvider,
) -> bridge_core::Result<()> {
    let mut failed = Vec::new();

    for &zone in zones {
        let result = ConfigLoader::new(zone)
            .with_config_dir(config_dir)
            .load_with_env(env, vars);
        match result {
            Ok(config) => {
                println!(
                    "{} {zone} ({env}): {} settings",
                    style("✔").green(),
                    config.values().len()
                );
            }
            Err(e) => {
                println!("{} {zone} ({env})", style("✘").red());
                for line in e.report().to_string().lines() {
                    println!("   {line}");
                }
                failed.push(zone.as_str());
            }
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        Err(BridgeError::Config(format!(
            "{} zone(s) failed validation: {}",
            failed.len(),
            failed.join(", ")
        )))
    }
}
