use std::path::Path;

use bridge_config::ZoneSchema;
use bridge_core::{DeploymentEnv, EXAMPLE_CONFIG_FILE, Zone};

/// Write a template `cdk.config.{env}.json` (and the shared example) for a zone.
pub(super) fn cmd_init(
    zone: Zone,
    env: DeploymentEnv,
    config_dir: &Path,
    force: bool,
) -> bridge_core::Result<()> {
    std::fs::create_dir_all(config_dir)?;
    let template = ZoneSchema::for_zone(zone).example_template(env);
    let rendered = format!("{}\n", serde_json::to_string_pretty(&template)?);

    let example_path = config_dir.join(EXAMPLE_CONFIG_FILE);
    if !example_path.exists() {
        std::fs::write(&example_path, &rendered)?;
        println!("✅ Created {}", example_path.display());
    }

    let config_path = config_dir.join(env.config_file_name());
    if config_path.exists() && !force {
        println!("⚠️  {} already exists", config_path.display());
        println!("   Pass --force to overwrite it.");
        return Ok(());
    }

    std::fs::write(&config_path, rendered)?;
    println!("✅ Created {}", config_path.display());
    println!("   Replace the placeholder values, then run: bridge validate --env {env}");
    Ok(())
}
