use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use console::style;
use std::path::{Path, PathBuf};

use bridge_config::{
    ConfigLoader, EnvProvider, ProcessEnv, ZoneSchema, primary_stack_field, resolve_deployment_env,
};
use bridge_core::{DeploymentEnv, Zone};

mod init;
mod validate;

/// Slack-to-Bedrock bridge — zone configuration tooling
#[derive(Parser)]
#[command(name = "bridge", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding the cdk.config*.json files
    #[arg(short, long, global = true, env = "BRIDGE_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Deployment environment: dev or prod (falls back to DEPLOYMENT_ENV, then dev)
    #[arg(short, long, global = true)]
    env: Option<String>,

    /// Zone to operate on: verification, execution, docs, web-fetch
    #[arg(short, long, global = true, default_value = "verification")]
    zone: String,

    /// Log level override (e.g. debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all log output (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and print the merged configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Print secret values instead of redacting them
        #[arg(long)]
        reveal_secrets: bool,
    },
    /// Validate configuration and list every problem found
    Validate {
        /// Validate every zone, not just --zone
        #[arg(long)]
        all: bool,
    },
    /// Write a starting-point cdk.config.{env}.json for the zone
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the standard tags applied to the zone's stack resources
    Tags,
    /// List the environment variables that override file settings
    Env,
    /// Show version and build info
    Version,
    /// Generate shell completions for bash, zsh, or fish
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Run against the real process environment.
    pub fn run(self) -> bridge_core::Result<()> {
        self.run_with_env(&ProcessEnv)
    }

    /// Run with `vars` supplying `DEPLOYMENT_ENV` and every config override.
    pub fn run_with_env(self, vars: &dyn EnvProvider) -> bridge_core::Result<()> {
        // Resolve log level: --verbose > --quiet > --log-level > warn
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            self.log_level.as_deref().unwrap_or("warn")
        };
        init_tracing(log_level, self.json_logs);

        let zone: Zone = self.zone.parse()?;
        let config_dir = self
            .config_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(bridge_config::DEFAULT_CONFIG_DIR));

        match self.command {
            Commands::Show {
                json,
                reveal_secrets,
            } => {
                let env = resolve_deployment_env(self.env.as_deref(), vars)?;
                Self::cmd_show(zone, env, &config_dir, vars, json, reveal_secrets)
            }
            Commands::Validate { all } => {
                let env = resolve_deployment_env(self.env.as_deref(), vars)?;
                let zones = if all { Zone::ALL.to_vec() } else { vec![zone] };
                validate::cmd_validate(&zones, env, &config_dir, vars)
            }
            Commands::Init { force } => {
                let env = resolve_deployment_env(self.env.as_deref(), vars)?;
                init::cmd_init(zone, env, &config_dir, force)
            }
            Commands::Tags => {
                let env = resolve_deployment_env(self.env.as_deref(), vars)?;
                Self::cmd_tags(zone, env, &config_dir, vars)
            }
            Commands::Env => Self::cmd_env(zone, vars),
            Commands::Version => Self::cmd_version(),
            Commands::Completions { shell } => Self::cmd_completions(shell),
        }
    }

    fn cmd_show(
        zone: Zone,
        env: DeploymentEnv,
        config_dir: &Path,
        vars: &dyn EnvProvider,
        json: bool,
        reveal_secrets: bool,
    ) -> bridge_core::Result<()> {
        let config = ConfigLoader::new(zone)
            .with_config_dir(config_dir)
            .load_with_env(env, vars)?;
        let view = config.to_json(reveal_secrets);

        if json {
            println!("{}", serde_json::to_string_pretty(&view)?);
            return Ok(());
        }

        println!(
            "{} {} ({})",
            style("Zone").bold(),
            style(zone).cyan(),
            style(env).yellow()
        );
        if let Some(stack) = config.stack_name(primary_stack_field(zone)) {
            println!("   stack: {stack}");
        }
        println!("{}", "-".repeat(60));
        if let Some(map) = view.as_object() {
            let width = map.keys().map(|k| k.len()).max().unwrap_or(0);
            for (key, value) in map {
                let rendered = match value.as_str() {
                    Some(s) => s.to_string(),
                    None => value.to_string(),
                };
                println!("  {key:<width$}  {rendered}");
            }
        }
        Ok(())
    }

    fn cmd_tags(
        zone: Zone,
        env: DeploymentEnv,
        config_dir: &Path,
        vars: &dyn EnvProvider,
    ) -> bridge_core::Result<()> {
        let config = ConfigLoader::new(zone)
            .with_config_dir(config_dir)
            .load_with_env(env, vars)?;
        let field = primary_stack_field(zone);
        let tags = config.standard_tags(field).ok_or_else(|| {
            bridge_core::BridgeError::Config(format!("{field} is not set for zone {zone}"))
        })?;

        for (key, value) in tags.pairs() {
            println!("{key}={value}");
        }
        Ok(())
    }

    fn cmd_env(zone: Zone, vars: &dyn EnvProvider) -> bridge_core::Result<()> {
        let schema = ZoneSchema::for_zone(zone);
        println!("{} overrides for zone {}", style("Environment").bold(), zone);
        for (field, var) in schema.env_overrides() {
            let state = if vars.non_blank(var).is_some() {
                style("set").green()
            } else {
                style("unset").dim()
            };
            println!("  {var:<24} → {field:<24} {state}");
        }
        Ok(())
    }

    fn cmd_version() -> bridge_core::Result<()> {
        println!("bridge v{}", env!("CARGO_PKG_VERSION"));
        println!("   Target: {}", std::env::consts::ARCH);
        println!("   OS: {}", std::env::consts::OS);
        #[cfg(debug_assertions)]
        println!("   Profile: debug");
        #[cfg(not(debug_assertions))]
        println!("   Profile: release");
        Ok(())
    }

    fn cmd_completions(shell: Shell) -> bridge_core::Result<()> {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "bridge", &mut std::io::stdout());
        Ok(())
    }
}

fn init_tracing(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    // try_init: a subscriber may already be installed (tests, embedding).
    let _ = if json {
        builder.json().with_target(true).try_init()
    } else {
        builder.with_target(false).try_init()
    };
}
