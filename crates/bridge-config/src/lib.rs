//! # bridge-config
//!
//! Configuration system for the bridge zones. Reads `cdk.config.json`,
//! `cdk.config.local.json` and `cdk.config.{env}.json`, then environment
//! variables, in that precedence order, and validates the result against the
//! zone's schema.

pub mod env;
pub mod loader;
pub mod record;
pub mod rules;
pub mod schema;
pub mod zones;

pub use env::{EnvProvider, MapEnv, ProcessEnv, resolve_deployment_env};
pub use loader::{
    ConfigLayer, ConfigLoader, DEFAULT_CONFIG_DIR, apply_env_overrides, load_config,
    load_config_with_env, merge_layers,
};
pub use record::ZoneConfig;
pub use rules::Rule;
pub use schema::{FieldSpec, ZoneSchema, validate_config};
pub use zones::{
    DocsConfig, ExecutionConfig, VerificationConfig, WebFetchConfig, ZoneSettings, load_zone,
    primary_stack_field,
};
