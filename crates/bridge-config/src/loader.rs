use serde_json::{Map, Value, json};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bridge_core::{
    BASE_CONFIG_FILE, BridgeError, DeploymentEnv, LOCAL_CONFIG_FILE, Result, StructuredLogger, Zone,
};

use crate::env::{EnvProvider, ProcessEnv};
use crate::record::ZoneConfig;
use crate::schema::{DEPLOYMENT_ENV_KEY, ZoneSchema, validate_config};

/// Directory searched when the caller does not name one.
pub const DEFAULT_CONFIG_DIR: &str = "cdk";

/// A config file that was found and parsed.
#[derive(Debug, Clone)]
pub struct ConfigLayer {
    pub path: PathBuf,
    pub values: Map<String, Value>,
}

/// Loads one zone's configuration from layered JSON files plus environment overrides.
///
/// Precedence, lowest to highest: `cdk.config.json`, `cdk.config.local.json`,
/// `cdk.config.{env}.json` (required), then environment variables. The
/// `deploymentEnv` key always ends up equal to the requested environment.
pub struct ConfigLoader {
    schema: ZoneSchema,
    config_dir: PathBuf,
    logger: StructuredLogger,
}

impl ConfigLoader {
    pub fn new(zone: Zone) -> Self {
        Self::for_schema(*ZoneSchema::for_zone(zone))
    }

    pub fn for_schema(schema: ZoneSchema) -> Self {
        Self {
            schema,
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            logger: StructuredLogger::new(schema.zone.as_str()),
        }
    }

    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = dir.into();
        self
    }

    /// Candidate files, lowest precedence first.
    pub fn layer_paths(&self, env: DeploymentEnv) -> [PathBuf; 3] {
        [
            self.config_dir.join(BASE_CONFIG_FILE),
            self.config_dir.join(LOCAL_CONFIG_FILE),
            self.config_dir.join(env.config_file_name()),
        ]
    }

    /// Read every present layer. The environment file is checked first so a
    /// missing one is reported even when the optional files are broken.
    pub fn read_layers(&self, env: DeploymentEnv) -> Result<Vec<ConfigLayer>> {
        let [base, local, env_file] = self.layer_paths(env);
        if !env_file.is_file() {
            return Err(BridgeError::missing_required_file(&env_file));
        }

        let mut layers = Vec::with_capacity(3);
        for path in [base, local] {
            match read_config_file(&path)? {
                Some(values) => layers.push(ConfigLayer { path, values }),
                None => {
                    self.logger.debug(
                        "read",
                        "optional config file not present",
                        json!({ "file": file_label(&path) }),
                    );
                }
            }
        }

        let values = read_config_file(&env_file)?
            .ok_or_else(|| BridgeError::missing_required_file(&env_file))?;
        layers.push(ConfigLayer {
            path: env_file,
            values,
        });
        Ok(layers)
    }

    pub fn load_with_env(&self, env: DeploymentEnv, vars: &dyn EnvProvider) -> Result<ZoneConfig> {
        let layers = self.read_layers(env)?;
        let files: Vec<String> = layers.iter().map(|l| file_label(&l.path)).collect();

        let merged = merge_layers(layers.iter().map(|l| &l.values));
        let merged = normalize_optional(&self.schema, merged);

        let unknown = self.schema.unknown_keys(&merged);
        if !unknown.is_empty() && !self.schema.strict {
            self.logger.warn(
                "merge",
                "ignoring unrecognized config keys",
                json!({ "keys": unknown }),
            );
        }

        let overridden = overridden_fields(&self.schema, vars);
        let merged = apply_env_overrides(&self.schema, merged, vars);
        let merged = force_deployment_env(merged, env);

        let config = validate_config(&self.schema, &merged).inspect_err(|e| {
            let fields: Vec<&str> = e.issues().iter().map(|i| i.field.as_str()).collect();
            self.logger.error(
                "validate",
                "configuration rejected",
                json!({ "env": env.as_str(), "fields": fields }),
            );
        })?;

        self.logger.info(
            "load",
            "configuration loaded",
            json!({ "env": env.as_str(), "files": files, "envOverrides": overridden }),
        );
        Ok(config)
    }
}

/// Load `zone`'s configuration for `environment`; `config_dir` defaults to [`DEFAULT_CONFIG_DIR`].
pub fn load_config(zone: Zone, environment: DeploymentEnv, config_dir: Option<&Path>) -> Result<ZoneConfig> {
    load_config_with_env(zone, environment, config_dir, &ProcessEnv)
}

pub fn load_config_with_env(
    zone: Zone,
    environment: DeploymentEnv,
    config_dir: Option<&Path>,
    vars: &dyn EnvProvider,
) -> Result<ZoneConfig> {
    let mut loader = ConfigLoader::new(zone);
    if let Some(dir) = config_dir {
        loader = loader.with_config_dir(dir);
    }
    loader.load_with_env(environment, vars)
}

/// Read one JSON object file. `Ok(None)` when the file does not exist.
pub fn read_config_file(path: &Path) -> Result<Option<Map<String, Value>>> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let file = file_label(path);
    let text = String::from_utf8(bytes).map_err(|_| BridgeError::FileParse {
        file: file.clone(),
        reason: "file is not valid UTF-8".into(),
    })?;
    let value: Value = serde_json::from_str(&text).map_err(|e| BridgeError::FileParse {
        file: file.clone(),
        reason: e.to_string(),
    })?;

    match value {
        Value::Object(map) => Ok(Some(map)),
        other => Err(BridgeError::FileParse {
            file,
            reason: format!("expected a JSON object, found {}", json_kind(&other)),
        }),
    }
}

/// Shallow merge: later layers replace same-named keys wholesale, mappings included.
pub fn merge_layers<'a>(layers: impl IntoIterator<Item = &'a Map<String, Value>>) -> Map<String, Value> {
    let mut merged = Map::new();
    for layer in layers {
        for (k, v) in layer {
            merged.insert(k.clone(), v.clone());
        }
    }
    merged
}

/// Drop optional settings that are null or blank strings: for optional
/// fields, empty means "not set".
pub fn normalize_optional(schema: &ZoneSchema, record: Map<String, Value>) -> Map<String, Value> {
    record
        .into_iter()
        .filter(|(k, v)| {
            let optional = schema.field(k).is_some_and(|f| !f.required);
            !(optional && is_blank(v))
        })
        .collect()
}

/// Apply environment-variable overrides. A non-blank (trimmed) variable wins
/// over the file value. Secret fields are trimmed and dropped when empty.
/// The result is not re-validated.
pub fn apply_env_overrides(
    schema: &ZoneSchema,
    mut record: Map<String, Value>,
    vars: &dyn EnvProvider,
) -> Map<String, Value> {
    for spec in schema.fields {
        let Some(var) = spec.env_var else { continue };

        if let Some(v) = vars.non_blank(var) {
            record.insert(spec.name.into(), Value::String(v));
            continue;
        }

        if spec.secret {
            let trimmed = match record.get(spec.name) {
                Some(Value::String(s)) => Some(s.trim().to_string()),
                _ => None,
            };
            match trimmed {
                Some(t) if t.is_empty() => record = without_key(record, spec.name),
                Some(t) => {
                    record.insert(spec.name.into(), Value::String(t));
                }
                None => {}
            }
        }
    }
    record
}

/// Names of the settings an environment variable currently overrides.
pub fn overridden_fields(schema: &ZoneSchema, vars: &dyn EnvProvider) -> Vec<&'static str> {
    schema
        .env_overrides()
        .filter(|(_, var)| vars.non_blank(var).is_some())
        .map(|(field, _)| field)
        .collect()
}

fn force_deployment_env(mut record: Map<String, Value>, env: DeploymentEnv) -> Map<String, Value> {
    record.insert(
        DEPLOYMENT_ENV_KEY.into(),
        Value::String(env.as_str().into()),
    );
    record
}

fn without_key(record: Map<String, Value>, key: &str) -> Map<String, Value> {
    record.into_iter().filter(|(k, _)| k != key).collect()
}

fn is_blank(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
