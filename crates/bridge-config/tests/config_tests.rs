#[cfg(test)]
mod tests {
    use bridge_config::*;
    use bridge_core::{BridgeError, DeploymentEnv, Zone};
    use serde_json::{Value, json};
    use std::path::Path;

    fn write(dir: &Path, name: &str, value: &Value) {
        std::fs::write(dir.join(name), serde_json::to_string_pretty(value).unwrap()).unwrap();
    }

    fn scenario_dev_file() -> Value {
        json!({
            "awsRegion": "ap-northeast-1",
            "bedrockModelId": "m1",
            "verificationStackName": "Vfy",
            "executionStackName": "Exec",
            "verificationAccountId": "123456789012",
            "executionAccountId": "123456789013"
        })
    }

    fn load(dir: &Path, env: DeploymentEnv, vars: &MapEnv) -> bridge_core::Result<ZoneConfig> {
        load_config_with_env(Zone::Verification, env, Some(dir), vars)
    }

    // ── Example scenarios ──────────────────────────────────────

    #[test]
    fn test_only_env_file_loads_exact_values() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "cdk.config.dev.json", &scenario_dev_file());

        let config = load(dir.path(), DeploymentEnv::Dev, &MapEnv::new()).unwrap();
        assert_eq!(config.zone(), Zone::Verification);
        assert_eq!(config.deployment_env(), DeploymentEnv::Dev);
        assert_eq!(config.get("awsRegion"), Some("ap-northeast-1"));
        assert_eq!(config.get("bedrockModelId"), Some("m1"));
        assert_eq!(config.get("verificationStackName"), Some("Vfy"));
        assert_eq!(config.get("executionStackName"), Some("Exec"));
        assert_eq!(config.get("verificationAccountId"), Some("123456789012"));
        assert_eq!(config.get("executionAccountId"), Some("123456789013"));
        assert_eq!(config.get("deploymentEnv"), Some("dev"));
        assert_eq!(config.stack_name("verificationStackName").as_deref(), Some("Vfy-Dev"));
    }

    #[test]
    fn test_missing_model_id_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = scenario_dev_file();
        file.as_object_mut().unwrap().remove("bedrockModelId");
        write(dir.path(), "cdk.config.dev.json", &file);

        let err = load(dir.path(), DeploymentEnv::Dev, &MapEnv::new()).unwrap_err();
        assert!(matches!(err, BridgeError::Validation { .. }));
        assert!(err.to_string().contains("bedrockModelId: bedrockModelId is required"));
    }

    #[test]
    fn test_env_file_region_beats_base_file() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "cdk.config.json", &json!({ "awsRegion": "us-east-1" }));
        write(dir.path(), "cdk.config.dev.json", &scenario_dev_file());

        let config = load(dir.path(), DeploymentEnv::Dev, &MapEnv::new()).unwrap();
        assert_eq!(config.get("awsRegion"), Some("ap-northeast-1"));
    }

    #[test]
    fn test_env_var_overrides_account_id() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "cdk.config.dev.json", &scenario_dev_file());
        let vars = MapEnv::new().with("VERIFICATION_ACCOUNT_ID", "999999999999");

        let config = load(dir.path(), DeploymentEnv::Dev, &vars).unwrap();
        assert_eq!(config.get("verificationAccountId"), Some("999999999999"));
    }

    #[test]
    fn test_env_var_overrides_execution_agent_arn() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = scenario_dev_file();
        file["executionAgentArn"] =
            json!("arn:aws:bedrock-agentcore:ap-northeast-1:123456789013:runtime/from-file");
        write(dir.path(), "cdk.config.dev.json", &file);
        let arn = "arn:aws:bedrock-agentcore:ap-northeast-1:123456789013:runtime/from-env";
        let vars = MapEnv::new().with("EXECUTION_AGENT_ARN", arn);

        let config = load(dir.path(), DeploymentEnv::Dev, &vars).unwrap();
        assert_eq!(config.get("executionAgentArn"), Some(arn));
    }

    #[test]
    fn test_env_var_overrides_verification_agent_arn() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "cdk.config.prod.json",
            &json!({
                "awsRegion": "ap-northeast-1",
                "bedrockModelId": "m1",
                "executionStackName": "Exec",
                "verificationAccountId": "123456789012",
                "executionAccountId": "123456789013"
            }),
        );
        let arn = "arn:aws:bedrock-agentcore:ap-northeast-1:123456789012:runtime/verifier";
        let vars = MapEnv::new().with("VERIFICATION_AGENT_ARN", arn);

        let config =
            load_config_with_env(Zone::Execution, DeploymentEnv::Prod, Some(dir.path()), &vars).unwrap();
        assert_eq!(config.get("verificationAgentArn"), Some(arn));

        let bad = MapEnv::new().with("VERIFICATION_AGENT_ARN", "not-an-arn");
        let err = load_config_with_env(Zone::Execution, DeploymentEnv::Prod, Some(dir.path()), &bad)
            .unwrap_err();
        assert_eq!(err.issues()[0].field, "verificationAgentArn");
    }

    #[test]
    fn test_staging_rejected_before_loading() {
        let err = resolve_deployment_env(Some("staging"), &MapEnv::new()).unwrap_err();
        let report = err.report();
        let remediation = report.remediation.unwrap();
        assert!(remediation.contains("dev"));
        assert!(remediation.contains("prod"));
    }

    #[test]
    fn test_empty_execution_agent_arn_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = scenario_dev_file();
        file["executionAgentArn"] = json!("");
        write(dir.path(), "cdk.config.dev.json", &file);

        let config = load(dir.path(), DeploymentEnv::Dev, &MapEnv::new()).unwrap();
        assert!(!config.values().contains_key("executionAgentArn"));
        assert_eq!(config.get("executionAgentArn"), None);
    }

    // ── Precedence ─────────────────────────────────────────────

    #[test]
    fn test_three_layer_precedence() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "cdk.config.json",
            &json!({ "bedrockModelId": "base", "verificationAgentName": "BaseAgent", "awsRegion": "us-east-1" }),
        );
        write(
            dir.path(),
            "cdk.config.local.json",
            &json!({ "bedrockModelId": "local", "verificationAgentName": "LocalAgent" }),
        );
        let mut env_file = scenario_dev_file();
        env_file.as_object_mut().unwrap().remove("awsRegion");
        env_file["bedrockModelId"] = json!("env");
        write(dir.path(), "cdk.config.dev.json", &env_file);

        let config = load(dir.path(), DeploymentEnv::Dev, &MapEnv::new()).unwrap();
        assert_eq!(config.get("bedrockModelId"), Some("env"));
        assert_eq!(config.get("verificationAgentName"), Some("LocalAgent"));
        assert_eq!(config.get("awsRegion"), Some("us-east-1"));
    }

    #[test]
    fn test_env_var_beats_every_file() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "cdk.config.local.json", &json!({ "bedrockModelId": "local" }));
        write(dir.path(), "cdk.config.dev.json", &scenario_dev_file());
        let vars = MapEnv::new().with("BEDROCK_MODEL_ID", "  from-env  ");

        let config = load(dir.path(), DeploymentEnv::Dev, &vars).unwrap();
        assert_eq!(config.get("bedrockModelId"), Some("from-env"));
    }

    #[test]
    fn test_env_var_can_satisfy_required_field() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = scenario_dev_file();
        file.as_object_mut().unwrap().remove("bedrockModelId");
        write(dir.path(), "cdk.config.dev.json", &file);
        let vars = MapEnv::new().with("BEDROCK_MODEL_ID", "m2");

        let config = load(dir.path(), DeploymentEnv::Dev, &vars).unwrap();
        assert_eq!(config.get("bedrockModelId"), Some("m2"));
    }

    #[test]
    fn test_deployment_env_forced() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = scenario_dev_file();
        file["deploymentEnv"] = json!("dev");
        write(dir.path(), "cdk.config.json", &json!({ "deploymentEnv": "staging" }));
        write(dir.path(), "cdk.config.prod.json", &file);

        let config = load(dir.path(), DeploymentEnv::Prod, &MapEnv::new()).unwrap();
        assert_eq!(config.deployment_env(), DeploymentEnv::Prod);
        assert_eq!(config.get("deploymentEnv"), Some("prod"));
        assert_eq!(config.stack_name("executionStackName").as_deref(), Some("Exec-Prod"));
    }

    #[test]
    fn test_higher_layer_empty_string_clears_optional() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "cdk.config.json", &json!({ "verificationAgentName": "BaseAgent" }));
        let mut file = scenario_dev_file();
        file["verificationAgentName"] = json!("");
        write(dir.path(), "cdk.config.dev.json", &file);

        let config = load(dir.path(), DeploymentEnv::Dev, &MapEnv::new()).unwrap();
        assert_eq!(config.get("verificationAgentName"), None);
    }

    // ── Failures ───────────────────────────────────────────────

    #[test]
    fn test_missing_env_file_wins_over_broken_optional_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cdk.config.json"), "{ not json").unwrap();
        std::fs::write(dir.path().join("cdk.config.local.json"), "[]").unwrap();

        let err = load(dir.path(), DeploymentEnv::Prod, &MapEnv::new()).unwrap_err();
        match &err {
            BridgeError::MissingRequiredFile { path, expected } => {
                assert_eq!(path, &dir.path().join("cdk.config.prod.json"));
                assert_eq!(expected, "cdk.config.prod.json");
            }
            other => panic!("expected MissingRequiredFile, got {other}"),
        }
        assert!(err.to_string().contains("cdk.config.prod.json"));
    }

    #[test]
    fn test_parse_error_names_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cdk.config.local.json"), "{ \"awsRegion\": ").unwrap();
        write(dir.path(), "cdk.config.dev.json", &scenario_dev_file());

        let err = load(dir.path(), DeploymentEnv::Dev, &MapEnv::new()).unwrap_err();
        match &err {
            BridgeError::FileParse { file, reason } => {
                assert_eq!(file, "cdk.config.local.json");
                assert!(reason.contains("EOF while parsing"));
            }
            other => panic!("expected FileParse, got {other}"),
        }
        let message = err.to_string();
        assert!(message.contains("cdk.config.local.json"));
        assert!(message.contains("EOF while parsing"));
        assert!(!message.contains(&dir.path().display().to_string()));
    }

    #[test]
    fn test_non_utf8_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cdk.config.json"), [b'{', 0xff, 0xfe, b'}']).unwrap();
        write(dir.path(), "cdk.config.dev.json", &scenario_dev_file());

        let err = load(dir.path(), DeploymentEnv::Dev, &MapEnv::new()).unwrap_err();
        match &err {
            BridgeError::FileParse { file, reason } => {
                assert_eq!(file, "cdk.config.json");
                assert!(reason.contains("UTF-8"));
            }
            other => panic!("expected FileParse, got {other}"),
        }
    }

    #[test]
    fn test_non_ascii_digits_fail_validation() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = scenario_dev_file();
        file["verificationAccountId"] = json!("１２３４５６７８９０１２");
        file["executionAccountId"] = json!("١٢٣٤٥٦٧٨٩٠١٢");
        file["awsRegion"] = json!("ap-northeast-١");
        write(dir.path(), "cdk.config.dev.json", &file);

        let err = load(dir.path(), DeploymentEnv::Dev, &MapEnv::new()).unwrap_err();
        let fields: Vec<&str> = err.issues().iter().map(|i| i.field.as_str()).collect();
        assert!(fields.contains(&"awsRegion"));
        assert!(fields.contains(&"verificationAccountId"));
        assert!(fields.contains(&"executionAccountId"));
    }

    #[test]
    fn test_non_object_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cdk.config.dev.json"), "[1, 2]").unwrap();
        let err = load(dir.path(), DeploymentEnv::Dev, &MapEnv::new()).unwrap_err();
        assert!(err.to_string().contains("expected a JSON object"));
    }

    #[test]
    fn test_every_violation_enumerated() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "cdk.config.dev.json",
            &json!({
                "awsRegion": "tokyo",
                "verificationStackName": "Vfy",
                "executionStackName": "",
                "verificationAccountId": "12345",
                "executionAccountId": "123456789013",
                "verificationAgentName": "1bad",
                "executionAgentArn": "arn:aws:lambda:ap-northeast-1:123456789012:function/x"
            }),
        );

        let err = load(dir.path(), DeploymentEnv::Dev, &MapEnv::new()).unwrap_err();
        let fields: Vec<&str> = err.issues().iter().map(|i| i.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "awsRegion",
                "bedrockModelId",
                "executionStackName",
                "verificationAccountId",
                "verificationAgentName",
                "executionAgentArn",
            ]
        );
        let msg = err.to_string();
        for field in fields {
            assert!(msg.contains(&format!("{field}: ")), "missing {field} in {msg}");
        }
    }

    #[test]
    fn test_secret_values_never_in_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = scenario_dev_file();
        file["slackBotToken"] = json!(12345);
        write(dir.path(), "cdk.config.dev.json", &file);

        let err = load(dir.path(), DeploymentEnv::Dev, &MapEnv::new()).unwrap_err();
        assert_eq!(err.issues()[0].reason, "slackBotToken must be a string");
        assert!(!err.to_string().contains("12345"));
    }

    // ── Secrets & idempotence ──────────────────────────────────

    #[test]
    fn test_secret_override_trimmed_and_redacted() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = scenario_dev_file();
        file["slackSigningSecret"] = json!("  file-secret ");
        write(dir.path(), "cdk.config.dev.json", &file);
        let vars = MapEnv::new().with("SLACK_BOT_TOKEN", " xoxb-env ");

        let config = load(dir.path(), DeploymentEnv::Dev, &vars).unwrap();
        assert_eq!(config.get("slackBotToken"), Some("xoxb-env"));
        assert_eq!(config.get("slackSigningSecret"), Some("file-secret"));

        let shown = config.to_json(false);
        assert_eq!(shown["slackBotToken"], "[REDACTED]");
        assert!(!format!("{config:?}").contains("xoxb-env"));
        assert_eq!(config.to_json(true)["slackBotToken"], "xoxb-env");
    }

    #[test]
    fn test_loading_twice_is_identical() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "cdk.config.json", &json!({ "verificationAgentName": "Shared" }));
        write(dir.path(), "cdk.config.dev.json", &scenario_dev_file());
        let vars = MapEnv::new().with("AWS_REGION", "eu-west-1");

        let first = load(dir.path(), DeploymentEnv::Dev, &vars).unwrap();
        let second = load(dir.path(), DeploymentEnv::Dev, &vars).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_keys_ignored_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = scenario_dev_file();
        file["legacySetting"] = json!("x");
        write(dir.path(), "cdk.config.dev.json", &file);

        let config = load(dir.path(), DeploymentEnv::Dev, &MapEnv::new()).unwrap();
        assert!(config.values().get("legacySetting").is_none());
    }

    #[test]
    fn test_strict_loader_rejects_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = scenario_dev_file();
        file["legacySetting"] = json!("x");
        write(dir.path(), "cdk.config.dev.json", &file);

        let schema = ZoneSchema::for_zone(Zone::Verification).with_strict(true);
        let err = ConfigLoader::for_schema(schema)
            .with_config_dir(dir.path())
            .load_with_env(DeploymentEnv::Dev, &MapEnv::new())
            .unwrap_err();
        assert_eq!(err.issues()[0].field, "legacySetting");
    }

    // ── Typed zones ────────────────────────────────────────────

    #[test]
    fn test_typed_verification_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = scenario_dev_file();
        file["executionAgentArns"] = json!({
            "docs": "arn:aws:bedrock-agentcore:ap-northeast-1:123456789013:runtime/docs_agent-AbC123"
        });
        file["slackBotToken"] = json!("xoxb-file");
        write(dir.path(), "cdk.config.prod.json", &file);

        let cfg: VerificationConfig =
            load_zone(DeploymentEnv::Prod, Some(dir.path()), &MapEnv::new()).unwrap();
        assert_eq!(cfg.stack_name(), "Vfy-Prod");
        assert_eq!(cfg.execution_stack(), "Exec-Prod");
        assert!(cfg.is_cross_account());
        assert_eq!(cfg.execution_agent_arns.len(), 1);

        let config = load(dir.path(), DeploymentEnv::Prod, &MapEnv::new()).unwrap();
        let arns = config.get_map("executionAgentArns").unwrap();
        assert_eq!(arns, cfg.execution_agent_arns);
        assert!(config.get_map("awsRegion").is_none());
        assert!(config.get_map("slackSigningSecret").is_none());
        assert_eq!(cfg.slack_bot_token.as_deref(), Some("xoxb-file"));
        assert!(!format!("{cfg:?}").contains("xoxb-file"));
    }

    #[test]
    fn test_typed_docs_config() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "cdk.config.dev.json",
            &json!({
                "awsRegion": "ap-northeast-1",
                "bedrockModelId": "m1",
                "docsStackName": "DocsAgent",
                "verificationAccountId": "123456789012",
                "executionAccountId": "123456789012",
                "docsAgentName": "DocsAgent_01"
            }),
        );

        let cfg: DocsConfig = load_zone(DeploymentEnv::Dev, Some(dir.path()), &MapEnv::new()).unwrap();
        assert_eq!(cfg.stack_name(), "DocsAgent-Dev");
        assert_eq!(cfg.docs_agent_name.as_deref(), Some("DocsAgent_01"));
    }

    #[test]
    fn test_standard_tags_from_config() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "cdk.config.dev.json", &scenario_dev_file());
        let config = load(dir.path(), DeploymentEnv::Dev, &MapEnv::new()).unwrap();

        let tags = config
            .standard_tags(primary_stack_field(config.zone()))
            .unwrap();
        assert_eq!(tags.stack_name, "Vfy-Dev");
        assert_eq!(tags.env, DeploymentEnv::Dev);
        assert!(config.standard_tags("docsStackName").is_none());
    }

    #[test]
    fn test_get_or_uses_caller_default_only_for_absent() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "cdk.config.dev.json", &scenario_dev_file());
        let config = load(dir.path(), DeploymentEnv::Dev, &MapEnv::new()).unwrap();
        assert_eq!(config.get_or("verificationAgentName", "SlackAI_Verification"), "SlackAI_Verification");
        assert_eq!(config.get_or("awsRegion", "us-east-1"), "ap-northeast-1");
    }
}
