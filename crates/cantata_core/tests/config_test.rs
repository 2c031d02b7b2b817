use cantata_core::{CantataConfig, MissingSourcePolicy, PromptFormat, Role};
use std::io::Write;

#[test]
fn bundled_defaults_match_serde_defaults() -> anyhow::Result<()> {
    let bundled = CantataConfig::from_toml_str(include_str!("../../../cantata.toml"))?;
    assert_eq!(bundled, CantataConfig::default());
    Ok(())
}

#[test]
fn partial_file_keeps_other_defaults() -> anyhow::Result<()> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    writeln!(
        file,
        r#"
[prompt_format]
user_prefix = "\nQ: "

[orchestrator]
missing_map_source = "error"
"#
    )?;

    let config = CantataConfig::from_file(file.path())?;
    assert_eq!(config.prompt_format().prefix(Role::User), "\nQ: ");
    assert_eq!(
        config.prompt_format().prefix(Role::Assistant),
        PromptFormat::default().prefix(Role::Assistant)
    );
    assert_eq!(
        *config.orchestrator().missing_map_source(),
        MissingSourcePolicy::Error
    );
    assert!(*config.orchestrator().params_fallback());
    Ok(())
}

#[test]
fn unknown_policy_is_rejected() {
    let result = CantataConfig::from_toml_str(
        r#"
[orchestrator]
missing_map_source = "skip"
"#,
    );
    let message = result.expect_err("unknown policy should fail").to_string();
    assert!(message.contains("empty, error"), "{message}");
}

#[test]
fn missing_file_is_an_error() {
    let result = CantataConfig::from_file("/nonexistent/cantata.toml");
    assert!(result.is_err());
}
