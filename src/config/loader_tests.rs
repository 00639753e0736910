//! Tests for configuration file loading.

use super::*;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serial_test::serial;
use std::env;
use std::fs;

fn write_temp(name: &str, contents: &str) -> PathBuf {
    let path = env::temp_dir().join(name);
    fs::write(&path, contents).expect("Failed to write test config");
    path
}

#[test]
fn default_config_path_contains_kubeoptic_config_toml() {
    let path = default_config_path().expect("Should have default path");
    let path_str = path.to_string_lossy();
    assert!(
        path_str.contains("kubeoptic") && path_str.ends_with("config.toml"),
        "Path should contain 'kubeoptic' and end with 'config.toml', got: {}",
        path_str
    );
}

#[test]
fn default_log_path_ends_with_kubeoptic_log() {
    let path = default_log_path();
    assert!(
        path.to_string_lossy().ends_with("kubeoptic.log"),
        "Default log path should end with 'kubeoptic.log', got: {:?}",
        path
    );
}

#[test]
fn load_config_file_returns_ok_none_for_missing_file() {
    let result = load_config_file("/nonexistent/path/to/config.toml");
    assert_eq!(
        result,
        Ok(None),
        "Missing config file should return Ok(None), not an error"
    );
}

#[test]
fn load_config_file_parses_valid_toml() {
    let config_path = write_temp(
        "kubeoptic_test_config.toml",
        r#"
theme = "monochrome"
follow = false
wrap = true
show_timestamps = true
read_timeout_secs = 9
tail_lines = 50
kubectl = "/opt/bin/kubectl"
save_dir = "/tmp/logs"

[keybindings]
quit = ["x"]
"#,
    );

    let config = load_config_file(&config_path)
        .expect("Should parse valid TOML")
        .expect("Should return Some for existing file");

    assert_eq!(config.theme.as_deref(), Some("monochrome"));
    assert_eq!(config.follow, Some(false));
    assert_eq!(config.wrap, Some(true));
    assert_eq!(config.show_timestamps, Some(true));
    assert_eq!(config.read_timeout_secs, Some(9));
    assert_eq!(config.tail_lines, Some(50));
    assert_eq!(config.kubectl, Some(PathBuf::from("/opt/bin/kubectl")));
    assert_eq!(config.save_dir, Some(PathBuf::from("/tmp/logs")));
    assert_eq!(
        config.keybindings.as_ref().and_then(|kb| kb.get("quit")).cloned(),
        Some(vec!["x".to_string()])
    );

    fs::remove_file(config_path).ok();
}

#[test]
fn load_config_file_returns_error_for_invalid_toml() {
    let config_path = write_temp("kubeoptic_test_invalid.toml", "this is not valid TOML ][}{");

    let result = load_config_file(&config_path);

    match result {
        Err(ConfigError::ParseError { path, reason: _ }) => {
            assert_eq!(path, config_path);
        }
        _ => panic!("Expected ParseError, got {:?}", result),
    }

    fs::remove_file(config_path).ok();
}

#[test]
fn config_file_rejects_unknown_fields() {
    let result: Result<ConfigFile, _> = toml::from_str(
        r#"
theme = "default"
show_stats = true
"#,
    );
    assert!(
        result.is_err(),
        "Should reject TOML with unknown fields due to deny_unknown_fields"
    );
}

#[test]
fn merge_config_uses_defaults_when_none() {
    let resolved = merge_config(None).expect("defaults always resolve");

    assert_eq!(resolved.theme, "default");
    assert!(resolved.follow);
    assert!(!resolved.wrap);
    assert!(!resolved.show_timestamps);
    assert_eq!(resolved.read_timeout, Duration::from_secs(5));
    assert_eq!(resolved.kubectl, PathBuf::from("kubectl"));
}

#[test]
fn merge_config_overrides_with_config_file_values() {
    let file = ConfigFile {
        theme: Some("monochrome".to_string()),
        follow: Some(false),
        tail_lines: Some(10),
        ..ConfigFile::default()
    };

    let resolved = merge_config(Some(file)).expect("valid config");

    assert_eq!(resolved.theme, "monochrome");
    assert!(!resolved.follow);
    assert_eq!(resolved.tail_lines, 10);
    assert!(!resolved.wrap, "Unset fields keep their defaults");
}

#[test]
fn zero_read_timeout_falls_back_to_default() {
    let file = ConfigFile {
        read_timeout_secs: Some(0),
        ..ConfigFile::default()
    };

    let resolved = merge_config(Some(file)).expect("valid config");
    assert_eq!(resolved.read_timeout, Duration::from_secs(5));
}

// ===== Key Binding Overrides =====

#[test]
fn keybinding_overrides_rebind_actions() {
    let mut overrides = BTreeMap::new();
    overrides.insert("follow_toggle".to_string(), vec!["F".to_string()]);
    overrides.insert("search_cancel".to_string(), vec!["ctrl+g".to_string()]);
    let file = ConfigFile {
        keybindings: Some(overrides),
        ..ConfigFile::default()
    };

    let bindings = merge_config(Some(file)).expect("valid config").keybindings;

    assert_eq!(
        bindings.get(KeyEvent::new(KeyCode::Char('F'), KeyModifiers::SHIFT)),
        Some(KeyAction::FollowToggle)
    );
    assert_eq!(
        bindings.get(KeyEvent::new(KeyCode::Char('f'), KeyModifiers::NONE)),
        None
    );
    assert_eq!(
        bindings.get_in_search(KeyEvent::new(KeyCode::Char('g'), KeyModifiers::CONTROL)),
        Some(KeyAction::SearchCancel)
    );
}

#[test]
fn keybinding_with_unknown_action_is_rejected() {
    let mut overrides = BTreeMap::new();
    overrides.insert("explode".to_string(), vec!["x".to_string()]);
    let file = ConfigFile {
        keybindings: Some(overrides),
        ..ConfigFile::default()
    };

    let err = merge_config(Some(file)).unwrap_err();
    assert_eq!(err, ConfigError::UnknownAction("explode".to_string()));
}

#[test]
fn keybinding_with_bad_key_is_rejected() {
    let mut overrides = BTreeMap::new();
    overrides.insert("quit".to_string(), vec!["super+q".to_string()]);
    let file = ConfigFile {
        keybindings: Some(overrides),
        ..ConfigFile::default()
    };

    let err = merge_config(Some(file)).unwrap_err();
    assert!(
        matches!(err, ConfigError::InvalidKeyBinding { ref action, ref key, .. }
            if action == "quit" && key == "super+q"),
        "unexpected error: {err:?}"
    );
}

// ===== Precedence =====

#[test]
#[serial(kubeoptic_env)]
fn apply_env_overrides_respects_kubeoptic_theme_and_follow() {
    env::set_var("KUBEOPTIC_THEME", "monochrome");
    env::set_var("KUBEOPTIC_FOLLOW", "off");

    let config = apply_env_overrides(ResolvedConfig::default());

    assert_eq!(config.theme, "monochrome");
    assert!(!config.follow);

    env::remove_var("KUBEOPTIC_THEME");
    env::remove_var("KUBEOPTIC_FOLLOW");
}

#[test]
#[serial(kubeoptic_env)]
fn apply_env_overrides_ignores_unparsable_follow() {
    env::set_var("KUBEOPTIC_FOLLOW", "sometimes");

    let config = apply_env_overrides(ResolvedConfig::default());
    assert!(config.follow);

    env::remove_var("KUBEOPTIC_FOLLOW");
}

#[test]
#[serial(kubeoptic_env)]
fn apply_env_overrides_sets_log_file() {
    env::set_var("KUBEOPTIC_LOG_FILE", "/tmp/kubeoptic-env.log");

    let config = apply_env_overrides(ResolvedConfig::default());
    assert_eq!(config.log_file_path, PathBuf::from("/tmp/kubeoptic-env.log"));

    env::remove_var("KUBEOPTIC_LOG_FILE");
}

#[test]
#[serial(kubeoptic_config)]
fn load_config_with_precedence_prefers_explicit_path() {
    let explicit = write_temp("kubeoptic_explicit.toml", "theme = \"explicit\"\n");
    let from_env = write_temp("kubeoptic_env.toml", "theme = \"env\"\n");
    env::set_var("KUBEOPTIC_CONFIG", from_env.to_str().unwrap());

    let config = load_config_with_precedence(Some(explicit.clone()))
        .unwrap()
        .unwrap();
    assert_eq!(config.theme.as_deref(), Some("explicit"));

    fs::remove_file(explicit).ok();
    fs::remove_file(from_env).ok();
    env::remove_var("KUBEOPTIC_CONFIG");
}

#[test]
#[serial(kubeoptic_config)]
fn load_config_with_precedence_uses_env_var_when_no_explicit_path() {
    let from_env = write_temp("kubeoptic_env_only.toml", "theme = \"env-var-theme\"\n");
    env::set_var("KUBEOPTIC_CONFIG", from_env.to_str().unwrap());

    let config = load_config_with_precedence(None).unwrap().unwrap();
    assert_eq!(
        config.theme.as_deref(),
        Some("env-var-theme"),
        "Should use KUBEOPTIC_CONFIG when no explicit path"
    );

    fs::remove_file(from_env).ok();
    env::remove_var("KUBEOPTIC_CONFIG");
}

#[test]
#[serial(kubeoptic_env)]
fn precedence_chain_file_then_env_then_cli() {
    let file = ConfigFile {
        theme: Some("from-file".to_string()),
        follow: Some(true),
        ..ConfigFile::default()
    };
    env::set_var("KUBEOPTIC_THEME", "from-env");

    let config = merge_config(Some(file)).unwrap();
    assert_eq!(config.theme, "from-file");

    let config = apply_env_overrides(config);
    assert_eq!(config.theme, "from-env");

    let config = apply_cli_overrides(
        config,
        CliOverrides {
            theme: Some("from-cli".to_string()),
            follow: Some(false),
            kubectl: None,
        },
    );
    assert_eq!(config.theme, "from-cli");
    assert!(!config.follow);
    assert_eq!(config.kubectl, PathBuf::from("kubectl"));

    env::remove_var("KUBEOPTIC_THEME");
}

#[test]
fn apply_cli_overrides_no_overrides() {
    let config = apply_cli_overrides(ResolvedConfig::default(), CliOverrides::default());
    assert_eq!(config.theme, "default");
    assert!(config.follow);
}
