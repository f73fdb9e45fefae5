//! Environment overrides mutate process state, so they live in their own
//! test binary with a single sequential test.

use econet_core::config::DEFAULT_TOKEN_ENV;
use econet_core::{Config, ConfigError};

const VARS: [&str; 5] = [
    "ECONET_ROSTER_PATH",
    "ECONET_GLOBI_URL",
    "ECONET_TIMEOUT_SECS",
    "ECONET_METADATA_ENABLED",
    DEFAULT_TOKEN_ENV,
];

#[test]
fn test_env_overrides_apply_over_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("econet.toml");
    std::fs::write(
        &path,
        "[roster]\npath = \"file.csv\"\n\n[interactions]\nbase_url = \"http://file\"\ntimeout_secs = 5\n",
    )
    .unwrap();

    std::env::set_var("ECONET_ROSTER_PATH", "/parks/yose.csv");
    std::env::set_var("ECONET_GLOBI_URL", "http://localhost:9000");
    std::env::set_var("ECONET_TIMEOUT_SECS", "12");
    std::env::set_var("ECONET_METADATA_ENABLED", "false");
    std::env::set_var(DEFAULT_TOKEN_ENV, "from-env");

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.roster.path.to_str(), Some("/parks/yose.csv"));
    assert_eq!(config.interactions.base_url, "http://localhost:9000");
    assert_eq!(config.interactions.timeout_secs, 12);
    assert_eq!(config.metadata.timeout_secs, 12);
    assert!(!config.metadata.enabled);
    // The token variable is read by the credential at request time, never
    // copied into the config.
    assert_eq!(config.metadata.api_token, None);

    std::env::set_var("ECONET_TIMEOUT_SECS", "soon");
    assert!(matches!(Config::from_file(&path), Err(ConfigError::Invalid(_))));

    for var in VARS {
        std::env::remove_var(var);
    }

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.roster.path.to_str(), Some("file.csv"));
    assert_eq!(config.interactions.timeout_secs, 5);
    assert!(config.metadata.enabled);
}
