//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed env var manipulation.

use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use tally_config::TallyConfig;

#[test]
fn loads_database_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[database]
path = "/var/lib/tally/ledger.db"
"#,
        )?;

        let config: TallyConfig = Figment::from(Serialized::defaults(TallyConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.database.path, "/var/lib/tally/ledger.db");
        Ok(())
    });
}

#[test]
fn loads_evidence_policy_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[evidence]
live_watch_factor = 0.8
live_watch_cap_minutes = 30
login_grace_days = 14
"#,
        )?;

        let config: TallyConfig = Figment::from(Serialized::defaults(TallyConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert!((config.evidence.live_watch_factor - 0.8).abs() < f64::EPSILON);
        assert_eq!(config.evidence.live_watch_cap_minutes, 30);
        assert_eq!(config.evidence.login_grace_days, 14);
        Ok(())
    });
}

#[test]
fn partial_toml_keeps_section_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[evidence]
login_grace_days = 10
"#,
        )?;

        let config: TallyConfig = Figment::from(Serialized::defaults(TallyConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.evidence.login_grace_days, 10);
        // Untouched fields keep their defaults.
        assert_eq!(config.evidence.live_watch_cap_minutes, 45);
        assert_eq!(config.database.path, ".tally/tally.db");
        assert_eq!(config.general.history_limit, 100);
        Ok(())
    });
}
