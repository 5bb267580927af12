use std::time::Duration;

use creator_insights::config::AppConfig;

#[test]
fn partial_file_keeps_defaults() {
    let config = AppConfig::from_toml(
        r#"
[server]
port = 9000

[analytics]
seed = 17

[store]
ttl_secs = 0
"#,
    )
    .unwrap();

    assert_eq!(config.server.port, 9000);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.analytics.seed, Some(17));
    assert_eq!(config.analytics.variance, 0.2);
    assert!(config.store.to_store_config().ttl.is_none());
    assert_eq!(config.store.max_users, 10_000);
    assert_eq!(config.ai.api_key_env, "OPENAI_API_KEY");

    let analyzer = config.analyzer_config();
    assert_eq!(analyzer.seed, Some(17));
    assert_eq!(analyzer.cache_ttl, Some(Duration::from_secs(900)));
    assert_eq!(analyzer.items_per_category, 10);
}

#[test]
fn rejects_malformed_file() {
    let err = AppConfig::from_toml("[server\nport = ").unwrap_err();
    assert!(err.starts_with("failed to parse config"));
}

#[test]
fn written_config_reads_back() {
    let dir = std::env::temp_dir().join(format!("creator-insights-{}", std::process::id()));
    let path = dir.join("insights.toml");
    let mut config = AppConfig::default();
    config.trends.items_per_category = 4;
    config.write(&path).unwrap();

    let (loaded, used_path) = AppConfig::load(Some(path.clone())).unwrap();
    assert_eq!(used_path, Some(path));
    assert_eq!(loaded.trends.items_per_category, 4);
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn environment_overrides_file_values() {
    let dir = std::env::temp_dir().join(format!("creator-insights-env-{}", std::process::id()));
    let path = dir.join("insights.toml");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        &path,
        "[store]\nttl_secs = 60\n\n[analytics]\nseed = 1\n\n[server]\nport = 9000\n",
    )
    .unwrap();

    std::env::set_var("INSIGHTS_STORE_TTL_SECS", "5");
    std::env::set_var("INSIGHTS_SEED", "99");
    std::env::set_var("INSIGHTS_PORT", "not-a-port");
    let loaded = AppConfig::load(Some(path.clone()));
    std::env::remove_var("INSIGHTS_STORE_TTL_SECS");
    std::env::remove_var("INSIGHTS_SEED");
    std::env::remove_var("INSIGHTS_PORT");
    let _ = std::fs::remove_dir_all(dir);

    let (config, _) = loaded.unwrap();
    assert_eq!(config.store.ttl_secs, 5);
    assert_eq!(config.store.to_store_config().ttl, Some(Duration::from_secs(5)));
    assert_eq!(config.analytics.seed, Some(99));
    assert_eq!(config.analyzer_config().seed, Some(99));
    // unparsable values leave the file setting alone
    assert_eq!(config.server.port, 9000);
}
