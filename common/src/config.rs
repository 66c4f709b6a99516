use crate::Result;
use anyhow::anyhow;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

// TOML設定ファイルの構造
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub prediction: PredictionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// 予測サービスの待ち受けアドレス
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// フロントエンドが参照するAPIのベースURL
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Deserialize)]
pub struct PredictionConfig {
    /// レスポンスに補足分析ブロックを含めるか
    #[serde(default = "default_analytics_enabled")]
    pub analytics_enabled: bool,
    /// レスポンスにナラティブ分析ブロックを含めるか
    #[serde(default = "default_narrative_enabled")]
    pub narrative_enabled: bool,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_rust_log_format")]
    pub rust_log_format: String,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}
fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}
fn default_analytics_enabled() -> bool {
    true
}
fn default_narrative_enabled() -> bool {
    true
}
fn default_rust_log_format() -> String {
    "term".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            base_url: default_base_url(),
        }
    }
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            analytics_enabled: default_analytics_enabled(),
            narrative_enabled: default_narrative_enabled(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            rust_log_format: default_rust_log_format(),
        }
    }
}

static CONFIG: Lazy<Config> = Lazy::new(|| {
    load_config().unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load config files: {}. Using defaults.", e);
        Config::default()
    })
});

static CONFIG_STORE: Lazy<Arc<Mutex<HashMap<String, String>>>> =
    Lazy::new(|| Arc::new(Mutex::new(HashMap::new())));

/// 設定値を名前で取得する
///
/// 優先順位: 実行時ストア → 環境変数 → TOML設定 → デフォルト値
pub fn get(name: &str) -> Result<String> {
    if let Some(value) = get_from_store(name) {
        if value.is_empty() {
            return Err(anyhow!("{} is empty", name));
        }
        return Ok(value);
    }

    if let Ok(val) = std::env::var(name)
        && !val.is_empty()
    {
        return Ok(val);
    }

    let toml_value = match name {
        "SERVER_BIND_ADDR" => Some(CONFIG.server.bind_addr.clone()),
        "SERVER_BASE_URL" => Some(CONFIG.server.base_url.clone()),
        "ANALYTICS_ENABLED" => Some(CONFIG.prediction.analytics_enabled.to_string()),
        "NARRATIVE_ENABLED" => Some(CONFIG.prediction.narrative_enabled.to_string()),
        "RUST_LOG_FORMAT" => Some(CONFIG.logging.rust_log_format.clone()),
        _ => None,
    };

    if let Some(value) = toml_value
        && !value.is_empty()
    {
        return Ok(value);
    }

    Err(anyhow!("Configuration key not found: {}", name))
}

/// 真偽値設定を取得する（未設定・解釈不能な場合はデフォルト値）
pub fn get_bool(name: &str, default: bool) -> bool {
    get(name)
        .ok()
        .and_then(|v| v.parse::<bool>().ok())
        .unwrap_or(default)
}

/// 実行時に設定値を上書きする（テスト用）
pub fn set(name: &str, value: &str) {
    if let Ok(mut store) = CONFIG_STORE.lock() {
        store.insert(name.to_string(), value.to_string());
    }
}

fn get_from_store(name: &str) -> Option<String> {
    if let Ok(store) = CONFIG_STORE.lock() {
        store.get(name).cloned()
    } else {
        None
    }
}

/// TOML設定を読み込む
///
/// config/config.toml を基本とし、git管理外の config/config.local.toml が
/// あればその値で上書きする。
fn load_config() -> Result<Config> {
    let mut config = Config::default();

    let base_path = "config/config.toml";
    if Path::new(base_path).exists() {
        let content = fs::read_to_string(base_path)?;
        config = toml::from_str(&content)?;
    }

    let local_path = "config/config.local.toml";
    if Path::new(local_path).exists() {
        let content = fs::read_to_string(local_path)?;
        let local_config: Config = toml::from_str(&content)?;
        merge_config(&mut config, local_config);
    }

    Ok(config)
}

/// ローカル設定を基本設定へマージする（デフォルト値のままの項目は上書きしない）
fn merge_config(base: &mut Config, local: Config) {
    if local.server.bind_addr != default_bind_addr() {
        base.server.bind_addr = local.server.bind_addr;
    }
    if local.server.base_url != default_base_url() {
        base.server.base_url = local.server.base_url;
    }
    if local.prediction.analytics_enabled != default_analytics_enabled() {
        base.prediction.analytics_enabled = local.prediction.analytics_enabled;
    }
    if local.prediction.narrative_enabled != default_narrative_enabled() {
        base.prediction.narrative_enabled = local.prediction.narrative_enabled;
    }
    if local.logging.rust_log_format != default_rust_log_format() {
        base.logging.rust_log_format = local.logging.rust_log_format;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_toml_default_values() {
        // 環境変数が設定されていない場合はTOMLのデフォルト値が使われる
        unsafe {
            std::env::remove_var("SERVER_BASE_URL");
        }
        let result = get("SERVER_BASE_URL").unwrap();
        assert_eq!(result, "http://localhost:8080");
    }

    #[test]
    #[serial]
    fn test_env_var_overrides_toml() {
        unsafe {
            std::env::set_var("SERVER_BIND_ADDR", "127.0.0.1:9999");
        }
        let result = get("SERVER_BIND_ADDR").unwrap();
        assert_eq!(result, "127.0.0.1:9999");
        unsafe {
            std::env::remove_var("SERVER_BIND_ADDR");
        }
    }

    #[test]
    #[serial]
    fn test_config_store_has_highest_priority() {
        const TEST_KEY: &str = "RUST_LOG_FORMAT";
        unsafe {
            std::env::set_var(TEST_KEY, "env-value");
        }
        set(TEST_KEY, "store-value");
        let result = get(TEST_KEY).unwrap();
        assert_eq!(result, "store-value");

        if let Ok(mut store) = CONFIG_STORE.lock() {
            store.remove(TEST_KEY);
        }
        unsafe {
            std::env::remove_var(TEST_KEY);
        }
    }

    #[test]
    #[serial]
    fn test_boolean_config() {
        unsafe {
            std::env::remove_var("ANALYTICS_ENABLED");
        }
        assert!(get_bool("ANALYTICS_ENABLED", true));

        unsafe {
            std::env::set_var("NARRATIVE_ENABLED", "false");
        }
        assert!(!get_bool("NARRATIVE_ENABLED", true));
        unsafe {
            std::env::remove_var("NARRATIVE_ENABLED");
        }
    }

    #[test]
    #[serial]
    fn test_unknown_key_is_an_error() {
        assert!(get("NO_SUCH_KEY").is_err());
    }
}
