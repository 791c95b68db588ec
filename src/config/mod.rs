use std::{env, path::PathBuf, str::FromStr};

use config::{Config as config_config, File as config_file};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::logging;

const CONFIG_PATH: &str = "app.json";

/// Endpoint used when neither `app.json` nor the environment provides one.
pub const DEFAULT_ENDPOINT: &str = "https://strangerthings-quotes.vercel.app/api/quotes/5";

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct App {
    #[serde(default)]
    pub quotes: QuotesApi,
}

const QUOTES_ENDPOINT: &str = "QUOTES_ENDPOINT";
const QUOTES_CHECK_STATUS: &str = "QUOTES_CHECK_STATUS";
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct QuotesApi {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// 開啟後非 2xx 的回應不會交給 JSON 解碼
    #[serde(default)]
    pub check_status: bool,
}

impl Default for QuotesApi {
    fn default() -> Self {
        QuotesApi {
            endpoint: default_endpoint(),
            check_status: false,
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

pub static SETTINGS: Lazy<App> = Lazy::new(App::new);

impl App {
    /// 讀取設定檔，讀不到或格式錯誤時使用預設值，最後再以 env 覆蓋
    pub fn new() -> Self {
        match Self::get() {
            Ok(app) => app,
            Err(why) => {
                logging::error_file_async(format!(
                    "I can't read the config context because {:?}",
                    why
                ));
                Self::default()
            }
        }
        .override_with_env()
    }

    fn get() -> Result<Self, config::ConfigError> {
        let config_path = config_path();
        if config_path.exists() {
            return config_config::builder()
                .add_source(config_file::from(config_path))
                .build()?
                .try_deserialize();
        }

        Ok(Self::default())
    }

    /// 將來至於 env 的設定值覆蓋掉 json 上的設定值
    fn override_with_env(mut self) -> Self {
        if let Ok(endpoint) = env::var(QUOTES_ENDPOINT) {
            self.quotes.endpoint = endpoint;
        }

        if let Ok(check_status) = env::var(QUOTES_CHECK_STATUS) {
            if let Some(flag) = parse_flag(QUOTES_CHECK_STATUS, &check_status) {
                self.quotes.check_status = flag;
            }
        }

        self
    }
}

/// 解析 `true` / `false`，其他值記錄錯誤並回傳 None
fn parse_flag(name: &str, value: &str) -> Option<bool> {
    match bool::from_str(value.trim()) {
        Ok(flag) => Some(flag),
        Err(why) => {
            logging::error_file_async(format!(
                "Ignoring {}={:?} because {}, expected true or false",
                name, value, why
            ));
            None
        }
    }
}

/// 回傳設定檔的路徑
fn config_path() -> PathBuf {
    PathBuf::from(CONFIG_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let app = App::default();
        assert_eq!(app.quotes.endpoint, DEFAULT_ENDPOINT);
        assert!(!app.quotes.check_status);
    }

    #[test]
    fn test_deserialize_partial() {
        let app: App = serde_json::from_str(r#"{"quotes":{"check_status":true}}"#).unwrap();
        assert_eq!(app.quotes.endpoint, DEFAULT_ENDPOINT);
        assert!(app.quotes.check_status);

        let app: App = serde_json::from_str("{}").unwrap();
        assert_eq!(app.quotes.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag(QUOTES_CHECK_STATUS, "true"), Some(true));
        assert_eq!(parse_flag(QUOTES_CHECK_STATUS, " false\n"), Some(false));
        assert_eq!(parse_flag(QUOTES_CHECK_STATUS, "1"), None);
        assert_eq!(parse_flag(QUOTES_CHECK_STATUS, "yes"), None);

        logging::flush();
        let log = std::fs::read_to_string(format!(
            "log/default_{}.log",
            chrono::Local::now().format("%Y-%m-%d")
        ))
        .unwrap();
        assert!(log.contains("Ignoring QUOTES_CHECK_STATUS=\"yes\""));
    }

    #[test]
    fn test_deserialize_endpoint() {
        let app: App =
            serde_json::from_str(r#"{"quotes":{"endpoint":"http://127.0.0.1:8080/q"}}"#).unwrap();
        assert_eq!(app.quotes.endpoint, "http://127.0.0.1:8080/q");
        assert!(!app.quotes.check_status);
    }
}
