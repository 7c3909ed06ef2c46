use crate::client::{ApiError, ApiResult};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const RAPID_API_BASE: &str = "https://api-nba-v1.p.rapidapi.com";
pub const RAPID_API_HOST: &str = "api-nba-v1.p.rapidapi.com";
pub const NBA_CDN_BASE: &str = "https://cdn.nba.com/static/json/liveData";
pub const ESPN_NBA_BASE: &str = "https://site.api.espn.com/apis/site/v2/sports/basketball/nba";

pub const API_KEY_ENV: &str = "NBA_API_KEY";
pub const DEMO_ENV: &str = "HOOPDASH_DEMO";
pub const PLACEHOLDER_API_KEY: &str = "your-api-key-here";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_FRESHNESS: Duration = Duration::from_secs(5 * 60);

/// Everything the data layer needs to reach its sources.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub rapid_base: String,
    pub rapid_host: String,
    pub cdn_base: String,
    pub espn_base: String,
    pub api_key: String,
    pub timeout: Duration,
    /// Maximum age of a cached whole-day, teams or news lookup.
    pub freshness: Duration,
    /// Skip the network entirely and serve generated data.
    pub demo: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            rapid_base: RAPID_API_BASE.into(),
            rapid_host: RAPID_API_HOST.into(),
            cdn_base: NBA_CDN_BASE.into(),
            espn_base: ESPN_NBA_BASE.into(),
            api_key: PLACEHOLDER_API_KEY.into(),
            timeout: DEFAULT_TIMEOUT,
            freshness: DEFAULT_FRESHNESS,
            demo: false,
        }
    }
}

impl ApiConfig {
    /// Default endpoints with the API key resolved from the environment or
    /// the persisted settings file.
    pub fn from_env() -> Self {
        let store = SettingsStore::default_location();
        let demo = std::env::var(DEMO_ENV)
            .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);
        Self {
            api_key: resolve_api_key(std::env::var(API_KEY_ENV).ok(), &store),
            demo,
            ..Self::default()
        }
    }

    /// Point every provider at one base URL. Used with local mock servers.
    pub fn with_base_url(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            rapid_base: base.to_owned(),
            cdn_base: base.to_owned(),
            espn_base: base.to_owned(),
            ..Self::default()
        }
    }
}

/// Environment first, then the persisted setting, then the placeholder.
pub fn resolve_api_key(env_value: Option<String>, store: &SettingsStore) -> String {
    env_value
        .filter(|k| !k.trim().is_empty())
        .or_else(|| store.api_key())
        .unwrap_or_else(|| PLACEHOLDER_API_KEY.to_owned())
}

// ---------------------------------------------------------------------------
// Persisted settings: the API key is the only durable state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Settings {
    #[serde(rename = "nba_api_key", skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_location() -> Self {
        Self::at(settings_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored key, if any. A missing or unreadable file reads as no key.
    pub fn api_key(&self) -> Option<String> {
        self.load().api_key.filter(|k| !k.trim().is_empty())
    }

    pub fn set_api_key(&self, key: &str) -> ApiResult<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(ApiError::Settings("API key must not be blank".into()));
        }
        let mut settings = self.load();
        settings.api_key = Some(key.to_owned());
        self.save(&settings)?;
        info!("stored API key in {}", self.path.display());
        Ok(())
    }

    pub fn clear_api_key(&self) -> ApiResult<()> {
        let mut settings = self.load();
        settings.api_key = None;
        self.save(&settings)?;
        info!("cleared API key in {}", self.path.display());
        Ok(())
    }

    fn load(&self) -> Settings {
        std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    fn save(&self, settings: &Settings) -> ApiResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| ApiError::Settings(format!("create dir failed: {e}")))?;
        }
        let payload = serde_json::to_string_pretty(settings)
            .map_err(|e| ApiError::Settings(format!("serialize settings failed: {e}")))?;
        std::fs::write(&self.path, payload)
            .map_err(|e| ApiError::Settings(format!("write settings failed: {e}")))
    }
}

fn settings_path() -> PathBuf {
    if let Ok(config_dir) = std::env::var("XDG_CONFIG_HOME")
        && !config_dir.trim().is_empty()
    {
        return PathBuf::from(config_dir).join("hoopdash").join("settings.json");
    }
    if let Ok(home) = std::env::var("HOME")
        && !home.trim().is_empty()
    {
        return PathBuf::from(home)
            .join(".config")
            .join("hoopdash")
            .join("settings.json");
    }
    PathBuf::from("settings.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_store(name: &str) -> SettingsStore {
        let dir = std::env::temp_dir().join(format!("hoopdash-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        SettingsStore::at(dir.join("settings.json"))
    }

    #[test]
    fn api_key_round_trips_under_fixed_name() {
        let store = scratch_store("roundtrip");
        assert_eq!(store.api_key(), None);

        store.set_api_key("  abc123  ").unwrap();
        assert_eq!(store.api_key().as_deref(), Some("abc123"));
        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"nba_api_key\""), "file was: {raw}");

        store.clear_api_key().unwrap();
        assert_eq!(store.api_key(), None);
    }

    #[test]
    fn blank_key_is_rejected() {
        let store = scratch_store("blank");
        assert!(matches!(store.set_api_key("   "), Err(ApiError::Settings(_))));
    }

    #[test]
    fn malformed_settings_file_reads_as_no_key() {
        let store = scratch_store("malformed");
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "{not json").unwrap();
        assert_eq!(store.api_key(), None);
    }

    #[test]
    fn key_resolution_prefers_env_then_settings_then_placeholder() {
        let store = scratch_store("resolve");
        assert_eq!(resolve_api_key(None, &store), PLACEHOLDER_API_KEY);

        store.set_api_key("from-file").unwrap();
        assert_eq!(resolve_api_key(None, &store), "from-file");
        assert_eq!(resolve_api_key(Some(" ".into()), &store), "from-file");
        assert_eq!(resolve_api_key(Some("from-env".into()), &store), "from-env");
    }
}
