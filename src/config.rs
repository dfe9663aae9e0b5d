use {
    gloo_storage::{LocalStorage, Storage as _, errors::StorageError},
    serde::{Deserialize, Serialize},
    std::time::Duration,
};

const STORAGE_KEY: &str = "bold-moves-shell.config";

const DEFAULT_URL: &str = "https://example.com/";
const DEFAULT_TITLE: &str = "Bold Moves Live Here";
const DEFAULT_LOAD_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to read stored config: {0}")]
    Storage(#[from] StorageError),

    #[error("Invalid config: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Runtime settings. Anything missing from the stored override falls back to
/// the compiled-in defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Page shown in the web view.
    pub url: String,

    /// Window title.
    pub title: String,

    /// A load that hasn't finished after this long is reported as a timeout.
    pub load_timeout_ms: u64,

    /// Replace the web view with a simulated load.
    pub mock_loader: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_owned(),
            title: DEFAULT_TITLE.to_owned(),
            load_timeout_ms: DEFAULT_LOAD_TIMEOUT_MS,
            mock_loader: false,
        }
    }
}

impl Config {
    /// Reads the override stored in `localStorage`, falling back to defaults
    /// when it's missing or broken.
    pub fn load() -> Self {
        match Self::from_storage() {
            Ok(Some(config)) => {
                tracing::info!(?config, "using stored config");
                config
            }

            Ok(None) => Self::default(),

            Err(err) => {
                tracing::warn!(?err, "ignoring stored config");
                Self::default()
            }
        }
    }

    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }

    fn from_storage() -> Result<Option<Self>, Error> {
        let value = match LocalStorage::get::<serde_json::Value>(STORAGE_KEY) {
            Ok(value) => value,
            Err(StorageError::KeyNotFound(_)) => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        Ok(Some(serde_json::from_value(value)?))
    }
}

#[cfg(test)]
mod test {
    use {super::*, wasm_bindgen_test::*};

    #[wasm_bindgen_test]
    fn missing_fields_use_defaults() {
        let config: Config = serde_json::from_str(r#"{ "url": "https://example.org/game" }"#).unwrap();

        assert_eq!(config.url, "https://example.org/game");
        assert_eq!(config.title, DEFAULT_TITLE);
        assert_eq!(config.load_timeout(), Duration::from_secs(30));
        assert!(!config.mock_loader);

        let empty: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, Config::default());
    }

    #[wasm_bindgen_test]
    fn invalid_json_is_rejected() {
        let value = serde_json::json!({ "load_timeout_ms": "soon" });
        let err = Error::from(serde_json::from_value::<Config>(value).unwrap_err());

        assert!(matches!(err, Error::Invalid(_)));
        assert!(err.to_string().starts_with("Invalid config"));
    }
}
