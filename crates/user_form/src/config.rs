use directories::ProjectDirs;
use lazy_static::lazy_static;
use serde::Deserialize;
use std::time::Duration;
use std::{env, path::Path, path::PathBuf};
use tracing::debug;

use crate::errors::Result;
use crate::messages::MessageMode;

/// Tunables of the form and its front end.
///
/// Every field has a default, so an absent or partial config file is fine.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct FormConfig {
    /// Quiet period before an edited input gets its error message refreshed.
    pub debounce_ms: u64,
    /// `first` keeps only the first email message, `all` concatenates them.
    pub email_messages: MessageMode,
    /// Also debounce and resolve messages for the phone number list.
    pub phone_debounce: bool,
    /// UI ticks per second.
    pub tick_rate: f64,
    /// UI frames per second.
    pub frame_rate: f64,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 1000,
            email_messages: MessageMode::First,
            phone_debounce: false,
            tick_rate: 4.0,
            frame_rate: 30.0,
        }
    }
}

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
    pub static ref CONFIG_FOLDER: Option<PathBuf> =
        env::var(format!("{}_CONFIG", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
    pub static ref DATA_FOLDER: Option<PathBuf> =
        env::var(format!("{}_DATA", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
}

impl FormConfig {
    /// Load from the platform config directory, then `USER_FORM_*` environment overrides.
    pub fn load() -> Result<Self> {
        Self::from_dir(&get_config_dir())
    }

    /// Load `config.json5` / `config.toml` from `dir` (both optional).
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let mut builder = config::Config::builder();

        let config_files = [
            ("config.json5", config::FileFormat::Json5),
            ("config.toml", config::FileFormat::Toml),
        ];
        let mut found_config = false;
        for (file, format) in &config_files {
            let source = config::File::from(dir.join(file))
                .format(*format)
                .required(false);
            builder = builder.add_source(source);
            if dir.join(file).exists() {
                found_config = true
            }
        }
        if !found_config {
            debug!(dir = %dir.display(), "no configuration file found, using defaults");
        }

        builder = builder.add_source(
            config::Environment::with_prefix(PROJECT_NAME.as_str())
                .prefix_separator("_")
                .try_parsing(true),
        );

        let cfg: Self = builder.build()?.try_deserialize()?;
        cfg.check()?;
        Ok(cfg)
    }

    /// Rates feed `1 / rate` interval timers; only finite positive values are usable.
    fn check(&self) -> std::result::Result<(), config::ConfigError> {
        for (key, rate) in [("tick_rate", self.tick_rate), ("frame_rate", self.frame_rate)] {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(config::ConfigError::Message(format!(
                    "{key} must be a positive number, got {rate}"
                )));
            }
        }
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

pub fn get_data_dir() -> PathBuf {
    if let Some(s) = DATA_FOLDER.clone() {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".data")
    }
}

pub fn get_config_dir() -> PathBuf {
    if let Some(s) = CONFIG_FOLDER.clone() {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.config_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".config")
    }
}

fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "forge-of-stories", env!("CARGO_PKG_NAME"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FormError;
    use std::fs;
    use std::sync::{Mutex, MutexGuard, OnceLock};

    /// `from_dir` reads `USER_FORM_*` variables, so every test here runs under one lock.
    fn env_lock() -> MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("user_form_cfg_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("create scratch dir");
        dir
    }

    #[test]
    fn missing_files_yield_defaults() {
        let _env = env_lock();
        let dir = scratch_dir("empty");
        let cfg = FormConfig::from_dir(&dir).expect("defaults load");
        assert_eq!(cfg, FormConfig::default());
        assert_eq!(cfg.debounce(), Duration::from_millis(1000));
    }

    #[test]
    fn toml_overrides_selected_keys() {
        let _env = env_lock();
        let dir = scratch_dir("toml");
        fs::write(
            dir.join("config.toml"),
            "debounce_ms = 250\nemail_messages = \"all\"\n",
        )
        .expect("write config");
        let cfg = FormConfig::from_dir(&dir).expect("config loads");
        assert_eq!(cfg.debounce_ms, 250);
        assert_eq!(cfg.email_messages, MessageMode::All);
        assert!(!cfg.phone_debounce);
    }

    #[test]
    fn json5_is_accepted() {
        let _env = env_lock();
        let dir = scratch_dir("json5");
        fs::write(dir.join("config.json5"), "{ phone_debounce: true, // opt in\n }")
            .expect("write config");
        let cfg = FormConfig::from_dir(&dir).expect("config loads");
        assert!(cfg.phone_debounce);
    }

    #[test]
    fn non_positive_rates_are_rejected() {
        let _env = env_lock();
        let dir = scratch_dir("zero_tick");
        fs::write(dir.join("config.toml"), "tick_rate = 0.0\n").expect("write config");
        let err = FormConfig::from_dir(&dir).unwrap_err();
        assert!(matches!(err, FormError::Config(_)), "{err}");

        let dir = scratch_dir("negative_frame");
        fs::write(dir.join("config.toml"), "frame_rate = -1.0\n").expect("write config");
        assert!(FormConfig::from_dir(&dir).is_err());
    }

    #[test]
    fn environment_overrides_file_values() {
        let _env = env_lock();
        let dir = scratch_dir("env");
        fs::write(dir.join("config.toml"), "debounce_ms = 500\n").expect("write config");

        env::set_var("USER_FORM_DEBOUNCE_MS", "250");
        env::set_var("USER_FORM_PHONE_DEBOUNCE", "true");
        let loaded = FormConfig::from_dir(&dir);
        env::remove_var("USER_FORM_DEBOUNCE_MS");
        env::remove_var("USER_FORM_PHONE_DEBOUNCE");

        let cfg = loaded.expect("config loads");
        assert_eq!(cfg.debounce_ms, 250);
        assert!(cfg.phone_debounce);
    }
}
