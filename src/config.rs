use crate::error::{config_error, env_error, AppResult};
use chrono_tz::Tz;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default timezone for wall-clock times
pub const DEFAULT_TIMEZONE: &str = "Asia/Seoul";
/// Default locale for user-facing messages
pub const DEFAULT_LOCALE: &str = "ko";
/// Optional settings file merged under the environment
pub const CONFIG_FILE: &str = "config/attendance.toml";

/// Settings for the attendance core
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// IANA timezone used for "now" on clock actions
    pub timezone: String,
    /// Locale for validation messages ("ko" or "en")
    pub locale: String,
    /// TOML fixture file for seeding the repository
    pub seed_file: Option<PathBuf>,
    /// Minutes after shift start before a clock-in counts as late
    pub late_grace_minutes: u32,
    /// Lifetime of a QR check-in code
    pub checkin_ttl_seconds: u32,
    /// Break applied to recurring shifts when the admin gives none
    pub default_break_minutes: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
            seed_file: None,
            late_grace_minutes: 5,
            checkin_ttl_seconds: 30,
            default_break_minutes: 60,
        }
    }
}

impl Config {
    /// Load configuration from the settings file and environment
    pub fn load() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let mut config = Self::from_file(Path::new(CONFIG_FILE))?.unwrap_or_default();
        config.apply_env()?;
        config.validate()?;

        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// Read a settings file, returning None when it does not exist
    pub fn from_file(path: &Path) -> AppResult<Option<Self>> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(toml::from_str::<Config>(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Override fields from ATTENDANCE_* environment variables
    fn apply_env(&mut self) -> AppResult<()> {
        if let Ok(tz) = env::var("ATTENDANCE_TIMEZONE") {
            self.timezone = tz;
        }
        if let Ok(locale) = env::var("ATTENDANCE_LOCALE") {
            self.locale = locale;
        }
        if let Ok(path) = env::var("ATTENDANCE_SEED_FILE") {
            self.seed_file = if path.trim().is_empty() {
                None
            } else {
                Some(PathBuf::from(path))
            };
        }

        self.late_grace_minutes = env_u32("ATTENDANCE_LATE_GRACE_MINUTES", self.late_grace_minutes)?;
        self.checkin_ttl_seconds =
            env_u32("ATTENDANCE_CHECKIN_TTL_SECONDS", self.checkin_ttl_seconds)?;
        self.default_break_minutes =
            env_u32("ATTENDANCE_DEFAULT_BREAK_MINUTES", self.default_break_minutes)?;

        Ok(())
    }

    /// Check values that would otherwise fail later at use sites
    pub fn validate(&self) -> AppResult<()> {
        self.tz()?;
        if !crate::utils::i18n::is_supported(&self.locale) {
            warn!("Unsupported locale {}, falling back to en", self.locale);
        }
        if self.checkin_ttl_seconds == 0 {
            return Err(config_error("checkin_ttl_seconds must be greater than zero"));
        }
        Ok(())
    }

    /// Parsed timezone
    pub fn tz(&self) -> AppResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| config_error(&format!("Invalid timezone {}: {}", self.timezone, e)))
    }
}

fn env_u32(var: &str, current: u32) -> AppResult<u32> {
    match env::var(var) {
        Ok(value) => value.trim().parse::<u32>().map_err(|_| env_error(var)),
        Err(_) => Ok(current),
    }
}
