use std::path::Path;

use chrono_tz::Tz;
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "kuranie.toml";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct NavLink {
    pub label: String,
    pub href: String,
}

/// Site settings read from `kuranie.toml`. Every field has a default, so an
/// absent file or an empty one is a valid configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub site_name: String,
    /// Prefix of every storage key this site owns.
    pub namespace: String,
    pub database: String,
    pub output_dir: String,
    pub timezone: String,
    pub anonymous_name: String,
    pub moods: Vec<String>,
    pub nav: Vec<NavLink>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            site_name: "kuranie".to_string(),
            namespace: "kuranie".to_string(),
            database: "site/db/kuranie.db".to_string(),
            output_dir: "site/public".to_string(),
            timezone: "UTC".to_string(),
            anonymous_name: "Anonymous".to_string(),
            moods: ["happy", "sad", "okay", "excited", "tired", "creative"]
                .iter()
                .map(|m| m.to_string())
                .collect(),
            nav: vec![
                NavLink { label: "home".to_string(), href: "index.html".to_string() },
                NavLink { label: "about".to_string(), href: "about.html".to_string() },
                NavLink { label: "guestbook".to_string(), href: "guestbook.html".to_string() },
            ],
        }
    }
}

impl SiteConfig {
    /// Load from `path`. A missing file yields the defaults; a file that
    /// exists but does not parse is an error.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
        Self::from_toml(&raw).map_err(|e| format!("Invalid config {}: {}", path.display(), e))
    }

    pub fn from_toml(raw: &str) -> Result<Self, String> {
        toml::from_str(raw).map_err(|e| e.to_string())
    }

    /// Configured timezone, falling back to UTC for unknown names.
    pub fn tz(&self) -> Tz {
        match self.timezone.parse::<Tz>() {
            Ok(tz) => tz,
            Err(_) => {
                log::warn!("Unknown timezone '{}', using UTC", self.timezone);
                Tz::UTC
            }
        }
    }
}
