use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
pub struct LoaderConfig {
    #[serde(default)]
    pub packs: PacksSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Deserialize)]
pub struct PacksSection {
    #[serde(default = "default_packs_directory")]
    pub directory: String,
    /// Pack directory names to skip.
    #[serde(default)]
    pub disabled: Vec<String>,
}

fn default_packs_directory() -> String {
    "thingpacks".into()
}

impl Default for PacksSection {
    fn default() -> Self {
        Self {
            directory: default_packs_directory(),
            disabled: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl LoaderConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Like [`load`](Self::load), but a missing file means all defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
