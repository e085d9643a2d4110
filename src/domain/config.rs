use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Configuration for a registry directory.
///
/// Controls where records and demerit points are kept, relative to the
/// registry root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// File name of the person store.
    people: PathBuf,

    /// File name of the demerit ledger.
    demerits: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            people: default_people(),
            demerits: default_demerits(),
        }
    }
}

impl Config {
    /// Name of the configuration file inside a registry root.
    pub const FILE_NAME: &'static str = "registry.toml";

    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Loads `registry.toml` from `root`, falling back to the defaults.
    #[must_use]
    pub fn load_or_default(root: &Path) -> Self {
        let path = root.join(Self::FILE_NAME);
        Self::load(&path).unwrap_or_else(|e| {
            tracing::debug!("Failed to load config: {e}");
            Self::default()
        })
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Path of the person store under `root`.
    #[must_use]
    pub fn people_path(&self, root: &Path) -> PathBuf {
        root.join(&self.people)
    }

    /// Path of the demerit ledger under `root`.
    #[must_use]
    pub fn demerits_path(&self, root: &Path) -> PathBuf {
        root.join(&self.demerits)
    }
}

fn default_people() -> PathBuf {
    PathBuf::from("persons.txt")
}

fn default_demerits() -> PathBuf {
    PathBuf::from("demerits.txt")
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_people")]
        people: PathBuf,

        #[serde(default = "default_demerits")]
        demerits: PathBuf,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 { people, demerits } => Self { people, demerits },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            people: config.people,
            demerits: config.demerits,
        }
    }
}
