use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use taskflow_core::recurrence::ExpansionLimits;
use taskflow_core::repository::StoreConfig;

const CONFIG_FILE: &str = "taskflow.toml";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    /// JSON seed file loaded into the store at startup
    #[serde(default)]
    pub data_file: Option<PathBuf>,
    /// Filters joined with `and` when `list` gets no query, each parenthesized
    #[serde(default)]
    pub default_query: Vec<String>,
    #[serde(default = "default_preview_count")]
    pub preview_count: usize,
    #[serde(default)]
    pub expansion: ExpansionLimits,
    #[serde(default)]
    pub store: StoreConfig,
}

fn default_preview_count() -> usize {
    3
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: None,
            default_query: Vec::new(),
            preview_count: default_preview_count(),
            expansion: ExpansionLimits::default(),
            store: StoreConfig::default(),
        }
    }
}

impl Config {
    /// Defaults, then the TOML file, then `TASKFLOW_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        let file = path.unwrap_or_else(|| Path::new(CONFIG_FILE));
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed("TASKFLOW_").ignore(&["log"]).split("__"))
            .extract()
    }

    /// The query used by `list` when none is given.
    pub fn default_query_string(&self) -> String {
        self.default_query
            .iter()
            .map(|f| f.trim())
            .filter(|f| !f.is_empty())
            .map(|f| format!("({})", f))
            .collect::<Vec<_>>()
            .join(" and ")
    }
}
