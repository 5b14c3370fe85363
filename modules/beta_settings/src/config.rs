//! Configuration for the beta settings module
//!
//! The flag set is declared here rather than discovered from payload keys.

use crate::contract::FlagValue;
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable prefix; `__` separates nested keys
pub const ENV_PREFIX: &str = "BETA_SETTINGS_";

/// Beta settings configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Declared beta feature flags, in display order
    #[serde(default)]
    pub flags: Vec<FlagSpec>,

    /// Flags that left beta; never rendered and never counted as active
    #[serde(default = "default_graduated_flags")]
    pub graduated_flags: Vec<String>,

    /// User-facing strings
    #[serde(default)]
    pub messages: Messages,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            flags: Vec::new(),
            graduated_flags: default_graduated_flags(),
            messages: Messages::default(),
        }
    }
}

impl Config {
    /// Load configuration: defaults, then the optional YAML file, then environment.
    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        Self::figment(path).extract()
    }

    /// Provider stack used by [`Config::load`]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Look up a declared flag by name
    pub fn flag(&self, name: &str) -> Option<&FlagSpec> {
        self.flags.iter().find(|f| f.name == name)
    }

    pub fn is_graduated(&self, name: &str) -> bool {
        self.graduated_flags.iter().any(|g| g == name)
    }
}

/// Declaration of one beta feature flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlagSpec {
    /// Flag name as used by the backend (e.g. "spruceWaterfallEnabled")
    pub name: String,

    /// Label shown next to the control
    pub title: String,

    #[serde(default)]
    pub kind: FlagKind,

    /// Value assumed when the backend omits the flag
    #[serde(default)]
    pub default: Option<FlagValue>,

    /// Test selector for the rendered control; defaults to the flag name
    #[serde(default)]
    pub data_cy: Option<String>,
}

impl FlagSpec {
    pub fn boolean(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            kind: FlagKind::Boolean,
            default: None,
            data_cy: None,
        }
    }

    pub fn default_value(&self) -> FlagValue {
        if let Some(value) = &self.default {
            return value.clone();
        }
        match &self.kind {
            FlagKind::Boolean => FlagValue::Bool(false),
            FlagKind::Text => FlagValue::Text(String::new()),
            FlagKind::Choice(options) => {
                FlagValue::Text(options.first().cloned().unwrap_or_default())
            }
        }
    }

    pub fn data_cy(&self) -> &str {
        self.data_cy.as_deref().unwrap_or(&self.name)
    }
}

/// Declared value type of a flag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagKind {
    #[default]
    Boolean,
    Text,
    /// One of a fixed set of strings
    Choice(Vec<String>),
}

/// User-facing strings for the settings screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Messages {
    pub saved: String,
    pub save_failed_prefix: String,
    pub description: String,
    pub empty_state: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            saved: "Your changes have been saved.".to_string(),
            save_failed_prefix: "Error while saving beta feature settings".to_string(),
            description: "Enable beta features to get an early look at upcoming UI changes."
                .to_string(),
            empty_state: "No beta experiments are active right now.".to_string(),
        }
    }
}

fn default_graduated_flags() -> Vec<String> {
    vec!["parsleyAIEnabled".to_string()]
}
