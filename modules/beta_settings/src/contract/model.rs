//! Contract models for beta settings
//!
//! These models travel between the controller, the remote backend and the
//! rendering surface. Only the wire payload and flag values carry serde derives.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Key injected by GraphQL clients into every object
const TYPENAME_KEY: &str = "__typename";

/// Scalar value of a single feature flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Text(String),
}

impl FlagValue {
    /// Boolean view of the value; text values are never "on"
    pub fn as_bool(&self) -> bool {
        matches!(self, FlagValue::Bool(true))
    }

    pub fn to_json(&self) -> Value {
        match self {
            FlagValue::Bool(b) => Value::Bool(*b),
            FlagValue::Text(s) => Value::String(s.clone()),
        }
    }
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        FlagValue::Bool(value)
    }
}

impl From<&str> for FlagValue {
    fn from(value: &str) -> Self {
        FlagValue::Text(value.to_string())
    }
}

/// Named feature flag values, as owned by the backend (remote settings)
/// or as edited locally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSettings(BTreeMap<String, FlagValue>);

/// Sparse set of field updates applied by an edit
pub type PartialSettings = FeatureSettings;

impl FeatureSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FlagValue>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&FlagValue> {
        self.0.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: FlagValue) {
        self.0.insert(name.into(), value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FlagValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lenient conversion from a backend payload.
    ///
    /// Keeps boolean and string members of a JSON object. `__typename`,
    /// nested values and numbers are dropped; a non-object yields an empty map.
    pub fn from_json(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            tracing::debug!(payload = %value, "settings payload is not an object");
            return Self::default();
        };

        let mut settings = Self::default();
        for (name, raw) in object {
            if name == TYPENAME_KEY {
                continue;
            }
            match raw {
                Value::Bool(b) => settings.set(name.clone(), FlagValue::Bool(*b)),
                Value::String(s) => settings.set(name.clone(), FlagValue::Text(s.clone())),
                other => {
                    tracing::debug!(flag = %name, value = %other, "dropping non-scalar flag value");
                }
            }
        }
        settings
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(name, value)| (name.clone(), value.to_json()))
                .collect(),
        )
    }
}

impl FromIterator<(String, FlagValue)> for FeatureSettings {
    fn from_iter<I: IntoIterator<Item = (String, FlagValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Administrator switches: which flags end users may toggle at all
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminPermissions(BTreeMap<String, bool>);

impl AdminPermissions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, enabled: bool) -> Self {
        self.0.insert(name.into(), enabled);
        self
    }

    /// `true` only when the flag is present and enabled
    pub fn is_enabled(&self, name: &str) -> bool {
        self.0.get(name).copied().unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, bool)> {
        self.0.iter().map(|(name, enabled)| (name, *enabled))
    }

    /// Lenient conversion from a backend payload; anything but a boolean is dropped
    pub fn from_json(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            tracing::debug!(payload = %value, "permissions payload is not an object");
            return Self::default();
        };

        let mut permissions = Self::default();
        for (name, raw) in object {
            if name == TYPENAME_KEY {
                continue;
            }
            match raw.as_bool() {
                Some(enabled) => {
                    permissions.0.insert(name.clone(), enabled);
                }
                None => {
                    tracing::debug!(flag = %name, value = %raw, "dropping non-boolean permission");
                }
            }
        }
        permissions
    }
}

/// Mutation payload: `{ "betaFeatures": { ... } }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBetaFeaturesRequest {
    pub beta_features: FeatureSettings,
}

/// Acknowledgement of a successful save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ack {
    /// Snapshot the form was re-initialized from
    pub committed: FeatureSettings,
    pub saved_at: DateTime<Utc>,
}

/// Externally observable controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Loading,
    Clean,
    Dirty,
    Submitting,
}

/// Result of a submit call that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Saved(Ack),
    /// The save control was inert; no remote call was made
    Ignored(IgnoreReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    NotLoaded,
    InFlight,
    NotDirty,
    NoActiveFeatures,
}

/// How the save button should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveControl {
    /// Not rendered: no active beta features
    Hidden,
    Disabled,
    Enabled,
}

/// Schema / ui-schema pair consumed by the form renderer
#[derive(Debug, Clone, PartialEq)]
pub struct FormSchema {
    pub schema: Value,
    pub ui_schema: Value,
}

/// One editable control on the settings screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleControl {
    pub name: String,
    pub title: String,
    pub value: FlagValue,
}

/// Everything the rendering surface needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FormView {
    pub state: ControllerState,
    pub description: String,
    pub empty_state: Option<String>,
    pub controls: Vec<VisibleControl>,
    pub save: SaveControl,
    pub last_error: Option<String>,
    pub form: FormSchema,
}

/// Caller-side facts that can veto an otherwise enabled feature
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AvailabilityContext {
    /// Uploaded logs never get server-side features
    pub is_uploaded_log: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_settings_from_json_drops_typename_and_non_scalars() {
        let settings = FeatureSettings::from_json(&json!({
            "__typename": "BetaFeatures",
            "spruceWaterfallEnabled": true,
            "theme": "dark",
            "nested": { "a": 1 },
            "count": 3
        }));

        assert_eq!(settings.len(), 2);
        assert_eq!(settings.get("spruceWaterfallEnabled"), Some(&FlagValue::Bool(true)));
        assert_eq!(settings.get("theme"), Some(&FlagValue::Text("dark".to_string())));
        assert!(settings.get("__typename").is_none());
    }

    #[test]
    fn test_permissions_from_json_keeps_only_booleans() {
        let permissions = AdminPermissions::from_json(&json!({
            "__typename": "BetaFeatures",
            "flagA": true,
            "flagB": false,
            "flagC": "yes"
        }));

        assert!(permissions.is_enabled("flagA"));
        assert!(!permissions.is_enabled("flagB"));
        assert!(!permissions.is_enabled("flagC"));
        assert_eq!(permissions.iter().count(), 2);
    }

    #[test]
    fn test_non_object_payload_is_empty() {
        assert!(FeatureSettings::from_json(&json!(null)).is_empty());
        assert_eq!(AdminPermissions::from_json(&json!([true])), AdminPermissions::new());
    }

    #[test]
    fn test_update_request_wire_shape() {
        let request = UpdateBetaFeaturesRequest {
            beta_features: FeatureSettings::new().with("flagA", true),
        };
        let encoded = serde_json::to_value(&request).unwrap();
        assert_eq!(encoded, json!({ "betaFeatures": { "flagA": true } }));
    }
}
