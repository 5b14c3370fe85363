//! Form schema derivation and JSON Schema validation of flag values

use super::visibility::editable_flags;
use crate::config::{Config, FlagKind, FlagSpec};
use crate::contract::{AdminPermissions, FlagValue, FormError, FormSchema};
use jsonschema::Validator;
use serde_json::{json, Map, Value};
use std::collections::HashMap;

/// Namespace the flags live under, in both the form data and the mutation
pub const NAMESPACE: &str = "betaFeatures";

const NAMESPACE_TITLE: &str = "Beta Features";

/// Property schema for a single flag
pub fn property_schema(flag: &FlagSpec) -> Value {
    match &flag.kind {
        FlagKind::Boolean => json!({
            "type": "boolean",
            "title": flag.title,
            "default": false,
            "oneOf": [
                { "type": "boolean", "title": "Enabled", "enum": [true] },
                { "type": "boolean", "title": "Disabled", "enum": [false] }
            ]
        }),
        FlagKind::Text => json!({
            "type": "string",
            "title": flag.title,
            "default": flag.default_value().to_json(),
        }),
        FlagKind::Choice(options) => json!({
            "type": "string",
            "title": flag.title,
            "enum": options,
            "default": flag.default_value().to_json(),
        }),
    }
}

fn property_ui_schema(flag: &FlagSpec) -> Value {
    let mut ui = json!({
        "ui:data-cy": flag.data_cy(),
        "ui:options": { "inline": true },
    });
    if flag.kind == FlagKind::Boolean {
        ui["ui:widget"] = json!("radio");
    }
    ui
}

/// Schema / ui-schema pair for the flags the user may edit.
///
/// Flags that are not admin-enabled, graduated or undeclared are left out
/// entirely rather than rendered disabled.
pub fn form_schema(config: &Config, permissions: &AdminPermissions) -> FormSchema {
    let mut properties = Map::new();
    let mut ui_namespace = Map::new();

    for flag in editable_flags(config, permissions) {
        properties.insert(flag.name.clone(), property_schema(flag));
        ui_namespace.insert(flag.name.clone(), property_ui_schema(flag));
    }
    ui_namespace.insert(
        "ui:description".to_string(),
        Value::String(config.messages.description.clone()),
    );

    FormSchema {
        schema: json!({
            "type": "object",
            "properties": {
                NAMESPACE: {
                    "title": NAMESPACE_TITLE,
                    "type": "object",
                    "properties": Value::Object(properties),
                }
            }
        }),
        ui_schema: json!({ NAMESPACE: Value::Object(ui_namespace) }),
    }
}

/// Compiled value validators, one per declared flag.
///
/// Built once per configuration and shared by every screen.
pub struct FlagValidators {
    validators: HashMap<String, Result<Validator, String>>,
}

impl FlagValidators {
    pub fn new(config: &Config) -> Self {
        let validators = config
            .flags
            .iter()
            .map(|flag| {
                let compiled = Validator::new(&property_schema(flag))
                    .map_err(|e| format!("Invalid JSON Schema: {}", e));
                if let Err(message) = &compiled {
                    tracing::warn!(flag = %flag.name, error = %message, "flag schema does not compile");
                }
                (flag.name.clone(), compiled)
            })
            .collect();
        Self { validators }
    }

    /// Check a value against its flag's declared kind
    pub fn validate(&self, name: &str, value: &FlagValue) -> Result<(), FormError> {
        let validator = match self.validators.get(name) {
            Some(Ok(validator)) => validator,
            Some(Err(message)) => {
                return Err(FormError::Validation {
                    field: name.to_string(),
                    message: message.clone(),
                })
            }
            None => {
                return Err(FormError::UnknownField {
                    name: name.to_string(),
                })
            }
        };

        if let Err(error) = validator.validate(&value.to_json()) {
            return Err(FormError::Validation {
                field: name.to_string(),
                message: error.to_string(),
            });
        }

        Ok(())
    }
}
