//! Local form state: initialization, merging edits and dirtiness

use crate::config::Config;
use crate::contract::{FeatureSettings, FlagValue, PartialSettings};

/// Client-local draft of the remote settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub beta_features: FeatureSettings,
}

/// Draft equal in value to `remote`
pub fn initialize(remote: &FeatureSettings) -> FormState {
    FormState {
        beta_features: remote.clone(),
    }
}

impl FormState {
    /// Merge `patch` field by field, returning the new draft.
    pub fn edit(mut self, patch: &PartialSettings) -> Self {
        self.apply(patch);
        self
    }

    /// In-place variant of [`FormState::edit`]
    pub fn apply(&mut self, patch: &PartialSettings) {
        for (name, value) in patch.iter() {
            self.beta_features.set(name.clone(), value.clone());
        }
    }
}

/// Whether `current` differs from `initial` on any declared flag.
///
/// A missing field equals the flag's default, so an absent boolean and an
/// explicit `false` compare equal. Keys outside the catalog are ignored.
pub fn is_dirty(config: &Config, initial: &FeatureSettings, current: &FormState) -> bool {
    config.flags.iter().any(|flag| {
        let default = flag.default_value();
        let before = value_or(initial, &flag.name, &default);
        let after = value_or(&current.beta_features, &flag.name, &default);
        before != after
    })
}

fn value_or<'a>(settings: &'a FeatureSettings, name: &str, default: &'a FlagValue) -> &'a FlagValue {
    settings.get(name).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FlagKind, FlagSpec};

    fn config() -> Config {
        Config {
            flags: vec![
                FlagSpec::boolean("flagA", "Flag A"),
                FlagSpec::boolean("flagB", "Flag B"),
                FlagSpec {
                    kind: FlagKind::Text,
                    ..FlagSpec::boolean("label", "Label")
                },
            ],
            ..Config::default()
        }
    }

    #[test]
    fn test_initialize_is_clean() {
        let remote = FeatureSettings::new().with("flagA", true).with("label", "x");
        let draft = initialize(&remote);
        assert_eq!(draft.beta_features, remote);
        assert!(!is_dirty(&config(), &remote, &draft));
    }

    #[test]
    fn test_edit_changing_value_is_dirty() {
        let remote = FeatureSettings::new().with("flagA", false);
        let draft = initialize(&remote).edit(&FeatureSettings::new().with("flagA", true));
        assert!(is_dirty(&config(), &remote, &draft));
    }

    #[test]
    fn test_edit_same_value_is_clean() {
        let remote = FeatureSettings::new().with("flagA", true);
        let draft = initialize(&remote).edit(&FeatureSettings::new().with("flagA", true));
        assert!(!is_dirty(&config(), &remote, &draft));
    }

    #[test]
    fn test_reverting_edit_is_clean_again() {
        let remote = FeatureSettings::new().with("flagA", false);
        let draft = initialize(&remote)
            .edit(&FeatureSettings::new().with("flagA", true))
            .edit(&FeatureSettings::new().with("flagA", false));
        assert!(!is_dirty(&config(), &remote, &draft));
    }

    #[test]
    fn test_absent_field_equals_default() {
        let remote = FeatureSettings::new();
        let draft = initialize(&remote).edit(
            &FeatureSettings::new()
                .with("flagB", false)
                .with("label", ""),
        );
        assert!(!is_dirty(&config(), &remote, &draft));

        let draft = draft.edit(&FeatureSettings::new().with("flagB", true));
        assert!(is_dirty(&config(), &remote, &draft));
    }

    #[test]
    fn test_undeclared_keys_do_not_count() {
        let remote = FeatureSettings::new();
        let draft = initialize(&remote).edit(&FeatureSettings::new().with("legacyFlag", true));
        assert!(!is_dirty(&config(), &remote, &draft));
    }

    #[test]
    fn test_edit_preserves_untouched_fields() {
        let remote = FeatureSettings::new().with("flagA", true).with("flagB", false);
        let draft = initialize(&remote).edit(&FeatureSettings::new().with("flagB", true));
        assert_eq!(draft.beta_features.get("flagA"), Some(&FlagValue::Bool(true)));
        assert_eq!(draft.beta_features.get("flagB"), Some(&FlagValue::Bool(true)));
    }
}
