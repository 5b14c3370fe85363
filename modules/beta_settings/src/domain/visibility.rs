//! Admin-controlled visibility of beta feature flags

use crate::config::Config;
use crate::contract::{AdminPermissions, AvailabilityContext, FeatureSettings};
use std::collections::BTreeSet;

/// Flag names the administrator has enabled. Absent names are never visible.
pub fn visible_fields(permissions: &AdminPermissions) -> BTreeSet<String> {
    permissions
        .iter()
        .filter(|(_, enabled)| *enabled)
        .map(|(name, _)| name.clone())
        .collect()
}

/// Whether at least one non-graduated flag is visible
pub fn has_any_visible_feature(permissions: &AdminPermissions, graduated: &[String]) -> bool {
    visible_fields(permissions)
        .iter()
        .any(|name| !graduated.contains(name))
}

/// Declared, visible, non-graduated flags in catalog order.
///
/// These are the only flags that get an editable control.
pub fn editable_flags<'a>(
    config: &'a Config,
    permissions: &AdminPermissions,
) -> impl Iterator<Item = &'a crate::config::FlagSpec> {
    let visible = visible_fields(permissions);
    config
        .flags
        .iter()
        .filter(move |flag| visible.contains(&flag.name) && !config.is_graduated(&flag.name))
}

/// Whether a feature is usable right now: the admin enabled it, the user
/// opted in, and the caller's context allows it.
///
/// Graduated flags still take part here.
pub fn is_feature_available(
    name: &str,
    permissions: &AdminPermissions,
    user: &FeatureSettings,
    ctx: AvailabilityContext,
) -> bool {
    !ctx.is_uploaded_log
        && permissions.is_enabled(name)
        && user.get(name).is_some_and(|value| value.as_bool())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FlagSpec;

    #[test]
    fn test_visible_fields_are_enabled_keys_only() {
        let permissions = AdminPermissions::new()
            .with("flagA", true)
            .with("flagB", false)
            .with("flagC", true);

        let visible = visible_fields(&permissions);
        assert_eq!(
            visible.into_iter().collect::<Vec<_>>(),
            vec!["flagA".to_string(), "flagC".to_string()]
        );
    }

    #[test]
    fn test_absent_key_is_not_visible() {
        let visible = visible_fields(&AdminPermissions::new().with("flagA", true));
        assert!(!visible.contains("flagZ"));
    }

    #[test]
    fn test_graduated_flag_alone_is_not_active() {
        let graduated = vec!["parsleyAIEnabled".to_string()];
        let permissions = AdminPermissions::new()
            .with("parsleyAIEnabled", true)
            .with("flagA", false);
        assert!(!has_any_visible_feature(&permissions, &graduated));

        let permissions = permissions.with("flagA", true);
        assert!(has_any_visible_feature(&permissions, &graduated));
    }

    #[test]
    fn test_empty_permissions_have_no_active_feature() {
        assert!(!has_any_visible_feature(&AdminPermissions::new(), &[]));
    }

    #[test]
    fn test_editable_flags_follow_catalog_order() {
        let config = Config {
            flags: vec![
                FlagSpec::boolean("zeta", "Zeta"),
                FlagSpec::boolean("alpha", "Alpha"),
                FlagSpec::boolean("hiddenOne", "Hidden"),
                FlagSpec::boolean("parsleyAIEnabled", "Parsley AI"),
            ],
            ..Config::default()
        };
        let permissions = AdminPermissions::new()
            .with("alpha", true)
            .with("zeta", true)
            .with("parsleyAIEnabled", true)
            .with("undeclared", true);

        let names: Vec<_> = editable_flags(&config, &permissions)
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_feature_availability() {
        let permissions = AdminPermissions::new().with("parsleyAIEnabled", true);
        let user = FeatureSettings::new().with("parsleyAIEnabled", true);
        let ctx = AvailabilityContext::default();

        assert!(is_feature_available("parsleyAIEnabled", &permissions, &user, ctx));
        assert!(!is_feature_available(
            "parsleyAIEnabled",
            &permissions,
            &user,
            AvailabilityContext { is_uploaded_log: true }
        ));
        assert!(!is_feature_available(
            "parsleyAIEnabled",
            &AdminPermissions::new(),
            &user,
            ctx
        ));
        assert!(!is_feature_available(
            "parsleyAIEnabled",
            &permissions,
            &FeatureSettings::new(),
            ctx
        ));
    }
}
