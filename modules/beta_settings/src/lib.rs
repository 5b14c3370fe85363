//! Beta Settings Module
//!
//! Settings-form reconciliation for user beta features: a local draft is
//! initialized from the backend snapshot, diffed to decide whether it can be
//! saved, and only flags the administrator enabled are offered for editing.

// Public exports
pub mod contract;
pub use contract::{
    client::BetaFeaturesBackend, error::FormError, error::SubmitError, AdminPermissions,
    FeatureSettings, FlagValue, FormView, SaveControl, SubmitOutcome,
};

pub mod config;
pub use config::{Config, FlagKind, FlagSpec};

pub mod domain;
pub use domain::{Notifier, SettingsFormController};

pub mod module;
pub use module::BetaSettingsModule;

pub mod infra;
