//! Domain layer - form reconciliation, visibility and validation

pub mod controller;
pub mod form;
pub mod notify;
pub mod validation;
pub mod visibility;

pub use controller::SettingsFormController;
pub use form::{initialize, is_dirty, FormState};
pub use notify::{NoOpNotifier, Notifier, TracingNotifier};
pub use visibility::{has_any_visible_feature, is_feature_available, visible_fields};
