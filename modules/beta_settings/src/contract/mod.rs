//! Contract layer - public types shared with collaborators
//!
//! Models, errors and the remote backend trait. No transport code lives here.

pub mod client;
pub mod error;
pub mod model;

pub use client::BetaFeaturesBackend;
pub use error::{FormError, SubmitError};
pub use model::{
    Ack, AdminPermissions, AvailabilityContext, ControllerState, FeatureSettings, FlagValue,
    FormSchema, FormView, IgnoreReason, PartialSettings, SaveControl, SubmitOutcome,
    UpdateBetaFeaturesRequest, VisibleControl,
};
