//! Remote collaborator trait
//!
//! Implemented by whatever transport talks to the settings backend.
//! Authentication, caching and retries belong to the implementation.

use super::model::{AdminPermissions, FeatureSettings, UpdateBetaFeaturesRequest};
use anyhow::Result;
use async_trait::async_trait;

/// Backend owning user beta settings and admin permissions
#[async_trait]
pub trait BetaFeaturesBackend: Send + Sync {
    /// Current user's beta feature values
    async fn fetch_user_settings(&self) -> Result<FeatureSettings>;

    /// Flags the administrator has made available to users
    async fn fetch_admin_permissions(&self) -> Result<AdminPermissions>;

    /// Replace the user's beta feature values
    async fn update_user_settings(&self, request: UpdateBetaFeaturesRequest) -> Result<()>;
}
