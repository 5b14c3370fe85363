//! In-memory backend implementation

use crate::contract::{
    AdminPermissions, BetaFeaturesBackend, FeatureSettings, UpdateBetaFeaturesRequest,
};
use anyhow::{bail, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

struct State {
    settings: FeatureSettings,
    permissions: AdminPermissions,
    /// Error message for the next update call, consumed on use
    fail_next_update: Option<String>,
}

/// Backend keeping user settings and admin permissions in process memory
pub struct InMemoryBackend {
    state: RwLock<State>,
    update_calls: AtomicUsize,
}

impl InMemoryBackend {
    pub fn new(settings: FeatureSettings, permissions: AdminPermissions) -> Self {
        Self {
            state: RwLock::new(State {
                settings,
                permissions,
                fail_next_update: None,
            }),
            update_calls: AtomicUsize::new(0),
        }
    }

    /// Make the next update fail with `message`
    pub fn fail_next_update(&self, message: impl Into<String>) {
        self.state.write().fail_next_update = Some(message.into());
    }

    /// Change what the administrator allows
    pub fn set_permissions(&self, permissions: AdminPermissions) {
        self.state.write().permissions = permissions;
    }

    pub fn settings(&self) -> FeatureSettings {
        self.state.read().settings.clone()
    }

    /// Number of update calls received, failed ones included
    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BetaFeaturesBackend for InMemoryBackend {
    async fn fetch_user_settings(&self) -> Result<FeatureSettings> {
        Ok(self.state.read().settings.clone())
    }

    async fn fetch_admin_permissions(&self) -> Result<AdminPermissions> {
        Ok(self.state.read().permissions.clone())
    }

    async fn update_user_settings(&self, request: UpdateBetaFeaturesRequest) -> Result<()> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.write();
        if let Some(message) = state.fail_next_update.take() {
            bail!(message);
        }
        state.settings = request.beta_features;
        Ok(())
    }
}
