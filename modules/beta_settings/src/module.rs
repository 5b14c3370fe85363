//! Module declaration - wires configuration, backend and notifier

use crate::config::Config;
use crate::contract::{AvailabilityContext, BetaFeaturesBackend, FormError};
use crate::domain::validation::FlagValidators;
use crate::domain::visibility::is_feature_available;
use crate::domain::{Notifier, SettingsFormController};
use std::path::Path;
use std::sync::Arc;

/// Beta settings module
///
/// Shared by every settings screen; each screen gets its own controller.
#[derive(Clone)]
pub struct BetaSettingsModule {
    config: Arc<Config>,
    validators: Arc<FlagValidators>,
    backend: Arc<dyn BetaFeaturesBackend>,
    notifier: Arc<dyn Notifier>,
}

impl BetaSettingsModule {
    pub fn new(
        config: Config,
        backend: Arc<dyn BetaFeaturesBackend>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        tracing::info!(
            flags = config.flags.len(),
            graduated = config.graduated_flags.len(),
            "Beta settings module initialized"
        );
        let validators = Arc::new(FlagValidators::new(&config));
        Self {
            config: Arc::new(config),
            validators,
            backend,
            notifier,
        }
    }

    /// Build the module from an optional YAML file plus environment overrides
    pub fn from_config_file(
        path: Option<&Path>,
        backend: Arc<dyn BetaFeaturesBackend>,
        notifier: Arc<dyn Notifier>,
    ) -> anyhow::Result<Self> {
        let config = Config::load(path)?;
        Ok(Self::new(config, backend, notifier))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Open a settings screen: a fresh controller, already loaded
    pub async fn open_screen(&self) -> Result<SettingsFormController, FormError> {
        let controller = self.controller();
        controller.load().await?;
        Ok(controller)
    }

    /// Fresh controller in the loading state, for callers that push snapshots themselves
    pub fn controller(&self) -> SettingsFormController {
        SettingsFormController::with_validators(
            self.config.clone(),
            self.validators.clone(),
            self.backend.clone(),
            self.notifier.clone(),
        )
    }

    /// Whether `name` is usable for the current user in `ctx`
    pub async fn is_feature_available(
        &self,
        name: &str,
        ctx: AvailabilityContext,
    ) -> Result<bool, FormError> {
        let (user, permissions) = tokio::try_join!(
            self.backend.fetch_user_settings(),
            self.backend.fetch_admin_permissions()
        )
        .map_err(|e| FormError::Fetch {
            message: e.to_string(),
        })?;

        Ok(is_feature_available(name, &permissions, &user, ctx))
    }
}
