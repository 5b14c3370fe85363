//! Settings form controller - reconciles a local draft with the remote snapshot

use super::form::{initialize, is_dirty, FormState};
use super::notify::Notifier;
use super::validation::{form_schema, FlagValidators};
use super::visibility::editable_flags;
use crate::config::Config;
use crate::contract::{
    Ack, AdminPermissions, BetaFeaturesBackend, ControllerState, FeatureSettings, FormError,
    FormView, IgnoreReason, PartialSettings, SaveControl, SubmitError, SubmitOutcome,
    UpdateBetaFeaturesRequest, VisibleControl,
};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Loading,
    Ready,
    Submitting,
}

struct Inner {
    phase: Phase,
    /// Last remote snapshot the draft was initialized from
    committed: FeatureSettings,
    permissions: AdminPermissions,
    draft: FormState,
    last_error: Option<String>,
}

/// Controller for one settings screen.
///
/// Holds the committed snapshot, the local draft and the admin permissions.
/// The lock is never held across an `.await`.
pub struct SettingsFormController {
    config: Arc<Config>,
    validators: Arc<FlagValidators>,
    backend: Arc<dyn BetaFeaturesBackend>,
    notifier: Arc<dyn Notifier>,
    inner: Mutex<Inner>,
}

impl SettingsFormController {
    /// Create a controller in the loading state
    pub fn new(
        config: Arc<Config>,
        backend: Arc<dyn BetaFeaturesBackend>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let validators = Arc::new(FlagValidators::new(&config));
        Self::with_validators(config, validators, backend, notifier)
    }

    /// Create a controller reusing validators compiled for `config`
    pub fn with_validators(
        config: Arc<Config>,
        validators: Arc<FlagValidators>,
        backend: Arc<dyn BetaFeaturesBackend>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            validators,
            backend,
            notifier,
            inner: Mutex::new(Inner {
                phase: Phase::Loading,
                committed: FeatureSettings::default(),
                permissions: AdminPermissions::default(),
                draft: FormState::default(),
                last_error: None,
            }),
        }
    }

    /// Fetch user settings and admin permissions, then become ready
    pub async fn load(&self) -> Result<(), FormError> {
        let (remote, permissions) = tokio::try_join!(
            self.backend.fetch_user_settings(),
            self.backend.fetch_admin_permissions()
        )
        .map_err(|e| FormError::Fetch {
            message: e.to_string(),
        })?;

        tracing::info!(
            flags = remote.len(),
            visible = editable_flags(&self.config, &permissions).count(),
            "beta feature settings loaded"
        );
        self.receive(remote, permissions);
        Ok(())
    }

    /// Install a fresh remote snapshot, discarding unsaved edits
    pub fn receive(&self, remote: FeatureSettings, permissions: AdminPermissions) {
        let mut inner = self.inner.lock();
        inner.draft = initialize(&remote);
        inner.committed = remote;
        inner.permissions = permissions;
        inner.last_error = None;
        if inner.phase == Phase::Loading {
            inner.phase = Phase::Ready;
        }
    }

    /// Apply a user edit to the draft.
    ///
    /// Every field must be declared, admin-enabled and of its declared kind;
    /// otherwise nothing is applied.
    pub fn edit(&self, patch: &PartialSettings) -> Result<ControllerState, FormError> {
        let mut inner = self.inner.lock();
        if inner.phase == Phase::Loading {
            return Err(FormError::NotLoaded);
        }

        for (name, value) in patch.iter() {
            if self.config.flag(name).is_none() {
                return Err(FormError::UnknownField { name: name.clone() });
            }
            if !inner.permissions.is_enabled(name) || self.config.is_graduated(name) {
                return Err(FormError::Hidden { name: name.clone() });
            }
            self.validators.validate(name, value)?;
        }

        inner.draft.apply(patch);
        Ok(self.state_of(&inner))
    }

    pub fn state(&self) -> ControllerState {
        self.state_of(&self.inner.lock())
    }

    /// Live comparison of the draft against the committed snapshot
    pub fn is_dirty(&self) -> bool {
        let inner = self.inner.lock();
        is_dirty(&self.config, &inner.committed, &inner.draft)
    }

    pub fn draft(&self) -> FormState {
        self.inner.lock().draft.clone()
    }

    pub fn committed(&self) -> FeatureSettings {
        self.inner.lock().committed.clone()
    }

    /// Snapshot of everything the rendering surface needs
    pub fn view(&self) -> FormView {
        let inner = self.inner.lock();
        let active = self.has_editable_flag(&inner);

        let controls = editable_flags(&self.config, &inner.permissions)
            .map(|flag| VisibleControl {
                name: flag.name.clone(),
                title: flag.title.clone(),
                value: inner
                    .draft
                    .beta_features
                    .get(&flag.name)
                    .cloned()
                    .unwrap_or_else(|| flag.default_value()),
            })
            .collect();

        let state = self.state_of(&inner);
        let save = if !active {
            SaveControl::Hidden
        } else if state == ControllerState::Dirty {
            SaveControl::Enabled
        } else {
            SaveControl::Disabled
        };

        let empty_state = (!active && inner.phase != Phase::Loading)
            .then(|| self.config.messages.empty_state.clone());

        FormView {
            state,
            description: self.config.messages.description.clone(),
            empty_state,
            controls,
            save,
            last_error: inner.last_error.clone(),
            form: form_schema(&self.config, &inner.permissions),
        }
    }

    /// Send the draft to the backend.
    ///
    /// Inert unless the form is ready, dirty and has an active feature; an
    /// inert call returns [`SubmitOutcome::Ignored`] without a remote call.
    pub async fn submit(&self) -> Result<SubmitOutcome, SubmitError> {
        let request = {
            let mut inner = self.inner.lock();
            if let Some(reason) = self.submit_blocker(&inner) {
                tracing::debug!(?reason, "submit ignored");
                return Ok(SubmitOutcome::Ignored(reason));
            }
            inner.phase = Phase::Submitting;
            inner.last_error = None;
            UpdateBetaFeaturesRequest {
                beta_features: inner.draft.beta_features.clone(),
            }
        };
        let submitted = request.beta_features.clone();

        if let Err(e) = self.backend.update_user_settings(request).await {
            let message = e.to_string();
            tracing::warn!(error = %message, "failed to save beta feature settings");
            self.notifier.error(&format!(
                "{}: {}",
                self.config.messages.save_failed_prefix, message
            ));

            let mut inner = self.inner.lock();
            inner.phase = Phase::Ready;
            inner.last_error = Some(message.clone());
            return Err(SubmitError::Transport { message });
        }

        self.notifier.success(&self.config.messages.saved);

        let committed = match self.backend.fetch_user_settings().await {
            Ok(fresh) => fresh,
            Err(e) => {
                tracing::warn!(error = %e, "refetch after save failed, keeping submitted values");
                submitted
            }
        };

        {
            let mut inner = self.inner.lock();
            inner.draft = initialize(&committed);
            inner.committed = committed.clone();
            inner.phase = Phase::Ready;
        }

        tracing::info!(flags = committed.len(), "beta feature settings saved");
        Ok(SubmitOutcome::Saved(Ack {
            committed,
            saved_at: chrono::Utc::now(),
        }))
    }

    fn submit_blocker(&self, inner: &Inner) -> Option<IgnoreReason> {
        match inner.phase {
            Phase::Loading => return Some(IgnoreReason::NotLoaded),
            Phase::Submitting => return Some(IgnoreReason::InFlight),
            Phase::Ready => {}
        }
        if !self.has_editable_flag(inner) {
            return Some(IgnoreReason::NoActiveFeatures);
        }
        if !is_dirty(&self.config, &inner.committed, &inner.draft) {
            return Some(IgnoreReason::NotDirty);
        }
        None
    }

    /// Whether the screen offers at least one control.
    ///
    /// Admin-enabled keys missing from the catalog do not count.
    fn has_editable_flag(&self, inner: &Inner) -> bool {
        editable_flags(&self.config, &inner.permissions)
            .next()
            .is_some()
    }

    fn state_of(&self, inner: &Inner) -> ControllerState {
        match inner.phase {
            Phase::Loading => ControllerState::Loading,
            Phase::Submitting => ControllerState::Submitting,
            Phase::Ready if is_dirty(&self.config, &inner.committed, &inner.draft) => {
                ControllerState::Dirty
            }
            Phase::Ready => ControllerState::Clean,
        }
    }
}
