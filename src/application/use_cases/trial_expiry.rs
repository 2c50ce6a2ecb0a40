use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::use_cases::subscriber::SubscriberRepoTrait,
    domain::entities::subscriber::Subscriber,
};

/// What the host must do with the session that just authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOutcome {
    /// The session's role set is still accurate.
    Keep,
    /// Roles changed; the session must be rebuilt before it is trusted again.
    Rebuild,
}

/// Revokes expired trial roles on authentication.
#[derive(Clone)]
pub struct TrialExpiryUseCases {
    subscriber_repo: Arc<dyn SubscriberRepoTrait>,
    trial_role: String,
}

impl TrialExpiryUseCases {
    pub fn new(subscriber_repo: Arc<dyn SubscriberRepoTrait>, trial_role: String) -> Self {
        Self {
            subscriber_repo,
            trial_role,
        }
    }

    pub fn trial_role(&self) -> &str {
        &self.trial_role
    }

    /// Returns `true` when the trial was expired and the session must be rebuilt.
    pub async fn check_and_expire_trial(&self, subscriber: &mut dyn Subscriber) -> AppResult<bool> {
        self.check_and_expire_trial_at(subscriber, Utc::now()).await
    }

    #[instrument(skip(self, subscriber), fields(subscriber_id = %subscriber.id()))]
    pub async fn check_and_expire_trial_at(
        &self,
        subscriber: &mut dyn Subscriber,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let expired = subscriber.trial_end().is_some_and(|end| end < now);
        if !expired || !subscriber.has_role(&self.trial_role) {
            return Ok(false);
        }

        subscriber.revoke_role(&self.trial_role);
        subscriber.set_trial_end(None);
        self.subscriber_repo.flush(&*subscriber).await?;

        info!(trial_role = %self.trial_role, "Trial expired, role revoked");
        Ok(true)
    }

    /// Entry point for the host's authentication-success hook.
    pub async fn on_authentication_success(&self, subscriber_id: Uuid) -> AppResult<SessionOutcome> {
        let mut subscriber = self
            .subscriber_repo
            .get_by_id(subscriber_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if self.check_and_expire_trial(&mut subscriber).await? {
            Ok(SessionOutcome::Rebuild)
        } else {
            Ok(SessionOutcome::Keep)
        }
    }
}
