use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::use_cases::subscriber::SubscriberRepoTrait,
    domain::entities::subscriber::{Subscriber, SubscriberProfile},
};

// Subscriber row as stored in the db.
#[derive(sqlx::FromRow, Debug)]
pub struct SubscriberDb {
    pub id: Uuid,
    pub billing_customer_id: Option<String>,
    pub roles: Vec<String>,
    pub trial_end: Option<DateTime<Utc>>,
}

impl From<SubscriberDb> for SubscriberProfile {
    fn from(row: SubscriberDb) -> Self {
        SubscriberProfile {
            id: row.id,
            billing_customer_id: row.billing_customer_id,
            roles: row.roles,
            trial_end: row.trial_end,
        }
    }
}

#[async_trait]
impl SubscriberRepoTrait for PostgresPersistence {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<SubscriberProfile>> {
        let row = sqlx::query_as::<_, SubscriberDb>(
            "SELECT id, billing_customer_id, roles, trial_end FROM subscribers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(AppError::from)?;
        Ok(row.map(SubscriberProfile::from))
    }

    async fn set_billing_customer_id(&self, id: Uuid, customer_id: &str) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE subscribers SET billing_customer_id = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(customer_id)
        .execute(self.pool())
        .await
        .map_err(AppError::from)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn flush(&self, subscriber: &dyn Subscriber) -> AppResult<()> {
        let result = sqlx::query(
            r#"
                UPDATE subscribers
                SET roles = $2, trial_end = $3, updated_at = NOW()
                WHERE id = $1
            "#,
        )
        .bind(subscriber.id())
        .bind(subscriber.granted_roles().to_vec())
        .bind(subscriber.trial_end())
        .execute(self.pool())
        .await
        .map_err(AppError::from)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
