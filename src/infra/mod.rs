use crate::{adapters::persistence::PostgresPersistence, infra::db::init_db};

pub mod app;
pub mod config;
pub mod db;
pub mod settings;
pub mod setup;
pub mod stripe_billing_adapter;
pub mod stripe_client;

pub async fn postgres_persistence(database_url: &str) -> anyhow::Result<PostgresPersistence> {
    let pool = init_db(database_url).await?;
    Ok(PostgresPersistence::new(pool))
}
