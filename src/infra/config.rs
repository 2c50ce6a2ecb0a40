use std::{net::SocketAddr, path::PathBuf};

use env_helpers::{get_env, get_env_default};
use secrecy::SecretString;
use url::Url;

use crate::infra::stripe_client::STRIPE_API_BASE;

pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Stripe secret key used for every billing call.
    pub stripe_secret_key: SecretString,
    /// Publishable key handed to the browser for card tokenization.
    pub stripe_public_key: String,
    /// Name shown as payee on the checkout form.
    pub payee_name: Option<String>,
    /// Override for the Stripe API base (e.g., a local mock).
    pub stripe_api_base: Url,
    pub database_url: String,
    /// Secret the host signs `access_token` session cookies with.
    pub jwt_secret: SecretString,
    /// JSON file holding plans, subscription check and trial role.
    pub subscription_config_path: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let bind_addr: SocketAddr =
            get_env_default("BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 8080)));
        let stripe_secret_key: SecretString =
            SecretString::new(get_env::<String>("STRIPE_SECRET_KEY").into());
        let stripe_public_key: String = get_env("STRIPE_PUBLIC_KEY");
        let payee_name: Option<String> = std::env::var("PAYEE_NAME")
            .ok()
            .filter(|s| !s.trim().is_empty());
        let stripe_api_base: Url = get_env_default(
            "STRIPE_API_BASE",
            Url::parse(STRIPE_API_BASE).expect("default Stripe API base is a valid URL"),
        );
        let database_url: String = get_env("DATABASE_URL");
        let jwt_secret: SecretString = SecretString::new(get_env::<String>("JWT_SECRET").into());
        let subscription_config_path: String =
            get_env_default("SUBSCRIPTION_CONFIG_PATH", "subscription.json".to_string());

        Self {
            bind_addr,
            stripe_secret_key,
            stripe_public_key,
            payee_name,
            stripe_api_base,
            database_url,
            jwt_secret,
            subscription_config_path: PathBuf::from(subscription_config_path),
        }
    }
}
