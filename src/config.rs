use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Shared secret for inbound payment webhooks. Empty means unconfigured;
    /// the webhook handler refuses to process anything in that state.
    pub webhook_secret: String,
    pub mail_service_url: String,
    pub mail_service_token: String,
    pub mail_from_alias: String,
    pub admin_api_token: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            webhook_secret: env::var("STRIPE_WEBHOOK_SECRET").unwrap_or_default(),
            mail_service_url: env::var("MAIL_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8000/api/v1/send".to_string()),
            mail_service_token: env::var("MAIL_SERVICE_TOKEN").unwrap_or_else(|_| "test-token-1".to_string()),
            mail_from_alias: env::var("MAIL_FROM_ALIAS").unwrap_or_else(|_| "Cicada Collective <noreply@mucicada.com>".to_string()),
            admin_api_token: env::var("ADMIN_API_TOKEN").expect("ADMIN_API_TOKEN must be set"),
        }
    }
}
