use std::sync::Arc;

use anyhow::Context;

use opsdesk_app::app::App;
use opsdesk_auth::Role;
use opsdesk_infra::{AppConfig, InMemoryAuthClient, InMemoryDocumentStore};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("loading configuration")?;
    opsdesk_observability::init(config.log_format);
    tracing::info!(
        project_id = %config.project_id,
        offline_cache = config.offline_cache,
        currency = %config.currency,
        "starting opsdesk"
    );

    let email = std::env::var("OPSDESK_DEMO_EMAIL").unwrap_or_else(|_| "admin@opsdesk.dev".to_string());
    let password = std::env::var("OPSDESK_DEMO_PASSWORD").unwrap_or_else(|_| {
        tracing::warn!("OPSDESK_DEMO_PASSWORD not set; using insecure dev default");
        "opsdesk-dev".to_string()
    });

    let auth = InMemoryAuthClient::new();
    auth.register(&email, password.clone(), Some("Admin"), Role::Admin)?;

    let store = Arc::new(InMemoryDocumentStore::with_offline_cache(config.offline_cache));
    let app = App::new(config, store, auth);

    app.sign_in(&email, &password).await.context("signing in")?;
    match app.persist().await {
        Ok(saved) => tracing::info!(saved, "demo records written"),
        Err(err) => tracing::error!(error = %err, "demo records not written"),
    }

    let today = chrono::Local::now().date_naive();
    let dashboard = app.dashboard(today).await;
    println!("{}", serde_json::to_string_pretty(&dashboard)?);
    Ok(())
}
