use mimalloc::MiMalloc;
use pathways::{ApiClient, Config, CredentialStore, FileStore, MemoryStore};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const EMAIL_ENV: &str = "PATHWAYS_EMAIL";
const PASSWORD_ENV: &str = "PATHWAYS_PASSWORD";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        base_url = %cfg.api.base_url,
        loglevel = %cfg.basic.loglevel,
        session_file = %cfg
            .basic
            .session_file
            .as_ref()
            .map_or_else(|| "<memory>".to_string(), |p| p.display().to_string()),
    );

    let store: Arc<dyn CredentialStore> = match cfg.basic.session_file.as_ref() {
        Some(path) => Arc::new(FileStore::new(path)),
        None => Arc::new(MemoryStore::new()),
    };
    let client = ApiClient::new(&cfg.api, &cfg.retry, store)?;

    let mut auth_events = client.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = auth_events.recv().await {
            warn!(event = event.name(), message = %event.message, "Session ended");
        }
    });

    if let (Ok(email), Ok(password)) = (std::env::var(EMAIL_ENV), std::env::var(PASSWORD_ENV)) {
        if let Err(e) = client.login(email, password).await {
            warn!(error = %e, "Login failed: {}", e.user_message());
            return Ok(());
        }
    }

    if !client.is_authenticated().await? {
        info!("No stored session; set {EMAIL_ENV} and {PASSWORD_ENV} to log in.");
        return Ok(());
    }

    match client.profile().await {
        Ok(user) => info!(
            user_id = user.id.as_deref().unwrap_or("<unknown>"),
            name = user.name.as_deref().unwrap_or("<unknown>"),
            "Profile loaded"
        ),
        Err(e) => warn!(error = %e, "Profile request failed: {}", e.user_message()),
    }

    match client.quiz_attempts().await {
        Ok(attempts) => info!(
            attempts = attempts.as_array().map_or(0, Vec::len),
            "Quiz attempts loaded"
        ),
        Err(e) => warn!(error = %e, "Quiz attempts request failed: {}", e.user_message()),
    }

    Ok(())
}
