use std::sync::Arc;
use std::time::Duration;

use axum_extra::extract::cookie::Key;
use base64::Engine;
use celebrate::config::{BasicConfig, Config};
use celebrate::db::MarketStorage;
use celebrate::router::{MarketState, market_router};
use celebrate::service::mailer::{Mailer, SmtpMailer, UnconfiguredMailer};
use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        listen_addr = %cfg.basic.listen_addr,
        database_url = %cfg.basic.database_url,
        upload_dir = %cfg.storage.upload_dir.display(),
        loglevel = %cfg.basic.loglevel,
    );
    debug!(mail = ?cfg.mail);

    let storage = MarketStorage::connect(&cfg.basic.database_url).await?;
    let cookie_key = load_cookie_key(&cfg.basic)?;

    let mailer: Arc<dyn Mailer> = match SmtpMailer::from_config(&cfg.mail)? {
        Some(smtp) => {
            info!(host = %cfg.mail.smtp_host, port = cfg.mail.smtp_port, "SMTP mailer configured");
            Arc::new(smtp)
        }
        None => {
            warn!("EMAIL_USER / EMAIL_PASS / ADMIN_EMAIL not set; contact form will fail");
            Arc::new(UnconfiguredMailer)
        }
    };

    spawn_session_sweeper(
        storage.clone(),
        Duration::from_secs(cfg.basic.session_sweep_secs.max(1)),
    );

    let state = MarketState::new(&cfg, storage, mailer, cookie_key);
    let app = market_router(state);

    let listener = TcpListener::bind(&cfg.basic.listen_addr).await?;
    info!("HTTP server listening on {}", cfg.basic.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

/// Stable key from config, or a per-process key (sessions die with the process).
fn load_cookie_key(basic: &BasicConfig) -> Result<Key, Box<dyn std::error::Error>> {
    match basic.cookie_key.as_deref() {
        Some(encoded) => {
            let bytes = base64::engine::general_purpose::STANDARD.decode(encoded.trim())?;
            Ok(Key::try_from(bytes.as_slice())?)
        }
        None => {
            warn!("basic.cookie_key not set; generated a random key, sessions will not survive a restart");
            Ok(Key::generate())
        }
    }
}

fn spawn_session_sweeper(storage: MarketStorage, period: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            match storage.delete_expired_sessions().await {
                Ok(0) => {}
                Ok(swept) => debug!(swept, "expired sessions removed"),
                Err(e) => error!(error = %e, "session sweep failed"),
            }
        }
    });
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
