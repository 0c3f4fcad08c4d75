//! HTTP server initialization and runtime setup.
//!
//! Builds the outbound clients, the credential store and the services, then
//! runs the Axum server until a shutdown signal arrives.

use crate::application::credentials::{ApiCredential, OPENAI_API_KEY, STRIPE_SECRET_KEY};
use crate::application::services::{
    CheckoutService, CheckoutUrls, DomainVerificationService, MealAnalysisService,
};
use crate::config::Config;
use crate::domain::ports::CredentialStore;
use crate::infrastructure::credentials::{NullCredentialStore, RedisCredentialStore};
use crate::infrastructure::dns::HickoryDnsLookup;
use crate::infrastructure::payments::StripeGateway;
use crate::infrastructure::vision::OpenAiVisionModel;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Redis credential store (or NullCredentialStore fallback)
/// - Stripe and OpenAI API credentials
/// - Shared HTTP client and DNS resolver
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - The HTTP client cannot be built
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let state = build_state(&config).await?;

    let app = app_router(state, config.behind_proxy)?;

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Wires adapters and services from configuration.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built.
pub async fn build_state(config: &Config) -> Result<AppState> {
    let credential_store = connect_credential_store(config).await;

    let stripe_key = Arc::new(ApiCredential::new(
        STRIPE_SECRET_KEY,
        config.stripe_secret_key.clone(),
        credential_store.clone(),
    ));
    let openai_key = Arc::new(ApiCredential::new(
        OPENAI_API_KEY,
        config.openai_api_key.clone(),
        credential_store.clone(),
    ));

    for credential in [&stripe_key, &openai_key] {
        if credential.get_or_reload().await.is_none() {
            tracing::warn!(
                credential = credential.name(),
                "Credential not configured; dependent endpoints will fail until it is set"
            );
        }
    }

    let http = reqwest::Client::builder()
        .user_agent(concat!("goodiex-api/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;

    let checkout_service = CheckoutService::new(
        Arc::new(StripeGateway::new(http.clone(), &config.stripe_api_base)),
        stripe_key,
        CheckoutUrls {
            success_url: config.checkout_success_url.clone(),
            cancel_url: config.checkout_cancel_url.clone(),
        },
    );

    let domain_service = DomainVerificationService::new(
        Arc::new(HickoryDnsLookup::from_system_conf()),
        &config.cname_base_domain,
    );

    let meal_service = MealAnalysisService::new(
        Arc::new(OpenAiVisionModel::new(
            http,
            &config.openai_api_base,
            &config.openai_model,
            config.openai_max_tokens,
        )),
        openai_key,
    );

    Ok(AppState {
        checkout_service: Arc::new(checkout_service),
        domain_service: Arc::new(domain_service),
        meal_service: Arc::new(meal_service),
        credential_store,
    })
}

async fn connect_credential_store(config: &Config) -> Arc<dyn CredentialStore> {
    let Some(redis_url) = &config.redis_url else {
        tracing::info!("Credential store disabled (NullCredentialStore)");
        return Arc::new(NullCredentialStore::new());
    };

    match RedisCredentialStore::connect(redis_url).await {
        Ok(store) => {
            tracing::info!("Credential store enabled (Redis)");
            Arc::new(store)
        }
        Err(e) => {
            tracing::warn!(
                "Failed to connect to Redis: {}. Using NullCredentialStore.",
                e
            );
            Arc::new(NullCredentialStore::new())
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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

    tracing::info!("Shutdown signal received");
}
