//! Field service console composition root.

#![forbid(unsafe_code)]

mod commands;
mod console_config;

use std::env;
use std::sync::Arc;

use fieldops_application::{AccessGate, NavigationService, PermissionStore, SessionService};
use fieldops_core::{AppError, AppResult};
use fieldops_domain::NavigationCatalog;
use fieldops_infrastructure::{ConsoleNotifier, DurableStorage, HttpPermissionSource};
use tracing::info;

use crate::commands::ConsoleCommand;
use crate::console_config::{ConsoleConfig, init_tracing};

/// Services shared by every console command.
pub(crate) struct ConsoleRuntime {
    pub store: Arc<PermissionStore>,
    pub sessions: SessionService,
    pub navigation: NavigationService,
    pub gate: AccessGate,
    pub notifier: Arc<ConsoleNotifier>,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = env::args().skip(1).collect::<Vec<_>>();
    let command = ConsoleCommand::parse(args.as_slice())?;
    let config = ConsoleConfig::load()?;
    let runtime = build_runtime(&config)?;

    info!(
        api_base_url = %config.api_base_url,
        storage_dir = %config.storage_dir.display(),
        command = command.name(),
        "fieldops-console started"
    );

    commands::run(&runtime, command).await
}

fn build_runtime(config: &ConsoleConfig) -> AppResult<ConsoleRuntime> {
    let http_client = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;
    let source = Arc::new(HttpPermissionSource::new(
        http_client,
        config.api_base_url.clone(),
    )?);
    let storage = Arc::new(DurableStorage::file(config.storage_dir.clone()));
    let store = Arc::new(PermissionStore::new(source, storage.clone(), storage.clone()));
    let notifier = Arc::new(ConsoleNotifier::new());

    Ok(ConsoleRuntime {
        sessions: SessionService::new(storage, store.clone()),
        navigation: NavigationService::new(
            NavigationCatalog::console_default()?,
            config.fallback_route.clone(),
            notifier.clone(),
        ),
        gate: AccessGate::new(),
        notifier,
        store,
    })
}
