use std::sync::Arc;
use std::time::Duration;
use turnpike::application_impl::{GateClient, restore_session};
use turnpike::application_port::{ApiClient, PublicPaths};
use turnpike::domain_model::{ApiRequest, Role};
use turnpike::infra_file::FileSessionStore;
use turnpike::infra_http::{NavRedirector, ReqwestTransport};
use turnpike::logger::*;
use turnpike::settings::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logger = Logger::init("info");

    let settings = parse_settings(cli.settings.as_deref())?;
    info!(?settings);
    logger.reload(&settings.log.filter)?;

    let store = Arc::new(FileSessionStore::new(&settings.auth.storage_path)?);
    let transport = Arc::new(ReqwestTransport::new(
        &settings.http.base_url,
        &settings.auth.refresh_path,
    )?);
    let redirector = Arc::new(NavRedirector::new(&settings.auth.login_path));

    match restore_session(store.as_ref()).await? {
        Some(active) => info!(
            "restored [{}] session for {}",
            active.role, active.session.profile.email
        ),
        None => info!("starting unauthenticated"),
    }

    let client = GateClient::new(
        Role::Operator,
        transport,
        store,
        redirector.clone(),
        PublicPaths::new(settings.auth.public_paths.clone()),
    )
    .with_refresh_timeout(Duration::from_secs(settings.auth.refresh_timeout_secs));

    if let Some(path) = cli.probe {
        match client.request(ApiRequest::get(path)).await {
            Ok(response) => info!("probe returned {}", response.status),
            Err(e) => error!("probe failed: {e}"),
        }
        if redirector.take_pending() {
            warn!("probe ended the session, next start is unauthenticated");
        }
    }

    Ok(())
}
