use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use csrd_core::AppError;
use csrd_infrastructure::{
    InMemoryDeclarationRepository, InMemoryFormTemplateRepository, InMemoryOrgUnitRepository,
    InMemoryUserRepository, JsonFixtureLoader, JsonServerClient, RestDeclarationRepository,
    RestFormTemplateRepository, RestOrgUnitRepository, RestUserRepository,
};
use tracing::info;
use url::Url;

use crate::api_config::{ApiConfig, DataBackendConfig};
use crate::state::AppState;

mod sessions;

pub use sessions::build_session_layer;

pub async fn build_app_state(config: &ApiConfig) -> Result<AppState, AppError> {
    match &config.data_backend {
        DataBackendConfig::Fixtures { data_dir } => build_fixture_state(data_dir).await,
        DataBackendConfig::Rest {
            api_url,
            org_unit_api_url,
            timeout,
        } => build_rest_state(api_url, org_unit_api_url, *timeout),
    }
}

async fn build_fixture_state(data_dir: &Path) -> Result<AppState, AppError> {
    let loader = JsonFixtureLoader::new(data_dir);
    let users = loader.load_users().await?;
    let templates = loader.load_templates().await?;
    let declarations = loader.load_declarations().await?;
    let org_units = loader.load_org_units().await?;

    info!(
        data_dir = %data_dir.display(),
        users = users.len(),
        templates = templates.len(),
        declarations = declarations.len(),
        org_units = org_units.len(),
        "using fixture data backend"
    );

    Ok(AppState::from_repositories(
        Arc::new(InMemoryUserRepository::with_records(users)),
        Arc::new(InMemoryFormTemplateRepository::with_templates(templates)),
        Arc::new(InMemoryDeclarationRepository::with_declarations(
            declarations,
        )),
        Arc::new(InMemoryOrgUnitRepository::with_units(org_units)),
    ))
}

fn build_rest_state(
    api_url: &Url,
    org_unit_api_url: &Url,
    timeout: Duration,
) -> Result<AppState, AppError> {
    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;

    let client = JsonServerClient::new(http_client.clone(), api_url.clone());
    let org_unit_client = JsonServerClient::new(http_client, org_unit_api_url.clone());

    info!(%api_url, %org_unit_api_url, "using REST data backend");

    Ok(AppState::from_repositories(
        Arc::new(RestUserRepository::new(client.clone())),
        Arc::new(RestFormTemplateRepository::new(client.clone())),
        Arc::new(RestDeclarationRepository::new(client)),
        Arc::new(RestOrgUnitRepository::new(org_unit_client)),
    ))
}
