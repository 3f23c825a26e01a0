use async_trait::async_trait;
use csrd_application::OrgUnitRepository;
use csrd_core::AppResult;
use csrd_domain::{OrgUnit, OrgUnitId, OrgUnitLevel};

use crate::json_server_client::JsonServerClient;

#[cfg(test)]
mod tests;

const ORGANIZATIONAL_UNITS: &str = "organizational-units";

/// Organizational hierarchy served by the `/organizational-units` REST API.
#[derive(Debug, Clone)]
pub struct RestOrgUnitRepository {
    client: JsonServerClient,
}

impl RestOrgUnitRepository {
    /// Creates a repository over `client`.
    #[must_use]
    pub fn new(client: JsonServerClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl OrgUnitRepository for RestOrgUnitRepository {
    async fn list(
        &self,
        level: OrgUnitLevel,
        parent_id: Option<&OrgUnitId>,
    ) -> AppResult<Vec<OrgUnit>> {
        let mut url = self
            .client
            .endpoint(&[ORGANIZATIONAL_UNITS, level.path_segment()])?;
        if let (Some(key), Some(parent_id)) = (level.parent_filter_key(), parent_id) {
            url.query_pairs_mut().append_pair(key, parent_id.as_str());
        }

        self.client.get(url).await
    }
}
