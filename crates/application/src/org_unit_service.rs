use std::sync::Arc;

use csrd_core::{AppError, AppResult};
use csrd_domain::{OrgUnit, OrgUnitId, OrgUnitLevel};

use crate::ports::OrgUnitRepository;

/// Application service for organizational hierarchy lookups.
#[derive(Clone)]
pub struct OrgUnitService {
    repository: Arc<dyn OrgUnitRepository>,
}

impl OrgUnitService {
    /// Creates a new organizational unit service.
    #[must_use]
    pub fn new(repository: Arc<dyn OrgUnitRepository>) -> Self {
        Self { repository }
    }

    /// Lists the units of `level` below `parent_id`.
    ///
    /// Every level except directions requires a parent.
    pub async fn list(
        &self,
        level: OrgUnitLevel,
        parent_id: Option<&OrgUnitId>,
    ) -> AppResult<Vec<OrgUnit>> {
        if let Some(key) = level.parent_filter_key()
            && parent_id.is_none()
        {
            return Err(AppError::Validation(format!(
                "listing {} requires '{key}'",
                level.path_segment()
            )));
        }

        self.repository.list(level, parent_id).await
    }
}
