use std::collections::HashMap;

use async_trait::async_trait;
use csrd_application::OrgUnitRepository;
use csrd_core::AppResult;
use csrd_domain::{OrgUnit, OrgUnitId, OrgUnitLevel};
use tokio::sync::RwLock;

use crate::json_fixture_loader::FixtureOrgUnit;


/// In-memory organizational hierarchy.
#[derive(Debug, Default)]
pub struct InMemoryOrgUnitRepository {
    units: RwLock<HashMap<OrgUnitLevel, Vec<FixtureOrgUnit>>>,
}

impl InMemoryOrgUnitRepository {
    /// Creates an empty hierarchy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a hierarchy seeded with `units`, kept in the given order.
    #[must_use]
    pub fn with_units(units: impl IntoIterator<Item = FixtureOrgUnit>) -> Self {
        let mut by_level: HashMap<OrgUnitLevel, Vec<FixtureOrgUnit>> = HashMap::new();
        for unit in units {
            by_level.entry(unit.level).or_default().push(unit);
        }

        Self {
            units: RwLock::new(by_level),
        }
    }
}

#[async_trait]
impl OrgUnitRepository for InMemoryOrgUnitRepository {
    async fn list(
        &self,
        level: OrgUnitLevel,
        parent_id: Option<&OrgUnitId>,
    ) -> AppResult<Vec<OrgUnit>> {
        let units = self.units.read().await;
        Ok(units
            .get(&level)
            .into_iter()
            .flatten()
            .filter(|unit| {
                parent_id.is_none_or(|parent_id| unit.parent_id.as_ref() == Some(parent_id))
            })
            .map(|unit| unit.unit.clone())
            .collect())
    }
}
