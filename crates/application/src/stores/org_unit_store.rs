use std::collections::HashMap;

use csrd_domain::{OrgUnit, OrgUnitId, OrgUnitLevel};

use crate::org_unit_service::OrgUnitService;
use crate::stores::ResourceState;

/// Cascading direction → maintenance center → GMR → team pickers.
#[derive(Clone)]
pub struct OrgUnitStore {
    service: OrgUnitService,
    state: ResourceState<HashMap<OrgUnitLevel, Vec<OrgUnit>>>,
}

impl OrgUnitStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new(service: OrgUnitService) -> Self {
        Self {
            service,
            state: ResourceState::default(),
        }
    }

    /// Returns the request state.
    #[must_use]
    pub fn state(&self) -> &ResourceState<HashMap<OrgUnitLevel, Vec<OrgUnit>>> {
        &self.state
    }

    /// Returns the loaded units of one level.
    #[must_use]
    pub fn units(&self, level: OrgUnitLevel) -> &[OrgUnit] {
        self.state
            .data()
            .get(&level)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Loads one level below `parent_id` and clears every deeper level.
    pub async fn load(&mut self, level: OrgUnitLevel, parent_id: Option<&OrgUnitId>) {
        self.state.begin();
        let result = self.service.list(level, parent_id).await;
        if let Some(units) = self.state.finish(result) {
            let loaded = self.state.data_mut();
            for deeper in OrgUnitLevel::all()
                .into_iter()
                .skip_while(|candidate| *candidate != level)
                .skip(1)
            {
                loaded.remove(&deeper);
            }
            loaded.insert(level, units);
        }
    }

    /// Clears every level.
    pub fn reset(&mut self) {
        self.state.reset();
    }
}
