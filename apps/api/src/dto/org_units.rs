use csrd_domain::OrgUnit;
use serde::Serialize;
use ts_rs::TS;

/// API representation of an organizational unit.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/org-unit-response.ts"
)]
pub struct OrgUnitResponse {
    pub id: String,
    pub name: String,
}

impl From<OrgUnit> for OrgUnitResponse {
    fn from(value: OrgUnit) -> Self {
        Self {
            id: value.id().to_string(),
            name: value.name().to_owned(),
        }
    }
}
