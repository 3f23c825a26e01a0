use std::str::FromStr;

use csrd_core::AppError;
use serde::{Deserialize, Serialize};

use crate::identifier::string_identifier;

string_identifier!(
    /// Identifier of an organizational unit.
    OrgUnitId
);

/// Level in the direction → maintenance center → GMR → team hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrgUnitLevel {
    /// Top level.
    Directions,
    /// Children of a direction.
    MaintenanceCenters,
    /// Children of a maintenance center.
    Gmrs,
    /// Children of a GMR.
    Teams,
}

impl OrgUnitLevel {
    /// Returns every level, top first.
    #[must_use]
    pub fn all() -> [Self; 4] {
        [
            Self::Directions,
            Self::MaintenanceCenters,
            Self::Gmrs,
            Self::Teams,
        ]
    }

    /// Returns the URL path segment of the level.
    #[must_use]
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::Directions => "directions",
            Self::MaintenanceCenters => "maintenance-centers",
            Self::Gmrs => "gmrs",
            Self::Teams => "teams",
        }
    }

    /// Returns the query key filtering this level by its parent.
    #[must_use]
    pub fn parent_filter_key(self) -> Option<&'static str> {
        match self {
            Self::Directions => None,
            Self::MaintenanceCenters => Some("directionId"),
            Self::Gmrs => Some("maintenanceCenterId"),
            Self::Teams => Some("gmrId"),
        }
    }
}

impl FromStr for OrgUnitLevel {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|level| level.path_segment() == value)
            .ok_or_else(|| {
                AppError::Validation(format!("unknown organizational unit level '{value}'"))
            })
    }
}

/// Named unit at one level of the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgUnit {
    id: OrgUnitId,
    name: String,
}

impl OrgUnit {
    /// Creates a unit.
    #[must_use]
    pub fn new(id: OrgUnitId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Returns the unit identifier.
    #[must_use]
    pub fn id(&self) -> &OrgUnitId {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}
