use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use csrd_application::UserRecord;
use csrd_core::{AppError, AppResult};
use csrd_domain::{Declaration, FormTemplate, OrgUnit, OrgUnitId, OrgUnitLevel};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::stored_user::StoredUser;


/// Seed file holding form templates.
const FORMS_FILE: &str = "forms.json";
/// Seed file holding declarations.
const DECLARATIONS_FILE: &str = "declarations.json";
/// Seed file holding directory entries with their passwords.
const USERS_FILE: &str = "users.json";
/// Seed file holding the organizational hierarchy, keyed by level.
const ORG_UNITS_FILE: &str = "organizational-units.json";

/// Organizational unit read from fixtures, with its place in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureOrgUnit {
    /// Hierarchy level.
    pub level: OrgUnitLevel,
    /// Unit one level up, absent for directions.
    pub parent_id: Option<OrgUnitId>,
    /// The unit itself.
    pub unit: OrgUnit,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrgUnitRow {
    id: OrgUnitId,
    name: String,
    #[serde(default)]
    direction_id: Option<OrgUnitId>,
    #[serde(default)]
    maintenance_center_id: Option<OrgUnitId>,
    #[serde(default)]
    gmr_id: Option<OrgUnitId>,
}

impl OrgUnitRow {
    fn into_fixture(self, level: OrgUnitLevel) -> FixtureOrgUnit {
        let parent_id = match level {
            OrgUnitLevel::Directions => None,
            OrgUnitLevel::MaintenanceCenters => self.direction_id,
            OrgUnitLevel::Gmrs => self.maintenance_center_id,
            OrgUnitLevel::Teams => self.gmr_id,
        };

        FixtureOrgUnit {
            level,
            parent_id,
            unit: OrgUnit::new(self.id, self.name),
        }
    }
}

/// Reads JSON seed data from a directory.
///
/// Collection files hold either a bare array or a json-server database
/// object with the collection under its name. Missing files yield no rows.
#[derive(Debug, Clone)]
pub struct JsonFixtureLoader {
    data_dir: PathBuf,
}

impl JsonFixtureLoader {
    /// Creates a loader reading from `data_dir`.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Loads seed form templates.
    pub async fn load_templates(&self) -> AppResult<Vec<FormTemplate>> {
        self.load_collection(FORMS_FILE, "forms").await
    }

    /// Loads seed declarations.
    pub async fn load_declarations(&self) -> AppResult<Vec<Declaration>> {
        self.load_collection(DECLARATIONS_FILE, "declarations").await
    }

    /// Loads seed directory entries.
    pub async fn load_users(&self) -> AppResult<Vec<UserRecord>> {
        let users: Vec<StoredUser> = self.load_collection(USERS_FILE, "users").await?;
        Ok(users.into_iter().map(UserRecord::from).collect())
    }

    /// Loads the seed organizational hierarchy, directions first.
    pub async fn load_org_units(&self) -> AppResult<Vec<FixtureOrgUnit>> {
        let path = self.data_dir.join(ORG_UNITS_FILE);
        let Some(document) = read_document(&path).await? else {
            return Ok(Vec::new());
        };

        let mut units = Vec::new();
        for level in OrgUnitLevel::all() {
            let Some(rows) = document.get(level.path_segment()) else {
                continue;
            };
            let rows: Vec<OrgUnitRow> = decode(&path, rows.clone())?;
            units.extend(rows.into_iter().map(|row| row.into_fixture(level)));
        }

        tracing::info!(file = %path.display(), count = units.len(), "organizational units loaded");
        Ok(units)
    }

    async fn load_collection<T: DeserializeOwned>(
        &self,
        file_name: &str,
        collection: &str,
    ) -> AppResult<Vec<T>> {
        let path = self.data_dir.join(file_name);
        let Some(document) = read_document(&path).await? else {
            return Ok(Vec::new());
        };

        let rows = match document {
            Value::Array(_) => document,
            Value::Object(mut database) => database.remove(collection).unwrap_or_else(|| {
                tracing::warn!(file = %path.display(), collection, "collection missing from fixture");
                Value::Array(Vec::new())
            }),
            _ => {
                return Err(AppError::Internal(format!(
                    "fixture '{}' must hold an array or an object",
                    path.display()
                )));
            }
        };

        let rows: Vec<T> = decode(&path, rows)?;
        tracing::info!(file = %path.display(), count = rows.len(), "fixtures loaded");
        Ok(rows)
    }
}

async fn read_document(path: &Path) -> AppResult<Option<Value>> {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(error) if error.kind() == ErrorKind::NotFound => {
            tracing::warn!(file = %path.display(), "fixture file not found, starting empty");
            return Ok(None);
        }
        Err(error) => {
            return Err(AppError::Internal(format!(
                "failed to read fixture '{}': {error}",
                path.display()
            )));
        }
    };

    serde_json::from_str(&contents).map(Some).map_err(|error| {
        AppError::Internal(format!(
            "fixture '{}' is not valid JSON: {error}",
            path.display()
        ))
    })
}

fn decode<T: DeserializeOwned>(path: &Path, value: Value) -> AppResult<T> {
    serde_json::from_value(value).map_err(|error| {
        AppError::Internal(format!(
            "fixture '{}' has an unexpected shape: {error}",
            path.display()
        ))
    })
}
