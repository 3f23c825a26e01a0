use csrd_application::UserRecord;
use csrd_domain::User;
use serde::{Deserialize, Serialize};

/// User entry as persisted by the directory backend, password included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct StoredUser {
    #[serde(flatten)]
    user: User,
    #[serde(default)]
    password: String,
}

impl From<StoredUser> for UserRecord {
    fn from(value: StoredUser) -> Self {
        Self {
            user: value.user,
            password: value.password,
        }
    }
}

impl From<UserRecord> for StoredUser {
    fn from(value: UserRecord) -> Self {
        Self {
            user: value.user,
            password: value.password,
        }
    }
}
