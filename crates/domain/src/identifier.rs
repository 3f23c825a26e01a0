use serde::Deserialize;

/// Wire representation accepted for identifiers.
///
/// The REST backend hands out string ids, seed fixtures sometimes carry
/// plain integers.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum IdentifierRepr {
    Text(String),
    Number(i64),
}

impl IdentifierRepr {
    pub(crate) fn into_string(self) -> String {
        match self {
            Self::Text(value) => value,
            Self::Number(value) => value.to_string(),
        }
    }
}

/// Declares an opaque string identifier newtype.
macro_rules! string_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new random identifier.
            #[must_use]
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            /// Wraps an existing identifier value.
            pub fn new(value: impl Into<String>) -> csrd_core::AppResult<Self> {
                let value = value.into();
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(csrd_core::AppError::Validation(format!(
                        "{} must not be empty",
                        stringify!($name)
                    )));
                }

                Ok(Self(trimmed.to_owned()))
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                formatter.write_str(self.0.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = <$crate::identifier::IdentifierRepr as serde::Deserialize>::deserialize(
                    deserializer,
                )?;
                Self::new(raw.into_string()).map_err(<D::Error as serde::de::Error>::custom)
            }
        }
    };
}

pub(crate) use string_identifier;
