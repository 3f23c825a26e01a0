use serde::{Deserialize, Serialize};

use crate::declaration::{Declaration, DeclarationStatus};

/// Dashboard counters derived from a declaration list.
///
/// Drafts are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationStats {
    /// Declarations awaiting validation.
    #[serde(rename = "declarationsAFaire")]
    pub to_review: usize,
    /// Validated declarations.
    #[serde(rename = "declarationsEffectuees")]
    pub validated: usize,
    /// Declarations edited after validation.
    #[serde(rename = "declarationsModifiees")]
    pub modified: usize,
}

impl DeclarationStats {
    /// Counts declarations by status.
    #[must_use]
    pub fn from_declarations(declarations: &[Declaration]) -> Self {
        Self::from_statuses(declarations.iter().map(Declaration::status))
    }

    /// Counts a sequence of statuses.
    #[must_use]
    pub fn from_statuses(statuses: impl IntoIterator<Item = DeclarationStatus>) -> Self {
        statuses
            .into_iter()
            .fold(Self::default(), |mut stats, status| {
                match status {
                    DeclarationStatus::Pending => stats.to_review += 1,
                    DeclarationStatus::Validated => stats.validated += 1,
                    DeclarationStatus::Modified => stats.modified += 1,
                    DeclarationStatus::Draft => {}
                }
                stats
            })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::DeclarationStats;
    use crate::declaration::DeclarationStatus;

    #[test]
    fn counts_each_reviewed_status() {
        let stats = DeclarationStats::from_statuses([
            DeclarationStatus::Pending,
            DeclarationStatus::Pending,
            DeclarationStatus::Validated,
            DeclarationStatus::Modified,
            DeclarationStatus::Draft,
        ]);

        assert_eq!(
            stats,
            DeclarationStats {
                to_review: 2,
                validated: 1,
                modified: 1,
            }
        );
    }

    #[test]
    fn serializes_dashboard_keys() {
        let value = serde_json::to_value(DeclarationStats::default())
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(
            value,
            json!({
                "declarationsAFaire": 0,
                "declarationsEffectuees": 0,
                "declarationsModifiees": 0
            })
        );
    }
}
