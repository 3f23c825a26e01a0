use std::collections::HashMap;

use chrono::{DateTime, Utc};
use csrd_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::category::CategoryCode;
use crate::identifier::string_identifier;
use crate::schema::FormSchema;

string_identifier!(
    /// Identifier of a form template.
    TemplateId
);

/// Editable content of a form template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormTemplateInput {
    /// Display name.
    pub name: NonEmptyString,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Disclosure category.
    #[serde(default)]
    pub category_code: CategoryCode,
    /// Field schema.
    #[serde(default)]
    pub schema: FormSchema,
}

/// Publication state of a saved template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateState {
    /// Editable in place.
    Draft,
    /// Frozen; edits derive a new version.
    Published {
        /// Published version number.
        version: u32,
    },
}

/// Named, versioned and publishable form schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormTemplate {
    id: TemplateId,
    name: NonEmptyString,
    #[serde(default)]
    description: String,
    #[serde(default)]
    category_code: CategoryCode,
    #[serde(default)]
    schema: FormSchema,
    #[serde(default = "first_version")]
    version: u32,
    #[serde(default)]
    is_published: bool,
    #[serde(default)]
    published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    parent_template_id: Option<TemplateId>,
    #[serde(default = "active_by_default")]
    is_active: bool,
    #[serde(default = "Utc::now")]
    created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    updated_at: DateTime<Utc>,
}

fn first_version() -> u32 {
    1
}

fn active_by_default() -> bool {
    true
}

impl FormTemplate {
    /// Creates a first-version draft from builder content.
    #[must_use]
    pub fn new_draft(input: FormTemplateInput) -> Self {
        let now = Utc::now();
        Self {
            id: TemplateId::generate(),
            name: input.name,
            description: input.description,
            category_code: input.category_code,
            schema: input.schema,
            version: first_version(),
            is_published: false,
            published_at: None,
            parent_template_id: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the template identifier.
    #[must_use]
    pub fn id(&self) -> &TemplateId {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns the disclosure category.
    #[must_use]
    pub fn category_code(&self) -> &CategoryCode {
        &self.category_code
    }

    /// Returns the owned schema.
    #[must_use]
    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    /// Returns the version number, starting at 1.
    #[must_use]
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Returns whether the template is published.
    #[must_use]
    pub fn is_published(&self) -> bool {
        self.is_published
    }

    /// Returns when the template was published.
    #[must_use]
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }

    /// Returns the published template this draft was derived from.
    #[must_use]
    pub fn parent_template_id(&self) -> Option<&TemplateId> {
        self.parent_template_id.as_ref()
    }

    /// Returns whether the template is offered for new declarations.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the publication state.
    #[must_use]
    pub fn state(&self) -> TemplateState {
        if self.is_published {
            TemplateState::Published {
                version: self.version,
            }
        } else {
            TemplateState::Draft
        }
    }

    /// Returns the builder content of this template.
    #[must_use]
    pub fn to_input(&self) -> FormTemplateInput {
        FormTemplateInput {
            name: self.name.clone(),
            description: self.description.clone(),
            category_code: self.category_code.clone(),
            schema: self.schema.clone(),
        }
    }

    /// Overwrites the content of a draft.
    pub fn update_draft(&mut self, input: FormTemplateInput) -> AppResult<()> {
        if self.is_published {
            return Err(AppError::Conflict(format!(
                "template '{}' is published; derive a new version to edit it",
                self.id
            )));
        }

        self.name = input.name;
        self.description = input.description;
        self.category_code = input.category_code;
        self.schema = input.schema;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Publishes a draft.
    pub fn publish(&mut self) -> AppResult<()> {
        if self.is_published {
            return Err(AppError::Conflict(format!(
                "template '{}' is already published",
                self.id
            )));
        }

        let now = Utc::now();
        self.is_published = true;
        self.published_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Plans how builder content is saved onto this template.
    ///
    /// Drafts are updated in place. For a published template the pending
    /// draft derived from it is updated, or a new draft is derived with the
    /// next version of the lineage. Editing a superseded version, or a
    /// version other than the parent of the pending draft, conflicts.
    pub fn revise(
        &self,
        input: FormTemplateInput,
        lineage: &TemplateLineage<'_>,
    ) -> AppResult<TemplateRevision> {
        if !self.is_published {
            let mut updated = self.clone();
            updated.update_draft(input)?;
            return Ok(TemplateRevision::Updated(updated));
        }

        if let Some(pending) = lineage.pending_draft() {
            if pending.parent_template_id() != Some(&self.id) {
                return Err(AppError::Conflict(format!(
                    "template '{}' already has pending draft '{}' derived from '{}'",
                    self.id,
                    pending.id(),
                    pending.parent_template_id().map_or("", TemplateId::as_str)
                )));
            }

            let mut updated = pending.clone();
            updated.update_draft(input)?;
            return Ok(TemplateRevision::Updated(updated));
        }

        let latest = lineage.latest_version().max(self.version);
        if latest > self.version {
            return Err(AppError::Conflict(format!(
                "template '{}' version {} is superseded by version {latest}",
                self.id, self.version
            )));
        }

        Ok(TemplateRevision::Derived(
            self.derive_draft(input, latest.saturating_add(1)),
        ))
    }

    fn derive_draft(&self, input: FormTemplateInput, version: u32) -> Self {
        let mut draft = Self::new_draft(input);
        draft.version = version;
        draft.parent_template_id = Some(self.id.clone());
        draft.is_active = self.is_active;
        draft
    }

    /// Offers or withdraws the template for new declarations.
    pub fn set_active(&mut self, is_active: bool) {
        if self.is_active != is_active {
            self.is_active = is_active;
            self.updated_at = Utc::now();
        }
    }
}

/// Outcome of saving builder content onto a template.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateRevision {
    /// An existing draft was overwritten.
    Updated(FormTemplate),
    /// A new draft version was derived and must be stored.
    Derived(FormTemplate),
}

/// Templates descending from the same first version through parent links.
#[derive(Debug, Clone)]
pub struct TemplateLineage<'a> {
    members: Vec<&'a FormTemplate>,
}

impl<'a> TemplateLineage<'a> {
    /// Collects the templates of `templates` sharing the root of `template`.
    #[must_use]
    pub fn of(template: &FormTemplate, templates: &'a [FormTemplate]) -> Self {
        let by_id: HashMap<&TemplateId, &FormTemplate> = templates
            .iter()
            .map(|candidate| (candidate.id(), candidate))
            .collect();
        let root = lineage_root(template, &by_id);
        let members = templates
            .iter()
            .filter(|candidate| lineage_root(candidate, &by_id) == root)
            .collect();

        Self { members }
    }

    /// Returns the highest version in the lineage, 1 when it is empty.
    #[must_use]
    pub fn latest_version(&self) -> u32 {
        self.members
            .iter()
            .map(|member| member.version())
            .max()
            .unwrap_or_else(first_version)
    }

    /// Returns the derived draft awaiting publication.
    #[must_use]
    pub fn pending_draft(&self) -> Option<&'a FormTemplate> {
        self.members
            .iter()
            .copied()
            .find(|member| !member.is_published() && member.parent_template_id().is_some())
    }

    /// Returns the members in storage order.
    #[must_use]
    pub fn members(&self) -> &[&'a FormTemplate] {
        &self.members
    }
}

/// Follows parent links up to the first version. A deleted ancestor ends
/// the walk at its identifier so its descendants stay grouped.
fn lineage_root<'t>(
    template: &'t FormTemplate,
    by_id: &HashMap<&'t TemplateId, &'t FormTemplate>,
) -> &'t TemplateId {
    let mut current = template;
    for _ in 0..=by_id.len() {
        let Some(parent_id) = current.parent_template_id() else {
            return current.id();
        };
        match by_id.get(parent_id) {
            Some(parent) => current = *parent,
            None => return parent_id,
        }
    }

    current.id()
}

#[cfg(test)]
mod tests {
    use csrd_core::{AppError, NonEmptyString};
    use serde_json::json;

    use super::{
        FormTemplate, FormTemplateInput, TemplateLineage, TemplateRevision, TemplateState,
    };
    use crate::category::{CategoryCode, DEFAULT_CATEGORY_CODE};
    use crate::schema::FormSchema;

    fn input(name: &str) -> FormTemplateInput {
        FormTemplateInput {
            name: NonEmptyString::new(name).unwrap_or_else(|_| unreachable!()),
            description: String::new(),
            category_code: CategoryCode::default(),
            schema: FormSchema::new(),
        }
    }

    #[test]
    fn publishing_twice_conflicts() {
        let mut template = FormTemplate::new_draft(input("Pollution"));
        assert!(template.publish().is_ok());
        assert!(template.published_at().is_some());
        assert!(matches!(template.publish(), Err(AppError::Conflict(_))));
    }

    #[test]
    fn published_template_cannot_be_edited_in_place() {
        let mut template = FormTemplate::new_draft(input("Pollution"));
        assert!(template.publish().is_ok());
        let result = template.update_draft(input("Renamed"));
        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(template.name().as_str(), "Pollution");
    }

    fn published(name: &str) -> FormTemplate {
        let mut template = FormTemplate::new_draft(input(name));
        assert!(template.publish().is_ok());
        template
    }

    fn derived(revision: TemplateRevision) -> FormTemplate {
        match revision {
            TemplateRevision::Derived(template) => template,
            TemplateRevision::Updated(_) => unreachable!(),
        }
    }

    #[test]
    fn revising_a_published_template_derives_next_version() {
        let template = published("Pollution");
        let templates = vec![template.clone()];
        let lineage = TemplateLineage::of(&template, &templates);

        let draft = derived(
            template
                .revise(input("Pollution v2"), &lineage)
                .unwrap_or_else(|_| unreachable!()),
        );

        assert_ne!(draft.id(), template.id());
        assert_eq!(draft.version(), 2);
        assert_eq!(draft.parent_template_id(), Some(template.id()));
        assert_eq!(draft.state(), TemplateState::Draft);
        assert_eq!(template.state(), TemplateState::Published { version: 1 });
    }

    #[test]
    fn revising_a_draft_keeps_its_identity() {
        let template = FormTemplate::new_draft(input("Pollution"));
        let templates = vec![template.clone()];
        let revision = template
            .revise(input("Eau"), &TemplateLineage::of(&template, &templates))
            .unwrap_or_else(|_| unreachable!());

        let TemplateRevision::Updated(revised) = revision else {
            unreachable!();
        };
        assert_eq!(revised.id(), template.id());
        assert_eq!(revised.version(), 1);
        assert_eq!(revised.name().as_str(), "Eau");
    }

    #[test]
    fn pending_draft_is_reused_for_its_parent() {
        let first = published("Pollution");
        let draft = derived(
            first
                .revise(input("v2"), &TemplateLineage::of(&first, &[first.clone()]))
                .unwrap_or_else(|_| unreachable!()),
        );
        let templates = vec![first.clone(), draft.clone()];

        let revision = first
            .revise(input("v2 bis"), &TemplateLineage::of(&first, &templates))
            .unwrap_or_else(|_| unreachable!());

        let TemplateRevision::Updated(updated) = revision else {
            unreachable!();
        };
        assert_eq!(updated.id(), draft.id());
        assert_eq!(updated.version(), 2);
        assert_eq!(updated.name().as_str(), "v2 bis");
    }

    #[test]
    fn superseded_version_cannot_be_revised() {
        let first = published("Pollution");
        let mut second = derived(
            first
                .revise(input("v2"), &TemplateLineage::of(&first, &[first.clone()]))
                .unwrap_or_else(|_| unreachable!()),
        );
        assert!(second.publish().is_ok());
        let templates = vec![first.clone(), second.clone()];

        let from_first = first.revise(input("fork"), &TemplateLineage::of(&first, &templates));
        let from_second = derived(
            second
                .revise(input("v3"), &TemplateLineage::of(&second, &templates))
                .unwrap_or_else(|_| unreachable!()),
        );

        assert!(matches!(from_first, Err(AppError::Conflict(_))));
        assert_eq!(from_second.version(), 3);
    }

    #[test]
    fn lineage_groups_descendants_of_deleted_ancestor() {
        let first = published("Pollution");
        let mut second = derived(
            first
                .revise(input("v2"), &TemplateLineage::of(&first, &[first.clone()]))
                .unwrap_or_else(|_| unreachable!()),
        );
        assert!(second.publish().is_ok());
        let chain = vec![first.clone(), second.clone()];
        let third = derived(
            second
                .revise(input("v3"), &TemplateLineage::of(&second, &chain))
                .unwrap_or_else(|_| unreachable!()),
        );
        let unrelated = published("Eau");
        let templates = vec![second.clone(), third.clone(), unrelated];

        let lineage = TemplateLineage::of(&second, &templates);

        assert_eq!(lineage.members().len(), 2);
        assert_eq!(lineage.latest_version(), 3);
        assert_eq!(lineage.pending_draft().map(FormTemplate::id), Some(third.id()));
    }

    #[test]
    fn deserializes_minimal_fixture_record() {
        let template: FormTemplate = serde_json::from_value(json!({
            "id": 3,
            "name": "Rejets",
            "schema": [{"id": "f1", "name": "volume", "label": "Volume", "type": "number"}]
        }))
        .unwrap_or_else(|_| unreachable!());

        assert_eq!(template.id().as_str(), "3");
        assert_eq!(template.category_code().as_str(), DEFAULT_CATEGORY_CODE);
        assert_eq!(template.version(), 1);
        assert!(template.is_active());
        assert_eq!(template.schema().len(), 1);
    }
}
