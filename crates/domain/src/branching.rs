use std::collections::{BTreeMap, HashMap, HashSet};

use csrd_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::field_config::{FieldConfig, FieldId};

/// Colors cycled through to tell sibling branches apart in the builder.
pub const BRANCH_PALETTE: &[&str] = &[
    "#2563eb", "#16a34a", "#d97706", "#db2777", "#7c3aed", "#0891b2",
];

/// Children revealed when one option of a choice field is selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchLink {
    field_id: FieldId,
    option_value: String,
    children: Vec<FieldId>,
}

impl BranchLink {
    /// Returns the parent choice field.
    #[must_use]
    pub fn field_id(&self) -> &FieldId {
        &self.field_id
    }

    /// Returns the option value that reveals the children.
    #[must_use]
    pub fn option_value(&self) -> &str {
        self.option_value.as_str()
    }

    /// Returns the ordered child field ids.
    #[must_use]
    pub fn children(&self) -> &[FieldId] {
        &self.children
    }

    fn is_keyed_by(&self, field_id: &FieldId, option_value: &str) -> bool {
        &self.field_id == field_id && self.option_value == option_value
    }
}

/// Rendering affordance derived for a child field of a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchMarker {
    /// 1-based branch number, in first-seen order across the schema.
    pub branching_number: u32,
    /// Palette color for the branch.
    pub branching_color: &'static str,
}

impl BranchMarker {
    fn for_number(branching_number: u32) -> Self {
        let slot = (branching_number.saturating_sub(1) as usize) % BRANCH_PALETTE.len();
        Self {
            branching_number,
            branching_color: BRANCH_PALETTE[slot],
        }
    }
}

/// Graph from `(parent field, option value)` to ordered child fields.
///
/// Every operation returns a new graph; [`BranchingGraph::validate`] checks
/// the result against the schema fields before it is adopted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BranchingGraph {
    links: Vec<BranchLink>,
}

impl BranchingGraph {
    /// Returns every non-empty branch.
    #[must_use]
    pub fn links(&self) -> &[BranchLink] {
        &self.links
    }

    /// Returns whether no branch exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Returns the children of one branch, empty when the branch does not exist.
    #[must_use]
    pub fn children(&self, field_id: &FieldId, option_value: &str) -> &[FieldId] {
        self.links
            .iter()
            .find(|link| link.is_keyed_by(field_id, option_value))
            .map(BranchLink::children)
            .unwrap_or(&[])
    }

    /// Returns the branches parented by `field_id`.
    pub fn branches_of<'a>(&'a self, field_id: &'a FieldId) -> impl Iterator<Item = &'a BranchLink> {
        self.links
            .iter()
            .filter(move |link| &link.field_id == field_id)
    }

    /// Returns the branch that claims `child` as a child.
    #[must_use]
    pub fn parent_of(&self, child: &FieldId) -> Option<&BranchLink> {
        self.links
            .iter()
            .find(|link| link.children.contains(child))
    }

    /// Returns whether `field_id` is rendered only through a branch.
    #[must_use]
    pub fn is_child(&self, field_id: &FieldId) -> bool {
        self.parent_of(field_id).is_some()
    }

    /// Returns a graph where the branch has exactly `children`.
    ///
    /// An empty child list removes the branch.
    #[must_use]
    pub fn with_link(
        &self,
        field_id: &FieldId,
        option_value: &str,
        children: Vec<FieldId>,
    ) -> Self {
        let mut links = self.links.clone();
        let existing = links
            .iter()
            .position(|link| link.is_keyed_by(field_id, option_value));

        match (existing, children.is_empty()) {
            (Some(index), true) => {
                links.remove(index);
            }
            (Some(index), false) => links[index].children = children,
            (None, true) => {}
            (None, false) => links.push(BranchLink {
                field_id: field_id.clone(),
                option_value: option_value.to_owned(),
                children,
            }),
        }

        Self { links }
    }

    /// Returns a graph with every reference to `field_id` removed.
    ///
    /// The field disappears from every child list and every branch it parents
    /// is dropped. Branches left without children are dropped as well.
    #[must_use]
    pub fn without_field(&self, field_id: &FieldId) -> Self {
        let links = self
            .links
            .iter()
            .filter(|link| &link.field_id != field_id)
            .filter_map(|link| {
                let children: Vec<FieldId> = link
                    .children
                    .iter()
                    .filter(|child| *child != field_id)
                    .cloned()
                    .collect();
                (!children.is_empty()).then(|| BranchLink {
                    children,
                    ..link.clone()
                })
            })
            .collect();

        Self { links }
    }

    /// Returns a graph without the branches `field_id` parents.
    #[must_use]
    pub fn without_branches_of(&self, field_id: &FieldId) -> Self {
        Self {
            links: self
                .links
                .iter()
                .filter(|link| &link.field_id != field_id)
                .cloned()
                .collect(),
        }
    }

    /// Returns a graph keeping only the branches of `field_id` whose option
    /// value is still offered.
    #[must_use]
    pub fn retaining_options(&self, field_id: &FieldId, option_values: &[&str]) -> Self {
        Self {
            links: self
                .links
                .iter()
                .filter(|link| {
                    &link.field_id != field_id || option_values.contains(&link.option_value())
                })
                .cloned()
                .collect(),
        }
    }

    /// Returns a graph where the branch keyed by `old_value` is re-keyed to `new_value`.
    #[must_use]
    pub fn with_renamed_option(&self, field_id: &FieldId, old_value: &str, new_value: &str) -> Self {
        Self {
            links: self
                .links
                .iter()
                .map(|link| {
                    if link.is_keyed_by(field_id, old_value) {
                        BranchLink {
                            option_value: new_value.to_owned(),
                            ..link.clone()
                        }
                    } else {
                        link.clone()
                    }
                })
                .collect(),
        }
    }

    /// Checks the graph against the schema fields.
    ///
    /// Parents must be choice fields offering the option, children must exist,
    /// differ from their parent, belong to a single branch, and the graph must
    /// be acyclic.
    pub fn validate(&self, fields: &[FieldConfig]) -> AppResult<()> {
        let by_id: HashMap<&FieldId, &FieldConfig> =
            fields.iter().map(|field| (field.id(), field)).collect();
        let mut keys = HashSet::new();
        let mut parent_by_child: HashMap<&FieldId, &FieldId> = HashMap::new();

        for link in &self.links {
            if !keys.insert((&link.field_id, link.option_value.as_str())) {
                return Err(AppError::ConfigIntegrity(format!(
                    "branch '{}'/'{}' is declared twice",
                    link.field_id, link.option_value
                )));
            }

            let parent = by_id.get(&link.field_id).ok_or_else(|| {
                AppError::ConfigIntegrity(format!(
                    "branch parent '{}' does not exist in the schema",
                    link.field_id
                ))
            })?;
            if !parent.field_type().is_choice() {
                return Err(AppError::ConfigIntegrity(format!(
                    "field '{}' of type '{}' cannot branch",
                    parent.name(),
                    parent.field_type().as_str()
                )));
            }
            if !parent
                .options()
                .iter()
                .any(|option| option.value() == link.option_value)
            {
                return Err(AppError::ConfigIntegrity(format!(
                    "field '{}' has no option '{}'",
                    parent.name(),
                    link.option_value
                )));
            }
            if link.children.is_empty() {
                return Err(AppError::ConfigIntegrity(format!(
                    "branch '{}'/'{}' has no children",
                    parent.name(),
                    link.option_value
                )));
            }

            for child in &link.children {
                if !by_id.contains_key(child) {
                    return Err(AppError::ConfigIntegrity(format!(
                        "branch child '{child}' does not exist in the schema"
                    )));
                }
                if child == &link.field_id {
                    return Err(AppError::ConfigIntegrity(format!(
                        "field '{}' cannot be its own branch child",
                        parent.name()
                    )));
                }
                if parent_by_child.insert(child, &link.field_id).is_some() {
                    return Err(AppError::ConfigIntegrity(format!(
                        "field '{child}' is claimed by more than one branch"
                    )));
                }
            }
        }

        for start in parent_by_child.keys() {
            let mut visited = HashSet::from([*start]);
            let mut current = *start;
            while let Some(parent) = parent_by_child.get(current) {
                if !visited.insert(*parent) {
                    return Err(AppError::ConfigIntegrity(format!(
                        "field '{start}' is its own ancestor"
                    )));
                }
                current = *parent;
            }
        }

        Ok(())
    }

    /// Derives branch markers for every child field.
    ///
    /// Branches are numbered in first-seen order: parents in schema order,
    /// then options in option order.
    #[must_use]
    pub fn markers(&self, fields: &[FieldConfig]) -> BTreeMap<FieldId, BranchMarker> {
        let mut markers = BTreeMap::new();
        let mut next_number = 0_u32;

        for field in fields {
            for option in field.options() {
                let children = self.children(field.id(), option.value());
                if children.is_empty() {
                    continue;
                }

                next_number = next_number.saturating_add(1);
                let marker = BranchMarker::for_number(next_number);
                for child in children {
                    markers.insert(child.clone(), marker);
                }
            }
        }

        markers
    }
}
