use crate::field_config::FieldConfig;
use crate::schema::FormSchema;
use crate::validation::{Answers, answer_includes};

/// Lazy iterator over the fields to render for a set of answers.
///
/// Top-level fields come in schema order. Right after a field, the children
/// of each branch selected by its current answer follow, in option order and
/// then child order, resolved recursively.
#[derive(Debug, Clone)]
pub struct VisibleFields<'a> {
    schema: &'a FormSchema,
    answers: &'a Answers,
    pending: Vec<&'a FieldConfig>,
}

impl<'a> VisibleFields<'a> {
    pub(crate) fn new(schema: &'a FormSchema, answers: &'a Answers) -> Self {
        let branching = schema.branching();
        let pending = schema
            .fields()
            .iter()
            .rev()
            .filter(|field| !branching.is_child(field.id()))
            .collect();

        Self {
            schema,
            answers,
            pending,
        }
    }

    fn revealed_children(&self, field: &'a FieldConfig) -> Vec<&'a FieldConfig> {
        let Some(answer) = self.answers.get(field.name().as_str()) else {
            return Vec::new();
        };

        let schema = self.schema;
        let branching = schema.branching();
        field
            .options()
            .iter()
            .filter(|option| answer_includes(answer, option.value()))
            .flat_map(|option| branching.children(field.id(), option.value()))
            .filter_map(|child_id| schema.field(child_id))
            .collect()
    }
}

impl<'a> Iterator for VisibleFields<'a> {
    type Item = &'a FieldConfig;

    fn next(&mut self) -> Option<Self::Item> {
        let field = self.pending.pop()?;
        let children = self.revealed_children(field);
        self.pending.extend(children.into_iter().rev());
        Some(field)
    }
}
