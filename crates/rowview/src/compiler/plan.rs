use super::Function;
use crate::{
    data::Type,
    descriptor::{ColumnRef, Conversion, Source},
    signature::Canonical,
    Error, Result,
};

use indexmap::IndexMap;
use std::sync::Arc;

/// A field of the output, before lowering.
#[derive(Debug)]
pub(super) enum Node {
    Column(ColumnNode),
    Object(ObjectNode),
}

/// Reads one column and converts it into the field type.
#[derive(Debug)]
pub(super) struct ColumnNode {
    /// Path of the field from the root of the view
    pub(super) field: String,
    pub(super) column: String,
    /// Position of `column` in the row shape
    pub(super) index: usize,
    pub(super) from: Type,
    pub(super) to: Type,
    pub(super) step: Step,
    pub(super) nullable: bool,
}

/// Builds an object from its fields.
#[derive(Debug)]
pub(super) struct ObjectNode {
    /// Path of the object from the root of the view, empty for the root
    pub(super) path: String,
    /// The model this object instantiates; `None` for objects implied by dotted paths
    pub(super) model: Option<String>,
    pub(super) fields: Vec<(String, Node)>,
    /// Null instead of an object when every column under it is null
    pub(super) nullable: bool,
}

impl ObjectNode {
    /// Columns read anywhere under this object, as `(index, name)`.
    pub(super) fn columns(&self) -> Vec<(usize, String)> {
        let mut columns = vec![];
        self.collect_columns(&mut columns);
        columns
    }

    fn collect_columns(&self, columns: &mut Vec<(usize, String)>) {
        for (_, field) in &self.fields {
            match field {
                Node::Column(column) => columns.push((column.index, column.column.clone())),
                Node::Object(object) => object.collect_columns(columns),
            }
        }
    }
}

#[derive(Debug, Clone)]
pub(super) enum Step {
    Identity,
    Widen,
    Parse,
    Narrow,
    Format,
    Function(Arc<Function>),
}

impl Step {
    fn resolve(
        field: &str,
        column: &ColumnRef,
        from: &Type,
        functions: &IndexMap<String, Arc<Function>>,
    ) -> Result<Step> {
        let to = &column.ty;

        let step = match &column.conversion {
            None if from == to => Step::Identity,
            None if from.widens_to(to) => Step::Widen,
            None => return Err(Error::type_mismatch(field, from.clone(), to.clone())),
            Some(Conversion::Parse) => Step::Parse,
            Some(Conversion::Narrow) => Step::Narrow,
            Some(Conversion::Format) => Step::Format,
            Some(Conversion::Function(name)) => match functions.get(name) {
                Some(function) => Step::Function(function.clone()),
                None => return Err(Error::unknown_function(field, name.as_str())),
            },
        };

        if step.accepts(from, to) {
            Ok(step)
        } else {
            let conversion = column
                .conversion
                .as_ref()
                .map(Conversion::name)
                .unwrap_or("none");
            Err(Error::invalid_conversion(field, conversion, from.clone(), to.clone()))
        }
    }

    pub(super) fn accepts(&self, from: &Type, to: &Type) -> bool {
        match self {
            Step::Identity => from == to,
            Step::Widen => from.widens_to(to),
            Step::Parse => from.is_string() && to.is_parse_target(),
            Step::Narrow => from.narrows_to(to),
            Step::Format => from.is_formattable() && to.is_string(),
            Step::Function(function) => function.accepts(from, to),
        }
    }
}

pub(super) fn build(
    canonical: &Canonical,
    functions: &IndexMap<String, Arc<Function>>,
) -> Result<ObjectNode> {
    let mut planner = Planner {
        canonical,
        functions,
        stack: vec![],
    };

    planner.model(&canonical.root, "", "(root)")
}

struct Planner<'a> {
    canonical: &'a Canonical,
    functions: &'a IndexMap<String, Arc<Function>>,
    /// Models currently being planned, outermost first
    stack: Vec<&'a str>,
}

impl<'a> Planner<'a> {
    fn model(&mut self, name: &'a str, prefix: &str, referenced_by: &str) -> Result<ObjectNode> {
        let canonical = self.canonical;

        let Some(model) = canonical.models.get(name) else {
            return Err(Error::unknown_model(referenced_by, name));
        };

        if let Some(pos) = self.stack.iter().position(|open| *open == name) {
            let mut cycle: Vec<String> = self.stack[pos..].iter().map(|m| m.to_string()).collect();
            cycle.push(name.to_string());
            return Err(Error::view_cycle(cycle));
        }

        self.stack.push(name);

        let mut fields = Fields::default();

        for binding in &model.bindings {
            let path = binding.path.under(prefix);

            let node = match &binding.source {
                Source::Column(column) => Node::Column(self.column(column, &path, binding.nullable)?),
                Source::Nested(nested) => {
                    let mut object = self.model(nested, &path, &path)?;
                    object.nullable = binding.nullable;
                    Node::Object(object)
                }
            };

            fields.insert(binding.path.segments(), node, &path)?;
        }

        self.stack.pop();

        Ok(fields.into_object(prefix.to_string(), Some(name.to_string())))
    }

    fn column(&self, column: &ColumnRef, field: &str, nullable: bool) -> Result<ColumnNode> {
        let columns = &self.canonical.columns;

        let Some(index) = columns.index_of(&column.column) else {
            return Err(Error::missing_column(field, &column.column));
        };

        // `index_of` returned a valid position.
        let from = columns.get(index).map(|c| c.ty.clone()).unwrap_or(Type::String);

        Ok(ColumnNode {
            field: field.to_string(),
            column: column.column.clone(),
            index,
            step: Step::resolve(field, column, &from, self.functions)?,
            from,
            to: column.ty.clone(),
            nullable,
        })
    }
}

/// Output fields of one object, grouped by path segment.
#[derive(Default)]
struct Fields {
    entries: IndexMap<String, Entry>,
}

enum Entry {
    Leaf(Node),
    Branch(Fields),
}

impl Fields {
    fn insert(&mut self, segments: &[String], node: Node, path: &str) -> Result<()> {
        let Some((first, rest)) = segments.split_first() else {
            return Err(Error::transformer_rejected("binding has an empty output path"));
        };

        if rest.is_empty() {
            if self.entries.contains_key(first) {
                return Err(Error::duplicate_path(path));
            }

            self.entries.insert(first.clone(), Entry::Leaf(node));
            return Ok(());
        }

        match self
            .entries
            .entry(first.clone())
            .or_insert_with(|| Entry::Branch(Fields::default()))
        {
            Entry::Branch(fields) => fields.insert(rest, node, path),
            Entry::Leaf(_) => Err(Error::duplicate_path(path)),
        }
    }

    fn into_object(self, path: String, model: Option<String>) -> ObjectNode {
        let fields = self
            .entries
            .into_iter()
            .map(|(name, entry)| {
                let node = match entry {
                    Entry::Leaf(node) => node,
                    Entry::Branch(fields) => {
                        let path = if path.is_empty() {
                            name.clone()
                        } else {
                            format!("{path}.{name}")
                        };
                        Node::Object(fields.into_object(path, None))
                    }
                };
                (name, node)
            })
            .collect();

        ObjectNode {
            path,
            model,
            fields,
            nullable: false,
        }
    }
}
