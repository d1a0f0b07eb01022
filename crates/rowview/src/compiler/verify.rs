use super::plan::{ColumnNode, Node, ObjectNode};
use crate::{data::Type, Columns, Error, Result};

use std::collections::HashSet;

/// Checks a finished plan against the row shape before it is lowered.
///
/// The planner already reports every problem a caller can cause; a failure
/// here means the plan itself is inconsistent.
pub(super) fn apply(root: &ObjectNode, columns: &Columns) -> Result<()> {
    match &root.model {
        Some(_) if root.path.is_empty() => {}
        _ => {
            return Err(Error::transformer_rejected(
                "root of the plan does not instantiate a model",
            ))
        }
    }

    verify_object(root, columns)
}

fn verify_object(node: &ObjectNode, columns: &Columns) -> Result<()> {
    let mut seen = HashSet::new();

    for (name, field) in &node.fields {
        if name.is_empty() {
            let at = if node.path.is_empty() {
                "the root object"
            } else {
                node.path.as_str()
            };
            return Err(Error::transformer_rejected(format!("empty field name in {at}")));
        }

        if !seen.insert(name.as_str()) {
            return Err(Error::duplicate_path(name.as_str()));
        }

        match field {
            Node::Column(column) => verify_column(column, columns)?,
            Node::Object(object) => verify_object(object, columns)?,
        }
    }

    Ok(())
}

fn verify_column(node: &ColumnNode, columns: &Columns) -> Result<()> {
    let Some(column) = columns.get(node.index) else {
        return Err(Error::transformer_rejected(format!(
            "field `{}` reads column {} but rows have {} columns",
            node.field,
            node.index,
            columns.len()
        )));
    };

    if column.name != node.column || column.ty != node.from {
        return Err(Error::transformer_rejected(format!(
            "field `{}` expects column `{}` of type {} at position {}",
            node.field, node.column, node.from, node.index
        )));
    }

    // Duplicate column names would make name-based lookup pick the first.
    if columns.iter().filter(|c| c.name == node.column).count() > 1 {
        return Err(Error::transformer_rejected(format!(
            "column `{}` appears more than once in the row shape",
            node.column
        )));
    }

    if matches!(node.to, Type::Object(_)) || !node.step.accepts(&node.from, &node.to) {
        return Err(Error::transformer_rejected(format!(
            "field `{}` has no valid conversion from {} to {}",
            node.field, node.from, node.to
        )));
    }

    Ok(())
}
