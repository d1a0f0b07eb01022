use super::plan::{ColumnNode, Node, ObjectNode, Step};
use crate::{
    data::{Type, Value, ValueObject},
    err,
    transformer::Func,
    Error, Result, Row,
};

type Convert = Box<dyn Fn(Value) -> Result<Value> + Send + Sync>;

pub(super) fn apply(root: ObjectNode) -> Func {
    lower_object(root)
}

fn lower(node: Node) -> Func {
    match node {
        Node::Column(node) => lower_column(node),
        Node::Object(node) => lower_object(node),
    }
}

fn lower_object(node: ObjectNode) -> Func {
    let columns = if node.nullable { node.columns() } else { vec![] };

    let fields: Vec<(String, Func)> = node
        .fields
        .into_iter()
        .map(|(name, field)| (name, lower(field)))
        .collect();

    let build = move |row: &Row| -> Result<Value> {
        let mut object = ValueObject::with_capacity(fields.len());

        for (name, field) in &fields {
            object.insert(name.clone(), field(row)?);
        }

        Ok(Value::Object(object))
    };

    if columns.is_empty() {
        return Box::new(build);
    }

    // An absent nested model shows up as a row where all of its columns are null.
    Box::new(move |row: &Row| {
        let absent = columns
            .iter()
            .all(|(index, column)| matches!(row.find(*index, column), Some(Value::Null)));

        if absent {
            Ok(Value::Null)
        } else {
            build(row)
        }
    })
}

fn lower_column(node: ColumnNode) -> Func {
    let ColumnNode {
        field,
        column,
        index,
        from,
        to,
        step,
        nullable,
    } = node;

    let convert: Convert = match step {
        Step::Identity => Box::new(|value: Value| -> Result<Value> { Ok(value) }),
        Step::Widen => Box::new(move |value: Value| to.cast(value)),
        Step::Parse => Box::new(move |value: Value| to.parse(value)),
        Step::Narrow => Box::new(move |value: Value| to.narrow(value)),
        Step::Format => Box::new(Type::format),
        Step::Function(function) => Box::new(move |value: Value| function.call(value)),
    };

    Box::new(move |row: &Row| {
        let Some(value) = row.find(index, &column) else {
            return Err(err!("column `{column}` is missing from the row")
                .context(err!("field `{field}`")));
        };

        if !value.is_a(&from) {
            return Err(Error::type_conversion_because(
                value.clone(),
                from.clone(),
                format!("column `{column}` does not match its declared type"),
            )
            .context(err!("field `{field}`")));
        }

        let value = convert(value.clone()).map_err(|e| e.context(err!("field `{field}`")))?;

        if value.is_null() && !nullable {
            return Err(Error::unexpected_null(field.as_str()));
        }

        Ok(value)
    })
}
