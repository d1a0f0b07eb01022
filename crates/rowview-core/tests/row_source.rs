use rowview_core::{
    data::{Type, Value},
    err,
    row::{self, Columns},
    Row, RowSource,
};
use std_util::prelude::*;

fn columns() -> Columns {
    [("name", Type::String), ("age", Type::I64)].into_iter().collect()
}

// ---------------------------------------------------------------------------
// Columns
// ---------------------------------------------------------------------------

#[test]
fn columns_share_names_with_rows() {
    let columns = columns();
    let a = columns.row(vec![Value::from("Ann"), Value::I64(30)]);
    let b = columns.row(vec![Value::from("Bo"), Value::Null]);

    assert!(std::sync::Arc::ptr_eq(a.names(), b.names()));
    assert_eq!(a.get_by_name("age"), Some(&Value::I64(30)));
    assert_eq!(b.get(1), Some(&Value::Null));
}

#[test]
fn try_row_checks_width() {
    let columns = columns();

    let err = assert_err!(columns.try_row(vec![Value::from("Ann")]));
    assert_eq!(err.to_string(), "row has 2 column names but 1 values");

    let row = assert_ok!(columns.try_row(vec![Value::from("Ann"), Value::I64(30)]));
    assert!(std::sync::Arc::ptr_eq(row.names(), columns.names()));
}

#[test]
#[should_panic(expected = "row has 2 column names but 3 values")]
fn row_panics_on_width_mismatch() {
    columns().row(vec![Value::Null, Value::Null, Value::Null]);
}

#[test]
fn index_of_returns_first_match() {
    let columns: Columns = [("id", Type::I64), ("name", Type::String), ("id", Type::I64)]
        .into_iter()
        .collect();

    assert_eq!(columns.index_of("id"), Some(0));
    assert_eq!(columns.index_of("name"), Some(1));
    assert_eq!(columns.index_of("email"), None);
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

#[test]
fn from_rows_yields_in_order_then_ends() {
    let columns = columns();
    let mut source = row::from_rows(vec![
        columns.row(vec![Value::from("Ann"), Value::I64(30)]),
        columns.row(vec![Value::from("Bo"), Value::I64(41)]),
    ]);

    assert_eq!(source.size_hint(), (2, Some(2)));

    let first = assert_ok!(source.next_row()).unwrap();
    assert_eq!(first.get_by_name("name"), Some(&Value::from("Ann")));

    let second = assert_ok!(source.next_row()).unwrap();
    assert_eq!(second.get_by_name("name"), Some(&Value::from("Bo")));

    assert!(assert_ok!(source.next_row()).is_none());
}

#[test]
fn from_iter_surfaces_failures() {
    let mut source = row::from_iter(vec![
        Ok(Row::from_pairs([("name", "Ann")])),
        Err(rowview_core::Error::row_source(std::io::Error::other("connection reset"))),
    ]);

    assert_ok!(source.next_row());

    let err = assert_err!(source.next_row());
    assert!(err.is_row_source());
    assert_eq!(err.to_string(), "row source failed: connection reset");
}

#[test]
fn boxed_and_borrowed_sources() {
    fn drain(mut source: impl RowSource) -> usize {
        let mut n = 0;
        while let Ok(Some(_)) = source.next_row() {
            n += 1;
        }
        n
    }

    let rows = || {
        row::from_iter(vec![
            Ok(Row::from_pairs([("n", 1_i64)])),
            Ok(Row::from_pairs([("n", 2_i64)])),
        ])
    };

    let mut borrowed = rows();
    assert_eq!(drain(&mut borrowed), 2);

    let boxed: Box<dyn RowSource> = Box::new(rows());
    assert_eq!(drain(boxed), 2);

    let failing = row::from_iter(vec![Err(err!("boom"))]);
    assert_eq!(drain(failing), 0);
}
