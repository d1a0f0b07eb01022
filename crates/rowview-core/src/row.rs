//! Rows as produced by a query, and the sources that yield them.

mod columns;
pub use columns::{Column, Columns};

mod source;
pub use source::{from_iter, from_rows, IterSource, RowSource};

use crate::{data::Value, Result};

use std::sync::Arc;

/// A single result row: an ordered tuple of (column name, raw value) pairs.
///
/// Rows produced by the same query share their column names.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    names: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    /// Creates a row from shared column names and the values in the same order.
    ///
    /// # Panics
    ///
    /// Panics if `names` and `values` differ in length. Use
    /// [`try_new`](Self::try_new) for rows built from untrusted input.
    #[track_caller]
    pub fn new(names: Arc<[String]>, values: Vec<Value>) -> Self {
        match Self::try_new(names, values) {
            Ok(row) => row,
            Err(e) => panic!("{e}"),
        }
    }

    /// Creates a row, failing if `names` and `values` differ in length.
    pub fn try_new(names: Arc<[String]>, values: Vec<Value>) -> Result<Self> {
        if names.len() != values.len() {
            crate::bail!(
                "row has {} column names but {} values",
                names.len(),
                values.len()
            );
        }

        Ok(Self { names, values })
    }

    /// Creates a row from (column name, value) pairs.
    pub fn from_pairs<I, N, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<Value>,
    {
        let (names, values): (Vec<String>, Vec<Value>) = pairs
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .unzip();

        Self {
            names: names.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn names(&self) -> &Arc<[String]> {
        &self.names
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        let index = self.names.iter().position(|n| n == name)?;
        self.values.get(index)
    }

    /// Looks up a column expected at `index`.
    ///
    /// Rows whose shape matches the compiled view resolve in constant time.
    /// If the column at `index` has another name, the column is searched by
    /// name instead.
    pub fn find(&self, index: usize, name: &str) -> Option<&Value> {
        match self.names.get(index) {
            Some(n) if n == name => self.values.get(index),
            _ => self.get_by_name(name),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}
