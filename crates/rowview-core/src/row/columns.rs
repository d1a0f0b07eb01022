use super::Row;
use crate::{
    data::{Type, Value},
    Result,
};

use std::sync::Arc;

/// A column of the expected row shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Column {
    pub name: String,
    pub ty: Type,
}

/// The ordered shape of the rows a query produces.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Columns {
    columns: Vec<Column>,
    names: Arc<[String]>,
}

impl Columns {
    pub fn new(columns: impl IntoIterator<Item = Column>) -> Self {
        let columns: Vec<Column> = columns.into_iter().collect();
        let names = columns.iter().map(|column| column.name.clone()).collect();
        Self { columns, names }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// Returns the position of the first column with the given name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Column> {
        self.columns.iter()
    }

    /// Column names, shared with every row built by [`Columns::row`].
    pub fn names(&self) -> &Arc<[String]> {
        &self.names
    }

    /// Builds a row of this shape.
    ///
    /// # Panics
    ///
    /// Panics if `values` does not hold one value per column; see
    /// [`try_row`](Self::try_row).
    #[track_caller]
    pub fn row(&self, values: Vec<Value>) -> Row {
        Row::new(self.names.clone(), values)
    }

    /// Builds a row of this shape, failing if `values` does not hold one
    /// value per column.
    pub fn try_row(&self, values: Vec<Value>) -> Result<Row> {
        Row::try_new(self.names.clone(), values)
    }
}

impl<N: Into<String>> FromIterator<(N, Type)> for Columns {
    fn from_iter<T: IntoIterator<Item = (N, Type)>>(iter: T) -> Self {
        Columns::new(iter.into_iter().map(|(name, ty)| Column {
            name: name.into(),
            ty,
        }))
    }
}

impl<'a> IntoIterator for &'a Columns {
    type Item = &'a Column;
    type IntoIter = std::slice::Iter<'a, Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
