use super::Row;
use crate::Result;

/// A pull-based producer of rows, typically a database cursor.
///
/// `Ok(None)` signals end-of-data; `Err` signals a failure reading the next
/// row. Implementations are free to block while fetching.
pub trait RowSource {
    fn next_row(&mut self) -> Result<Option<Row>>;

    /// Bounds on the number of remaining rows, as for [`Iterator::size_hint`].
    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, None)
    }
}

impl<S: RowSource + ?Sized> RowSource for &mut S {
    fn next_row(&mut self) -> Result<Option<Row>> {
        (**self).next_row()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (**self).size_hint()
    }
}

impl<S: RowSource + ?Sized> RowSource for Box<S> {
    fn next_row(&mut self) -> Result<Option<Row>> {
        (**self).next_row()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (**self).size_hint()
    }
}

/// Row source backed by an iterator of fallible rows.
#[derive(Debug)]
pub struct IterSource<I> {
    iter: I,
}

/// Adapts an iterator of `Result<Row>` into a [`RowSource`].
pub fn from_iter<I>(iter: I) -> IterSource<I::IntoIter>
where
    I: IntoIterator<Item = Result<Row>>,
{
    IterSource {
        iter: iter.into_iter(),
    }
}

/// Adapts an iterator of rows that cannot fail into a [`RowSource`].
pub fn from_rows<I>(rows: I) -> IterSource<std::iter::Map<I::IntoIter, fn(Row) -> Result<Row>>>
where
    I: IntoIterator<Item = Row>,
{
    from_iter(rows.into_iter().map(Ok as fn(Row) -> Result<Row>))
}

impl<I> RowSource for IterSource<I>
where
    I: Iterator<Item = Result<Row>>,
{
    fn next_row(&mut self) -> Result<Option<Row>> {
        self.iter.next().transpose()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}
