use super::Value;

use indexmap::IndexMap;
use serde::Serialize;

/// Named output fields.
///
/// Fields keep their insertion order for display and serialization, but
/// equality compares the fields as a map: two objects holding the same
/// fields in a different order are equal.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValueObject {
    fields: IndexMap<String, Value>,
}

impl ValueObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: IndexMap::with_capacity(capacity),
        }
    }

    /// Sets a field, returning the previous value if it was already present.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Follows a dot separated path through nested objects.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut value = self.fields.get(segments.next()?)?;

        for segment in segments {
            value = value.as_object()?.get(segment)?;
        }

        Some(value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.fields.iter()
    }
}

impl FromIterator<(String, Value)> for ValueObject {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ValueObject {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValueObject {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_field_order() {
        let mut a = ValueObject::new();
        a.insert("x", 1_i64);
        a.insert("y", 2_i64);

        let mut b = ValueObject::new();
        b.insert("y", 2_i64);
        b.insert("x", 1_i64);

        assert_eq!(a, b);
    }

    #[test]
    fn nested_path_lookup() {
        let mut address = ValueObject::new();
        address.insert("city", "Oslo");

        let mut user = ValueObject::new();
        user.insert("address", address);

        assert_eq!(user.get_path("address.city"), Some(&Value::from("Oslo")));
        assert_eq!(user.get_path("address.zip"), None);
        assert_eq!(user.get_path("name"), None);
    }
}
