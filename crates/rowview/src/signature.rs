use crate::{descriptor::Model, Columns};

use indexmap::IndexMap;
use std::{
    collections::{BTreeMap, VecDeque},
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};
use xxhash_rust::xxh3::Xxh3;

/// Canonical identity of a view.
///
/// Structurally identical views have equal signatures regardless of the
/// order their bindings or models were declared in. The signature holds the
/// full canonical form next to its 64-bit hash: hashing uses only the hash,
/// while equality falls back to comparing canonical forms, so two views
/// whose hashes collide are still told apart.
#[derive(Clone)]
pub struct Signature {
    hash: u64,
    canonical: Arc<Canonical>,
}

/// Order-independent structural form of a view.
///
/// Only models reachable from the root participate. Models are ordered by
/// name and bindings by output path; the row shape keeps its order because
/// the compiler resolves column positions from it.
#[derive(Debug, PartialEq, Eq, Hash)]
pub(crate) struct Canonical {
    pub(crate) root: String,
    pub(crate) columns: Columns,
    pub(crate) models: BTreeMap<String, Model>,
}

pub(crate) fn compute(root: &str, columns: &Columns, models: &IndexMap<String, Model>) -> Signature {
    let mut reachable = BTreeMap::new();
    let mut queue = VecDeque::from([root]);

    // Each model is enqueued at most once, so cyclic references terminate.
    while let Some(name) = queue.pop_front() {
        if reachable.contains_key(name) {
            continue;
        }

        let Some(model) = models.get(name) else {
            continue;
        };

        let mut bindings = model.bindings.clone();
        bindings.sort();

        queue.extend(model.nested_models());
        reachable.insert(
            name.to_string(),
            Model {
                name: model.name.clone(),
                bindings,
            },
        );
    }

    Signature::new(Canonical {
        root: root.to_string(),
        columns: columns.clone(),
        models: reachable,
    })
}

impl Signature {
    fn new(canonical: Canonical) -> Self {
        let mut hasher = Xxh3::new();
        canonical.hash(&mut hasher);

        Self {
            hash: hasher.finish(),
            canonical: Arc::new(canonical),
        }
    }

    /// The 64-bit hash of the canonical form.
    pub fn hash64(&self) -> u64 {
        self.hash
    }

    /// Name of the view's output model.
    pub fn view(&self) -> &str {
        &self.canonical.root
    }

    pub(crate) fn canonical(&self) -> &Canonical {
        &self.canonical
    }
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
            && (Arc::ptr_eq(&self.canonical, &other.canonical) || self.canonical == other.canonical)
    }
}

impl Eq for Signature {}

impl Hash for Signature {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.hash)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.debug_struct("Signature")
                .field("hash", &format_args!("{:016x}", self.hash))
                .field("canonical", &self.canonical)
                .finish()
        } else {
            write!(f, "Signature({}:{:016x})", self.canonical.root, self.hash)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{data::Type, Binding};

    fn models(list: Vec<Model>) -> IndexMap<String, Model> {
        list.into_iter().map(|m| (m.name.clone(), m)).collect()
    }

    #[test]
    fn forced_collision_is_resolved_by_canonical_form() {
        let columns: Columns = [("name", Type::String)].into_iter().collect();
        let a = compute(
            "User",
            &columns,
            &models(vec![Model::new("User").field(Binding::column("name", "name", Type::String))]),
        );
        let b = compute(
            "User",
            &columns,
            &models(vec![Model::new("User").field(Binding::column("login", "name", Type::String))]),
        );

        let forged = Signature {
            hash: a.hash,
            canonical: b.canonical.clone(),
        };

        assert_ne!(a, b);
        assert_ne!(a, forged);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn cyclic_models_terminate() {
        let columns: Columns = [("id", Type::I64)].into_iter().collect();
        let sig = compute(
            "A",
            &columns,
            &models(vec![
                Model::new("A").field(Binding::nested("b", "B")),
                Model::new("B").field(Binding::nested("a", "A")),
            ]),
        );

        assert_eq!(sig.canonical().models.len(), 2);
    }
}
