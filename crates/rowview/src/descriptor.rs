//! Resolved view definitions.
//!
//! A [`Descriptor`] is the input to the compiler: the shape of the rows a
//! query produces and the models the rows are mapped into. Descriptors are
//! produced by the caller-facing layer after it has resolved its own view
//! syntax; this crate never parses one.

mod binding;
pub use binding::{Binding, ColumnRef, Conversion, Source};

mod model;
pub use model::Model;

mod path;
pub use path::FieldPath;

use crate::{data::Type, signature, Columns, Signature};

use indexmap::IndexMap;

/// A resolved, immutable view definition.
///
/// Nested bindings refer to other models by name, so one model may be
/// shared by several fields. References are not checked here: an unknown
/// model or a cycle is reported when the view is compiled.
#[derive(Debug, Clone)]
pub struct Descriptor {
    columns: Columns,
    models: IndexMap<String, Model>,
    root: String,
    signature: Signature,
}

#[derive(Debug)]
pub struct Builder {
    columns: Vec<(String, Type)>,
    models: IndexMap<String, Model>,
    root: String,
}

impl Descriptor {
    /// Starts a view whose output is an instance of the `root` model.
    pub fn builder(root: impl Into<String>) -> Builder {
        Builder {
            columns: vec![],
            models: IndexMap::new(),
            root: root.into(),
        }
    }

    /// The expected row shape.
    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    /// Name of the output model.
    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn model(&self, name: &str) -> Option<&Model> {
        self.models.get(name)
    }

    pub fn models(&self) -> impl Iterator<Item = &Model> {
        self.models.values()
    }

    /// The canonical identity of this view, used as the cache key.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }
}

impl Builder {
    /// Appends a column to the expected row shape.
    pub fn column(mut self, name: impl Into<String>, ty: Type) -> Self {
        self.columns.push((name.into(), ty));
        self
    }

    /// Adds a model. A later model with the same name replaces the earlier one.
    pub fn model(mut self, model: Model) -> Self {
        self.models.insert(model.name.clone(), model);
        self
    }

    pub fn build(self) -> Descriptor {
        let columns: Columns = self.columns.into_iter().collect();
        let signature = signature::compute(&self.root, &columns, &self.models);

        Descriptor {
            columns,
            models: self.models,
            root: self.root,
            signature,
        }
    }
}
