use super::Binding;

/// An output type: a name and the bindings that populate its fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Model {
    /// Identifies the output type within the view
    pub name: String,

    /// Fields of the output type, in declaration order
    pub bindings: Vec<Binding>,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bindings: vec![],
        }
    }

    pub fn field(mut self, binding: Binding) -> Self {
        self.bindings.push(binding);
        self
    }

    /// Names of the models this model nests directly.
    pub(crate) fn nested_models(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().filter_map(|binding| match &binding.source {
            super::Source::Nested(model) => Some(model.as_str()),
            super::Source::Column(_) => None,
        })
    }
}
