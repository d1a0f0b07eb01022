use super::FieldPath;
use crate::data::Type;

/// Writes one output field, either from a row column or from a nested model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Binding {
    /// Output field written by this binding
    pub path: FieldPath,

    /// Where the value comes from
    pub source: Source,

    /// True if the field may hold null
    pub nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Source {
    /// Read a column of the row
    Column(ColumnRef),

    /// Build an instance of the named model from the same row
    Nested(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnRef {
    /// Column name in the row shape
    pub column: String,

    /// Declared type of the output field
    pub ty: Type,

    /// Explicit conversion from the column type to `ty`
    pub conversion: Option<Conversion>,
}

/// An explicit conversion rule, required whenever the column type does not
/// widen to the field type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Conversion {
    /// Parse a string column into a boolean or a number
    Parse,

    /// Convert between numeric types, failing on overflow or lost precision
    Narrow,

    /// Render a scalar column as a string
    Format,

    /// Call the [`Function`](crate::Function) registered with the compiler
    /// under this name
    Function(String),
}

impl Conversion {
    pub fn function(name: impl Into<String>) -> Self {
        Conversion::Function(name.into())
    }

    pub fn name(&self) -> &str {
        match self {
            Conversion::Parse => "parse",
            Conversion::Narrow => "narrow",
            Conversion::Format => "format",
            Conversion::Function(name) => name,
        }
    }
}

impl Binding {
    /// Binds `path` to `column`, declaring the output field as `ty`.
    pub fn column(path: impl Into<FieldPath>, column: impl Into<String>, ty: Type) -> Self {
        Self {
            path: path.into(),
            source: Source::Column(ColumnRef {
                column: column.into(),
                ty,
                conversion: None,
            }),
            nullable: false,
        }
    }

    /// Binds `path` to an instance of `model` built from the same row.
    pub fn nested(path: impl Into<FieldPath>, model: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            source: Source::Nested(model.into()),
            nullable: false,
        }
    }

    /// Allows the field to hold null.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Applies `conversion` to the column value.
    ///
    /// # Panics
    ///
    /// Panics if the binding is a nested binding.
    #[track_caller]
    pub fn convert(mut self, conversion: Conversion) -> Self {
        match &mut self.source {
            Source::Column(column) => column.conversion = Some(conversion),
            Source::Nested(model) => {
                panic!("nested binding to `{model}` cannot take a conversion")
            }
        }
        self
    }

    /// Returns the declared type of the output field.
    pub fn ty(&self) -> Type {
        match &self.source {
            Source::Column(column) => column.ty.clone(),
            Source::Nested(model) => Type::object(model.clone()),
        }
    }
}
