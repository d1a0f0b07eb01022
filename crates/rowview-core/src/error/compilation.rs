use super::Error;
use crate::data::Type;

/// Error when a view cannot be compiled into a transformer.
///
/// This occurs when:
/// - A binding references a column that is not part of the row shape
/// - A binding references a model the view does not define
/// - A binding names a conversion function the compiler does not know
/// - Nested models reference each other in a cycle
/// - Two bindings write the same output path
/// - A field's declared type cannot hold the bound column (no widening or conversion applies)
/// - The assembled plan fails verification
///
/// These errors are raised once, when the view is compiled, never per row.
#[derive(Debug)]
pub(super) struct CompilationError {
    kind: CompilationErrorKind,
}

#[derive(Debug)]
enum CompilationErrorKind {
    MissingColumn {
        field: Box<str>,
        column: Box<str>,
    },
    UnknownModel {
        field: Box<str>,
        model: Box<str>,
    },
    Cycle {
        models: Vec<String>,
    },
    DuplicatePath {
        path: Box<str>,
    },
    TypeMismatch {
        field: Box<str>,
        from: Type,
        to: Type,
    },
    UnknownFunction {
        field: Box<str>,
        function: Box<str>,
    },
    InvalidConversion {
        field: Box<str>,
        conversion: Box<str>,
        from: Type,
        to: Type,
    },
    Rejected {
        reason: Box<str>,
    },
}

impl std::error::Error for CompilationError {}

impl core::fmt::Display for CompilationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use CompilationErrorKind::*;

        f.write_str("compilation failed: ")?;

        match &self.kind {
            MissingColumn { field, column } => {
                write!(f, "field `{field}` references unknown column `{column}`")
            }
            UnknownModel { field, model } => {
                write!(f, "field `{field}` references unknown model `{model}`")
            }
            UnknownFunction { field, function } => {
                write!(f, "field `{field}` references unknown function `{function}`")
            }
            Cycle { models } => write!(f, "nested models form a cycle: {}", models.join(" -> ")),
            DuplicatePath { path } => write!(f, "output path `{path}` is bound more than once"),
            TypeMismatch { field, from, to } => write!(
                f,
                "field `{field}` of type {to} cannot hold a column of type {from}"
            ),
            InvalidConversion {
                field,
                conversion,
                from,
                to,
            } => write!(
                f,
                "conversion `{conversion}` on field `{field}` does not apply from {from} to {to}"
            ),
            Rejected { reason } => write!(f, "transformer rejected: {reason}"),
        }
    }
}

impl Error {
    fn compilation(kind: CompilationErrorKind) -> Error {
        Error::from(super::ErrorKind::Compilation(CompilationError { kind }))
    }

    /// Creates an error for a binding that references a column absent from the row shape.
    pub fn missing_column(field: impl Into<String>, column: impl Into<String>) -> Error {
        Error::compilation(CompilationErrorKind::MissingColumn {
            field: field.into().into(),
            column: column.into().into(),
        })
    }

    /// Creates an error for a nested binding that references an undefined model.
    pub fn unknown_model(field: impl Into<String>, model: impl Into<String>) -> Error {
        Error::compilation(CompilationErrorKind::UnknownModel {
            field: field.into().into(),
            model: model.into().into(),
        })
    }

    /// Creates an error for a binding that names an unregistered conversion function.
    pub fn unknown_function(field: impl Into<String>, function: impl Into<String>) -> Error {
        Error::compilation(CompilationErrorKind::UnknownFunction {
            field: field.into().into(),
            function: function.into().into(),
        })
    }

    /// Creates an error for nested models that reference each other.
    ///
    /// `models` lists the cycle in traversal order, ending with the model
    /// that closes it.
    pub fn view_cycle(models: Vec<String>) -> Error {
        Error::compilation(CompilationErrorKind::Cycle { models })
    }

    /// Creates an error for an output path written by more than one binding.
    pub fn duplicate_path(path: impl Into<String>) -> Error {
        Error::compilation(CompilationErrorKind::DuplicatePath {
            path: path.into().into(),
        })
    }

    /// Creates an error for a field whose declared type cannot hold its column.
    pub fn type_mismatch(field: impl Into<String>, from: Type, to: Type) -> Error {
        Error::compilation(CompilationErrorKind::TypeMismatch {
            field: field.into().into(),
            from,
            to,
        })
    }

    /// Creates an error for a conversion rule that does not apply to its field.
    pub fn invalid_conversion(
        field: impl Into<String>,
        conversion: impl Into<String>,
        from: Type,
        to: Type,
    ) -> Error {
        Error::compilation(CompilationErrorKind::InvalidConversion {
            field: field.into().into(),
            conversion: conversion.into().into(),
            from,
            to,
        })
    }

    /// Creates an error for a compiled plan that failed verification.
    pub fn transformer_rejected(reason: impl Into<String>) -> Error {
        Error::compilation(CompilationErrorKind::Rejected {
            reason: reason.into().into(),
        })
    }

    /// Returns `true` if this error, or any error it wraps, is a compilation error.
    pub fn is_compilation(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::Compilation(_)))
    }
}
