use crate::{
    data::{Type, Value},
    err, Error, Result,
};

use std::fmt;

/// A conversion function registered with a [`Compiler`](crate::Compiler).
///
/// Bindings refer to it by name with [`Conversion::function`]. The name is
/// part of the view signature; the function itself is resolved when the view
/// is compiled, so an unknown name is a compilation error.
///
/// The function receives the column value widened to `input` and must
/// return a value of type `output` or null. Null column values are passed
/// through without calling it.
///
/// [`Conversion::function`]: crate::Conversion::function
pub struct Function {
    name: String,
    input: Type,
    output: Type,
    func: Box<dyn Fn(Value) -> Result<Value> + Send + Sync>,
}

impl Function {
    pub fn new<F>(name: impl Into<String>, input: Type, output: Type, func: F) -> Self
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            input,
            output,
            func: Box::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn input(&self) -> &Type {
        &self.input
    }

    pub fn output(&self) -> &Type {
        &self.output
    }

    /// Returns `true` if the function can convert a `from` column into a `to` field.
    pub(crate) fn accepts(&self, from: &Type, to: &Type) -> bool {
        from.widens_to(&self.input) && self.output == *to
    }

    pub(crate) fn call(&self, value: Value) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }

        let value = self.input.cast(value)?;
        let output = (self.func)(value).map_err(|e| e.context(err!("function `{}`", self.name)))?;

        if output.is_a(&self.output) {
            Ok(output)
        } else {
            Err(Error::type_conversion_because(
                output,
                self.output.clone(),
                format!("function `{}` returned a value of another type", self.name),
            ))
        }
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("input", &self.input)
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}
