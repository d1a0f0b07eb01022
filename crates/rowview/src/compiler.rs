mod function;
pub use function::Function;

mod lower;
mod plan;
mod verify;

use crate::{err, Descriptor, Result, Transformer};

use indexmap::IndexMap;
use std::{sync::Arc, time::Instant};
use tracing::debug;

/// Turns a view into a [`Transformer`].
///
/// Implementations must not touch any cache; the
/// [`TransformerCache`](crate::TransformerCache) decides when to compile.
pub trait Compile: Send + Sync + 'static {
    fn compile(&self, descriptor: &Descriptor) -> Result<Transformer>;
}

impl<F> Compile for F
where
    F: Fn(&Descriptor) -> Result<Transformer> + Send + Sync + 'static,
{
    fn compile(&self, descriptor: &Descriptor) -> Result<Transformer> {
        self(descriptor)
    }
}

/// The default compiler.
///
/// Compilation walks the view depth-first into a plan (one node per output
/// field), verifies the plan against the row shape and lowers it into a
/// tree of closures. Every structural problem is reported here, so a bad
/// view fails once instead of on every row.
///
/// Conversion functions named by [`Conversion::Function`] bindings are
/// looked up among the functions registered with [`function`](Self::function).
///
/// [`Conversion::Function`]: crate::Conversion::Function
#[derive(Debug, Default, Clone)]
pub struct Compiler {
    functions: IndexMap<String, Arc<Function>>,
}

impl Compiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `function`, replacing any function of the same name.
    ///
    /// Signatures only carry the function name. Register functions before
    /// the compiler is handed to a cache; transformers already compiled keep
    /// the function they were built with.
    pub fn function(mut self, function: Function) -> Self {
        self.functions
            .insert(function.name().to_string(), Arc::new(function));
        self
    }

    /// Returns the registered function called `name`.
    pub fn get_function(&self, name: &str) -> Option<&Function> {
        self.functions.get(name).map(|function| &**function)
    }
}

impl Compile for Compiler {
    fn compile(&self, descriptor: &Descriptor) -> Result<Transformer> {
        let signature = descriptor.signature();
        let span = tracing::debug_span!("compile", view = descriptor.root(), %signature);
        let _enter = span.enter();

        let start = Instant::now();
        let canonical = signature.canonical();

        let plan = plan::build(canonical, &self.functions)
            .and_then(|plan| {
                verify::apply(&plan, &canonical.columns)?;
                Ok(plan)
            })
            .map_err(|e| e.context(err!("view `{}` [{}]", descriptor.root(), signature)))?;

        let func = lower::apply(plan);

        debug!(elapsed = ?start.elapsed(), "compiled view");
        Ok(Transformer::new(signature.clone(), func))
    }
}
