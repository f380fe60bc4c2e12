use std::fmt;

use tracing::{debug as log_debug, enabled, warn, Level};

use crate::transform::Transformation;

/// Report every invocation of `op` through `tracing`.
///
/// The argument is logged along with either the result or the failure, and
/// the outcome is handed back untouched.
pub fn debug<I, O, E>(op: Transformation<I, Result<O, E>>) -> Transformation<I, Result<O, E>>
where
    I: fmt::Debug + 'static,
    O: fmt::Debug + 'static,
    E: fmt::Display + 'static,
{
    let name = op.name().to_owned();
    Transformation::named(name.clone(), move |input: I| {
        if !enabled!(target: "concatenative::debug", Level::WARN) {
            return op.apply(input);
        }
        let args = format!("{:?}", input);
        match op.apply(input) {
            Ok(output) => {
                log_debug!(target: "concatenative::debug", op = %name, %args, result = ?output, "returned");
                Ok(output)
            }
            Err(error) => {
                warn!(target: "concatenative::debug", op = %name, %args, %error, "raised");
                Err(error)
            }
        }
    })
}
