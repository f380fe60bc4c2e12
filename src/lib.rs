//! Composable transformations and a small concatenative interpreter.
//!
//! [`Transformation`]s are unary functions that compose with `|`. The
//! [`attempt`] module layers short-circuiting combinators over [`TriState`]
//! values (present, absent or failed). On top of that, [`stack`] and
//! [`control`] provide a stack machine whose programs are [`Quotation`]s:
//! sequences of literals and words, executed by [`stack::call`].
//!
//! ```
//! use concatenative::{control::binrec, quotation, stack::*, Val};
//!
//! let fib = push(quotation![3, lt()])
//!     | push(quotation![pop(), 1])
//!     | push(quotation![1, sub()])
//!     | push(quotation![2, sub()])
//!     | push(quotation![add()])
//!     | binrec();
//! let program = push(10) | fib;
//! assert_eq!(program.apply(Vec::new()), Ok(vec![Val::Int(55)]));
//! ```

pub mod attempt;
pub mod control;
pub mod debug;
pub mod operator;
pub mod prompt;
pub mod stack;
pub mod transform;
pub mod tristate;
pub mod value;

pub use transform::{constant, identity, inspect, wraps, Pipe, Transformation};
pub use tristate::TriState;
pub use value::{Instr, Quotation, Stack, StackError, StackResult, Val, Word};
