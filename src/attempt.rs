//! Try-aware combinators.
//!
//! Each function here builds a [`Transformation`] over [`TriState`] values.
//! `Empty` and `Error` flow through untouched until a resolver
//! ([`or_else`], [`or_default`], [`map_or_else`], [`map_or_default`],
//! [`unwrap`]) turns them back into a plain value or a raised failure.
//!
//! [`guard`] and [`fallible`] are the only way in from raised failures
//! (`Result::Err`), and [`unwrap`]/[`expect`] the only way back out.

use std::fmt;

use crate::{transform::Transformation, tristate::TriState};

pub fn guard<T, E, F>(op: F) -> TriState<T, E>
where
    F: FnOnce() -> Result<T, E>,
{
    op().into()
}

pub fn fallible<I, O, E>(op: Transformation<I, Result<O, E>>) -> Transformation<I, TriState<O, E>>
where
    I: 'static,
    O: 'static,
    E: 'static,
{
    let name = format!("fallible({})", op.name());
    Transformation::named(name, move |input| guard(|| op.apply(input)))
}

pub fn select<T, E, P>(predicate: P) -> Transformation<T, TriState<T, E>>
where
    P: Fn(&T) -> bool + 'static,
{
    Transformation::named("select", move |value| {
        if predicate(&value) {
            TriState::Value(value)
        } else {
            TriState::Empty
        }
    })
}

pub fn map<T, U, E, F>(f: F) -> Transformation<TriState<T, E>, TriState<U, E>>
where
    F: Fn(T) -> U + 'static,
{
    Transformation::named("map", move |tri: TriState<T, E>| tri.map(&f))
}

/// Apply `f` to present values only
pub fn then<T, U, E, F>(f: F) -> Transformation<TriState<T, E>, TriState<U, E>>
where
    F: Fn(T) -> U + 'static,
{
    map(f).rename("then")
}

pub fn flat_map<T, U, E, F>(f: F) -> Transformation<TriState<T, E>, TriState<U, E>>
where
    F: Fn(T) -> TriState<U, E> + 'static,
{
    Transformation::named("flat_map", move |tri: TriState<T, E>| tri.and_then(&f))
}

/// Like [`map`], but a raised failure from `f` becomes an `Error`
pub fn try_map<T, U, E, X, F>(f: F) -> Transformation<TriState<T, E>, TriState<U, E>>
where
    F: Fn(T) -> Result<U, X> + 'static,
    X: Into<E>,
{
    Transformation::named("try_map", move |tri: TriState<T, E>| {
        tri.and_then(|value| guard(|| f(value).map_err(Into::into)))
    })
}

pub fn map_error<T, E, G, F>(f: F) -> Transformation<TriState<T, E>, TriState<T, G>>
where
    F: Fn(E) -> G + 'static,
{
    Transformation::named("map_error", move |tri: TriState<T, E>| tri.map_error(&f))
}

pub fn filter<T, E, P>(predicate: P) -> Transformation<TriState<T, E>, TriState<T, E>>
where
    P: Fn(&T) -> bool + 'static,
{
    Transformation::named("filter", move |tri: TriState<T, E>| tri.filter(&predicate))
}

pub fn or_else<T, E, S>(supplier: S) -> Transformation<TriState<T, E>, T>
where
    S: Fn() -> T + 'static,
{
    Transformation::named("or_else", move |tri: TriState<T, E>| tri.or_else(&supplier))
}

pub fn or_default<T, E>(default: T) -> Transformation<TriState<T, E>, T>
where
    T: Clone + 'static,
{
    Transformation::named("or_default", move |tri: TriState<T, E>| {
        tri.or_default(default.clone())
    })
}

pub fn map_or_else<T, U, E, F, S>(f: F, supplier: S) -> Transformation<TriState<T, E>, U>
where
    F: Fn(T) -> U + 'static,
    S: Fn() -> U + 'static,
{
    Transformation::named("map_or_else", move |tri: TriState<T, E>| {
        tri.map_or_else(&f, &supplier)
    })
}

pub fn map_or_default<T, U, E, F>(f: F, default: U) -> Transformation<TriState<T, E>, U>
where
    F: Fn(T) -> U + 'static,
    U: Clone + 'static,
{
    Transformation::named("map_or_default", move |tri: TriState<T, E>| {
        tri.map_or(&f, default.clone())
    })
}

pub fn try_inspect<T, E, F>(f: F) -> Transformation<TriState<T, E>, TriState<T, E>>
where
    F: Fn(&T) + 'static,
{
    Transformation::named("try_inspect", move |tri: TriState<T, E>| tri.inspect(&f))
}

pub fn inspect_error<T, E, F>(f: F) -> Transformation<TriState<T, E>, TriState<T, E>>
where
    F: Fn(&E) + 'static,
{
    Transformation::named("inspect_error", move |tri: TriState<T, E>| {
        tri.inspect_error(&f)
    })
}

/// Raise `Empty` and `Error` as failures carrying `message`.
///
/// An `Error` keeps its original failure as the cause of the raised one.
pub fn unwrap<T, E, M>(message: M) -> Transformation<TriState<T, E>, anyhow::Result<T>>
where
    E: Into<anyhow::Error>,
    M: fmt::Display + fmt::Debug + Clone + Send + Sync + 'static,
{
    Transformation::named("unwrap", move |tri: TriState<T, E>| match tri {
        TriState::Value(value) => Ok(value),
        TriState::Empty => Err(anyhow::Error::msg(message.clone())),
        TriState::Error(error) => Err(error.into().context(message.clone())),
    })
}

pub fn expect<T, E, M>(message: M) -> Transformation<TriState<T, E>, anyhow::Result<T>>
where
    E: Into<anyhow::Error>,
    M: fmt::Display,
{
    unwrap(format!("expected: {}", message)).rename("expect")
}

pub fn raise<I, T, M>(message: M) -> Transformation<I, anyhow::Result<T>>
where
    M: fmt::Display + fmt::Debug + Clone + Send + Sync + 'static,
{
    Transformation::named("raise", move |_| Err(anyhow::Error::msg(message.clone())))
}
