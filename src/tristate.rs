use std::fmt;

/// A value that is present, absent, or a carried failure.
///
/// Every combinator treats `Empty` and `Error` as opaque and only ever looks
/// inside `Value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriState<T, E = anyhow::Error> {
    Value(T),
    Empty,
    Error(E),
}

use TriState::*;

impl<T, E> TriState<T, E> {
    pub fn is_value(&self) -> bool {
        matches!(self, Value(_))
    }
    pub fn is_empty(&self) -> bool {
        matches!(self, Empty)
    }
    pub fn is_error(&self) -> bool {
        matches!(self, Error(_))
    }
    pub fn as_ref(&self) -> TriState<&T, &E> {
        match self {
            Value(value) => Value(value),
            Empty => Empty,
            Error(error) => Error(error),
        }
    }
    pub fn value(self) -> Option<T> {
        match self {
            Value(value) => Some(value),
            _ => None,
        }
    }
    pub fn error(self) -> Option<E> {
        match self {
            Error(error) => Some(error),
            _ => None,
        }
    }
    pub fn map<U, F>(self, f: F) -> TriState<U, E>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Value(value) => Value(f(value)),
            Empty => Empty,
            Error(error) => Error(error),
        }
    }
    pub fn and_then<U, F>(self, f: F) -> TriState<U, E>
    where
        F: FnOnce(T) -> TriState<U, E>,
    {
        match self {
            Value(value) => f(value),
            Empty => Empty,
            Error(error) => Error(error),
        }
    }
    pub fn map_error<G, F>(self, f: F) -> TriState<T, G>
    where
        F: FnOnce(E) -> G,
    {
        match self {
            Value(value) => Value(value),
            Empty => Empty,
            Error(error) => Error(f(error)),
        }
    }
    /// Keep the value only if it satisfies `predicate`.
    ///
    /// Unlike the other combinators this does not preserve `Error`: anything
    /// that is not a matching value becomes `Empty`.
    pub fn filter<P>(self, predicate: P) -> Self
    where
        P: FnOnce(&T) -> bool,
    {
        match self {
            Value(value) if predicate(&value) => Value(value),
            _ => Empty,
        }
    }
    pub fn or_else<F>(self, supplier: F) -> T
    where
        F: FnOnce() -> T,
    {
        match self {
            Value(value) => value,
            Empty | Error(_) => supplier(),
        }
    }
    pub fn or_default(self, default: T) -> T {
        match self {
            Value(value) => value,
            Empty | Error(_) => default,
        }
    }
    pub fn map_or_else<U, F, S>(self, f: F, supplier: S) -> U
    where
        F: FnOnce(T) -> U,
        S: FnOnce() -> U,
    {
        match self {
            Value(value) => f(value),
            Empty | Error(_) => supplier(),
        }
    }
    pub fn map_or<U, F>(self, f: F, default: U) -> U
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Value(value) => f(value),
            Empty | Error(_) => default,
        }
    }
    pub fn inspect<F>(self, f: F) -> Self
    where
        F: FnOnce(&T),
    {
        if let Value(value) = &self {
            f(value);
        }
        self
    }
    pub fn inspect_error<F>(self, f: F) -> Self
    where
        F: FnOnce(&E),
    {
        if let Error(error) = &self {
            f(error);
        }
        self
    }
}

impl<T, E> From<Option<T>> for TriState<T, E> {
    fn from(option: Option<T>) -> Self {
        match option {
            Some(value) => Value(value),
            None => Empty,
        }
    }
}

impl<T, E> From<Result<T, E>> for TriState<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Value(value),
            Err(error) => Error(error),
        }
    }
}

impl<T, E> fmt::Display for TriState<T, E>
where
    T: fmt::Display,
    E: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value(value) => write!(f, "{}", value),
            Empty => write!(f, "empty"),
            Error(error) => write!(f, "error: {}", error),
        }
    }
}
