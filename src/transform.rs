//! Composable unary transformations.
//!
//! A [`Transformation`] wraps a host function `I -> O`. Two transformations
//! compose with [`Transformation::compose`] (or `|`) into a new one that owns
//! both halves. Composition is associative and [`identity`] is its neutral
//! element.

use std::{fmt, ops::BitOr, rc::Rc};

pub struct Transformation<I, O> {
    name: Rc<str>,
    f: Rc<dyn Fn(I) -> O>,
}

impl<I, O> Clone for Transformation<I, O> {
    fn clone(&self) -> Self {
        Transformation {
            name: Rc::clone(&self.name),
            f: Rc::clone(&self.f),
        }
    }
}

impl<I, O> Transformation<I, O> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(I) -> O + 'static,
    {
        Transformation::named("<fn>", f)
    }
    pub fn named<N, F>(name: N, f: F) -> Self
    where
        N: Into<Rc<str>>,
        F: Fn(I) -> O + 'static,
    {
        Transformation {
            name: name.into(),
            f: Rc::new(f),
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    /// Give the transformation a new name, keeping its behavior
    pub fn rename<N>(self, name: N) -> Self
    where
        N: Into<Rc<str>>,
    {
        Transformation {
            name: name.into(),
            f: self.f,
        }
    }
    pub fn apply(&self, input: I) -> O {
        (self.f)(input)
    }
    /// Whether both values wrap the very same host function
    pub fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.f, &other.f)
    }
}

impl<I: 'static, O: 'static> Transformation<I, O> {
    /// `self.compose(next)` applies `self` first, then `next`
    pub fn compose<Q: 'static>(self, next: Transformation<O, Q>) -> Transformation<I, Q> {
        let name = format!("{} | {}", self.name, next.name);
        Transformation::named(name, move |input| next.apply(self.apply(input)))
    }
    pub fn into_fn(self) -> impl Fn(I) -> O {
        move |input| self.apply(input)
    }
}

impl<I: 'static, O: 'static, E: 'static> Transformation<I, Result<O, E>> {
    /// Composition through the failure channel: `next` only runs on `Ok`
    pub fn and_then<Q: 'static>(
        self,
        next: Transformation<O, Result<Q, E>>,
    ) -> Transformation<I, Result<Q, E>> {
        let name = format!("{} | {}", self.name, next.name);
        Transformation::named(name, move |input| self.apply(input).and_then(|o| next.apply(o)))
    }
}

impl<I: 'static, O: 'static, Q: 'static> BitOr<Transformation<O, Q>> for Transformation<I, O> {
    type Output = Transformation<I, Q>;
    fn bitor(self, next: Transformation<O, Q>) -> Self::Output {
        self.compose(next)
    }
}

impl<I, O> fmt::Debug for Transformation<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Transformation({})", self.name)
    }
}

impl<I, O> fmt::Display for Transformation<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Reversed application: `value.pipe(&t)` is `t.apply(value)`
pub trait Pipe: Sized {
    fn pipe<O>(self, transformation: &Transformation<Self, O>) -> O {
        transformation.apply(self)
    }
}

impl<T> Pipe for T {}

pub fn wraps<I, O, F>(f: F) -> Transformation<I, O>
where
    F: Fn(I) -> O + 'static,
{
    Transformation::new(f)
}

pub fn identity<T>() -> Transformation<T, T> {
    Transformation::named("identity", |value| value)
}

pub fn constant<I, T>(value: T) -> Transformation<I, T>
where
    T: Clone + 'static,
{
    Transformation::named("constant", move |_| value.clone())
}

/// Observe the value without changing it.
///
/// The observer only gets a shared reference, so it cannot mutate the value
/// through this path.
pub fn inspect<T, F>(f: F) -> Transformation<T, T>
where
    F: Fn(&T) + 'static,
{
    Transformation::named("inspect", move |value| {
        f(&value);
        value
    })
}
