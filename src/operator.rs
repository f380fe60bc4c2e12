//! Binary operators with a fixed right-hand operand.
//!
//! `lt(3)` is the transformation `x -> x < 3`, `sub(1)` is `x -> x - 1`, and
//! so on. The left-hand side is always the transformation's input.

use std::ops::{Add, Div, Mul, Rem, Sub};

use crate::transform::Transformation;

pub fn binary<L, R, O, F>(name: &str, rhs: R, op: F) -> Transformation<L, O>
where
    R: 'static,
    F: Fn(L, &R) -> O + 'static,
{
    Transformation::named(name, move |lhs| op(lhs, &rhs))
}

macro_rules! comparisons {
    ($($name:ident => $op:tt),* $(,)?) => {
        $(
            pub fn $name<L, R>(rhs: R) -> Transformation<L, bool>
            where
                L: PartialOrd<R>,
                R: 'static,
            {
                binary(stringify!($name), rhs, |lhs: L, rhs: &R| lhs $op *rhs)
            }
        )*
    };
}

comparisons!(eq => ==, ne => !=, lt => <, le => <=, gt => >, ge => >=);

macro_rules! arithmetic {
    ($($name:ident => $trait:ident),* $(,)?) => {
        $(
            pub fn $name<L, R>(rhs: R) -> Transformation<L, L::Output>
            where
                L: $trait<R>,
                R: Clone + 'static,
            {
                binary(stringify!($name), rhs, |lhs: L, rhs: &R| lhs.$name(rhs.clone()))
            }
        )*
    };
}

arithmetic!(add => Add, sub => Sub, mul => Mul, div => Div, rem => Rem);
