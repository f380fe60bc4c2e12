use std::{cmp::Ordering, fmt, iter::FromIterator, rc::Rc};

use itertools::Itertools;
use rpds::Vector;

use crate::transform::Transformation;

#[derive(Debug, Clone, PartialEq)]
pub enum Val {
    Bool(bool),
    Int(i64),
    Real(f64),
    Text(Rc<str>),
    Quotation(Quotation),
}

pub type Stack = Vec<Val>;

pub type StackResult = Result<Stack, StackError>;

/// A transformation of the whole stack that may fault
pub type Word = Transformation<Stack, StackResult>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StackError {
    #[error("stack underflow: `{word}` needs {needed} values but the stack holds {found}")]
    StackUnderflow {
        word: &'static str,
        needed: usize,
        found: usize,
    },
    #[error("type mismatch: `{word}` expects {expected}, found {found}")]
    TypeMismatch {
        word: &'static str,
        expected: &'static str,
        found: String,
    },
    #[error("division by zero in `{word}`")]
    DivisionByZero { word: &'static str },
    #[error("integer overflow in `{word}`")]
    Overflow { word: &'static str },
}

impl StackError {
    pub fn mismatch(word: &'static str, expected: &'static str, found: &Val) -> Self {
        StackError::TypeMismatch {
            word,
            expected,
            found: found.kind().into(),
        }
    }
    fn mismatch_pair(word: &'static str, expected: &'static str, left: &Val, right: &Val) -> Self {
        StackError::TypeMismatch {
            word,
            expected,
            found: format!("{} and {}", left.kind(), right.kind()),
        }
    }
}

#[derive(Clone)]
pub enum Instr {
    Literal(Val),
    Operation(Word),
}

impl PartialEq for Instr {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Instr::Literal(a), Instr::Literal(b)) => a == b,
            (Instr::Operation(a), Instr::Operation(b)) => a.same(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Instr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Instr::Literal(val) => write!(f, "{:?}", val),
            Instr::Operation(word) => write!(f, "<{}>", word.name()),
        }
    }
}

impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Instr::Literal(val) => write!(f, "{}", val),
            Instr::Operation(word) => write!(f, "{}", word.name()),
        }
    }
}

impl From<Word> for Instr {
    fn from(word: Word) -> Self {
        Instr::Operation(word)
    }
}

macro_rules! literal_instrs {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Instr {
            fn from(val: $ty) -> Self {
                Instr::Literal(val.into())
            }
        })*
    };
}

literal_instrs!(Val, bool, i64, f64, &str, String, Quotation);

/// An immutable sequence of instructions, shared cheaply between copies
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Quotation {
    instrs: Vector<Instr>,
}

impl Quotation {
    pub fn new() -> Self {
        Quotation::default()
    }
    pub fn len(&self) -> usize {
        self.instrs.len()
    }
    pub fn is_empty(&self) -> bool {
        self.instrs.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = &Instr> {
        self.instrs.iter()
    }
    #[must_use]
    pub fn with<I: Into<Instr>>(&self, instr: I) -> Self {
        Quotation {
            instrs: self.instrs.push_back(instr.into()),
        }
    }
    #[must_use]
    pub fn concat(&self, other: &Quotation) -> Self {
        self.iter().chain(other.iter()).cloned().collect()
    }
}

impl FromIterator<Instr> for Quotation {
    fn from_iter<T: IntoIterator<Item = Instr>>(iter: T) -> Self {
        Quotation {
            instrs: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Quotation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}]", self.iter().join(" "))
    }
}

impl From<bool> for Val {
    fn from(b: bool) -> Self {
        Val::Bool(b)
    }
}

impl From<i64> for Val {
    fn from(i: i64) -> Self {
        Val::Int(i)
    }
}

impl From<f64> for Val {
    fn from(r: f64) -> Self {
        Val::Real(r)
    }
}

impl From<&str> for Val {
    fn from(s: &str) -> Self {
        Val::Text(s.into())
    }
}

impl From<String> for Val {
    fn from(s: String) -> Self {
        Val::Text(s.into())
    }
}

impl From<Quotation> for Val {
    fn from(quotation: Quotation) -> Self {
        Val::Quotation(quotation)
    }
}

impl fmt::Display for Val {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Val::Bool(b) => write!(f, "{}", b),
            Val::Int(i) => write!(f, "{}", i),
            Val::Real(r) => write!(f, "{:?}", r),
            Val::Text(s) => write!(f, "{:?}", s),
            Val::Quotation(quotation) => write!(f, "{}", quotation),
        }
    }
}

enum Numbers {
    Ints(i64, i64),
    Reals(f64, f64),
}

fn numbers(word: &'static str, left: &Val, right: &Val) -> Result<Numbers, StackError> {
    Ok(match (left, right) {
        (Val::Int(a), Val::Int(b)) => Numbers::Ints(*a, *b),
        (Val::Int(a), Val::Real(b)) => Numbers::Reals(*a as f64, *b),
        (Val::Real(a), Val::Int(b)) => Numbers::Reals(*a, *b as f64),
        (Val::Real(a), Val::Real(b)) => Numbers::Reals(*a, *b),
        (a, b) => return Err(StackError::mismatch_pair(word, "two numbers", a, b)),
    })
}

/// Longest text `mul` will build
const MAX_TEXT_LEN: usize = 1 << 30;

/// Exact ordering of an int against a real, without rounding the int
fn cmp_int_real(a: i64, b: f64) -> Option<Ordering> {
    const TWO_63: f64 = 9_223_372_036_854_775_808.0;
    if b.is_nan() {
        return None;
    }
    if b >= TWO_63 {
        return Some(Ordering::Less);
    }
    if b < -TWO_63 {
        return Some(Ordering::Greater);
    }
    let whole = b.trunc();
    Some(a.cmp(&(whole as i64)).then_with(|| {
        0.0_f64.partial_cmp(&(b - whole)).unwrap_or(Ordering::Equal)
    }))
}

fn checked(word: &'static str, result: Option<i64>) -> Result<Val, StackError> {
    result.map(Val::Int).ok_or(StackError::Overflow { word })
}

impl Val {
    pub fn kind(&self) -> &'static str {
        match self {
            Val::Bool(_) => "bool",
            Val::Int(_) => "int",
            Val::Real(_) => "real",
            Val::Text(_) => "text",
            Val::Quotation(_) => "quotation",
        }
    }
    pub fn add(self, other: Self) -> Result<Val, StackError> {
        match (&self, &other) {
            (Val::Text(a), Val::Text(b)) => return Ok(Val::Text(format!("{}{}", a, b).into())),
            (Val::Quotation(a), Val::Quotation(b)) => return Ok(Val::Quotation(a.concat(b))),
            _ => {}
        }
        match numbers("add", &self, &other)? {
            Numbers::Ints(a, b) => checked("add", a.checked_add(b)),
            Numbers::Reals(a, b) => Ok(Val::Real(a + b)),
        }
    }
    pub fn sub(self, other: Self) -> Result<Val, StackError> {
        match numbers("sub", &self, &other)? {
            Numbers::Ints(a, b) => checked("sub", a.checked_sub(b)),
            Numbers::Reals(a, b) => Ok(Val::Real(a - b)),
        }
    }
    pub fn mul(self, other: Self) -> Result<Val, StackError> {
        if let (Val::Text(s), Val::Int(n)) = (&self, &other) {
            let count = usize::try_from(*n).map_err(|_| {
                StackError::mismatch_pair("mul", "a count of zero or more", &self, &other)
            })?;
            return match s.len().checked_mul(count) {
                Some(len) if len <= MAX_TEXT_LEN => Ok(Val::Text(s.repeat(count).into())),
                _ => Err(StackError::Overflow { word: "mul" }),
            };
        }
        match numbers("mul", &self, &other)? {
            Numbers::Ints(a, b) => checked("mul", a.checked_mul(b)),
            Numbers::Reals(a, b) => Ok(Val::Real(a * b)),
        }
    }
    /// True division, always producing a real
    pub fn div(self, other: Self) -> Result<Val, StackError> {
        let (a, b) = match numbers("div", &self, &other)? {
            Numbers::Ints(_, 0) => return Err(StackError::DivisionByZero { word: "div" }),
            Numbers::Ints(a, b) => (a as f64, b as f64),
            Numbers::Reals(a, b) => (a, b),
        };
        Ok(Val::Real(a / b))
    }
    /// Floor division
    pub fn idiv(self, other: Self) -> Result<Val, StackError> {
        match numbers("idiv", &self, &other)? {
            Numbers::Ints(_, 0) => Err(StackError::DivisionByZero { word: "idiv" }),
            Numbers::Ints(a, b) => {
                let q = a.checked_div(b).ok_or(StackError::Overflow { word: "idiv" })?;
                Ok(Val::Int(if a % b != 0 && (a < 0) != (b < 0) { q - 1 } else { q }))
            }
            Numbers::Reals(a, b) => Ok(Val::Real((a / b).floor())),
        }
    }
    /// Floored remainder; the result takes the sign of the divisor
    pub fn rem(self, other: Self) -> Result<Val, StackError> {
        match numbers("rem", &self, &other)? {
            Numbers::Ints(_, 0) => Err(StackError::DivisionByZero { word: "rem" }),
            Numbers::Ints(a, b) => {
                let r = a.wrapping_rem(b);
                Ok(Val::Int(if r != 0 && (r < 0) != (b < 0) { r + b } else { r }))
            }
            Numbers::Reals(a, b) => {
                let r = a % b;
                Ok(Val::Real(if r != 0.0 && (r < 0.0) != (b < 0.0) { r + b } else { r }))
            }
        }
    }
    /// Equality as seen by `eq` and `ne`: numbers compare by value across
    /// ints and reals, values of different kinds are never equal
    pub fn equals(&self, other: &Self) -> bool {
        match (self, other) {
            (Val::Int(a), Val::Real(b)) | (Val::Real(b), Val::Int(a)) => {
                cmp_int_real(*a, *b) == Some(Ordering::Equal)
            }
            (a, b) => a == b,
        }
    }
    pub fn compare(&self, word: &'static str, other: &Self) -> Result<Option<Ordering>, StackError> {
        if let (Val::Text(a), Val::Text(b)) = (self, other) {
            return Ok(Some(a.cmp(b)));
        }
        match (self, other) {
            (Val::Int(a), Val::Real(b)) => return Ok(cmp_int_real(*a, *b)),
            (Val::Real(a), Val::Int(b)) => return Ok(cmp_int_real(*b, *a).map(Ordering::reverse)),
            _ => {}
        }
        Ok(match numbers(word, self, other)? {
            Numbers::Ints(a, b) => Some(a.cmp(&b)),
            Numbers::Reals(a, b) => a.partial_cmp(&b),
        })
    }
    pub fn as_bool(&self, word: &'static str) -> Result<bool, StackError> {
        match self {
            Val::Bool(b) => Ok(*b),
            val => Err(StackError::mismatch(word, "bool", val)),
        }
    }
}
