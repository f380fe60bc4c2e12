//! Stack words and the dispatch loop.
//!
//! Every word is a [`Word`]: it takes the stack by value and hands it back,
//! or faults with a [`StackError`]. [`call`] runs a [`Quotation`] against a
//! stack, pushing literals and applying operations in order.

use std::ops::BitOr;

use tracing::trace;

use crate::{
    transform::Transformation,
    value::{Instr, Quotation, Stack, StackError, StackResult, Val, Word},
};

/// Build a [`Quotation`] from literals and words.
///
/// ```
/// use concatenative::{quotation, stack::lt};
/// let case = quotation![3, lt()];
/// assert_eq!(case.to_string(), "[3 lt]");
/// ```
#[macro_export]
macro_rules! quotation {
    ($($instr:expr),* $(,)?) => {
        <$crate::value::Quotation as ::std::iter::FromIterator<$crate::value::Instr>>::from_iter(
            ::std::vec![$($crate::value::Instr::from($instr)),*]
        )
    };
}

/// Words chain through the fault channel
impl BitOr<Word> for Word {
    type Output = Word;
    fn bitor(self, next: Word) -> Word {
        self.and_then(next)
    }
}

pub fn call(mut stack: Stack, quotation: &Quotation) -> StackResult {
    for instr in quotation.iter() {
        trace!(target: "concatenative::stack", depth = stack.len(), %instr, "dispatch");
        match instr {
            Instr::Literal(val) => stack.push(val.clone()),
            Instr::Operation(word) => stack = word.apply(stack)?,
        }
    }
    Ok(stack)
}

/// The word that runs `quotation` against the stack
pub fn apply(quotation: Quotation) -> Word {
    let name = format!("apply {}", quotation);
    Transformation::named(name, move |stack| call(stack, &quotation))
}

pub fn push<V: Into<Val>>(val: V) -> Word {
    let val = val.into();
    Transformation::named(format!("push {}", val), move |mut stack: Stack| {
        stack.push(val.clone());
        Ok(stack)
    })
}

/// Turn an infallible stack transformation into a word
pub fn lift(transformation: Transformation<Stack, Stack>) -> Word {
    let name = transformation.name().to_owned();
    Transformation::named(name, move |stack| Ok(transformation.apply(stack)))
}

pub fn nop() -> Word {
    Transformation::named("nop", Ok)
}

pub(crate) fn require(stack: &Stack, word: &'static str, needed: usize) -> Result<(), StackError> {
    if stack.len() < needed {
        Err(StackError::StackUnderflow {
            word,
            needed,
            found: stack.len(),
        })
    } else {
        Ok(())
    }
}

pub(crate) fn pop_quotation(
    stack: &mut Stack,
    word: &'static str,
) -> Result<Quotation, StackError> {
    require(stack, word, 1)?;
    match stack.pop() {
        Some(Val::Quotation(quotation)) => Ok(quotation),
        Some(val) => Err(StackError::mismatch(word, "quotation", &val)),
        None => unreachable!("depth checked"),
    }
}

pub(crate) fn pop_bool(stack: &mut Stack, word: &'static str) -> Result<bool, StackError> {
    require(stack, word, 1)?;
    match stack.pop() {
        Some(val) => val.as_bool(word),
        None => unreachable!("depth checked"),
    }
}

fn top_mut<'a>(stack: &'a mut Stack, word: &'static str) -> Result<&'a mut Val, StackError> {
    let found = stack.len();
    stack.last_mut().ok_or(StackError::StackUnderflow {
        word,
        needed: 1,
        found,
    })
}

/// Pop the right operand and combine it with the new top
fn binary<F>(stack: &mut Stack, word: &'static str, op: F) -> Result<(), StackError>
where
    F: FnOnce(Val, Val) -> Result<Val, StackError>,
{
    require(stack, word, 2)?;
    let right = stack.pop().expect("depth checked");
    let left = stack.pop().expect("depth checked");
    stack.push(op(left, right)?);
    Ok(())
}

macro_rules! binops {
    ($($name:ident => $op:expr),* $(,)?) => {
        $(pub fn $name() -> Word {
            Transformation::named(stringify!($name), |mut stack: Stack| {
                binary(&mut stack, stringify!($name), $op)?;
                Ok(stack)
            })
        })*
    }
}

binops!(
    add => Val::add,
    sub => Val::sub,
    mul => Val::mul,
    div => Val::div,
    idiv => Val::idiv,
    rem => Val::rem,
);

macro_rules! comparisons {
    ($($name:ident => $test:expr),* $(,)?) => {
        $(pub fn $name() -> Word {
            Transformation::named(stringify!($name), |mut stack: Stack| {
                binary(&mut stack, stringify!($name), |left, right| {
                    let ordering = left.compare(stringify!($name), &right)?;
                    Ok(Val::Bool(ordering.map_or(false, $test)))
                })?;
                Ok(stack)
            })
        })*
    }
}

comparisons!(
    lt => |o| o.is_lt(),
    le => |o| o.is_le(),
    gt => |o| o.is_gt(),
    ge => |o| o.is_ge(),
);

pub fn eq() -> Word {
    Transformation::named("eq", |mut stack: Stack| {
        binary(&mut stack, "eq", |left, right| Ok(Val::Bool(left.equals(&right))))?;
        Ok(stack)
    })
}

pub fn ne() -> Word {
    Transformation::named("ne", |mut stack: Stack| {
        binary(&mut stack, "ne", |left, right| Ok(Val::Bool(!left.equals(&right))))?;
        Ok(stack)
    })
}

pub fn boolean_and() -> Word {
    Transformation::named("boolean_and", |mut stack: Stack| {
        binary(&mut stack, "boolean_and", |left, right| {
            Ok(Val::Bool(left.as_bool("boolean_and")? && right.as_bool("boolean_and")?))
        })?;
        Ok(stack)
    })
}

pub fn boolean_or() -> Word {
    Transformation::named("boolean_or", |mut stack: Stack| {
        binary(&mut stack, "boolean_or", |left, right| {
            Ok(Val::Bool(left.as_bool("boolean_or")? || right.as_bool("boolean_or")?))
        })?;
        Ok(stack)
    })
}

pub fn boolean_not() -> Word {
    Transformation::named("boolean_not", |mut stack: Stack| {
        let top = top_mut(&mut stack, "boolean_not")?;
        *top = Val::Bool(!top.as_bool("boolean_not")?);
        Ok(stack)
    })
}

pub fn dup() -> Word {
    Transformation::named("dup", |mut stack: Stack| {
        let top = top_mut(&mut stack, "dup")?.clone();
        stack.push(top);
        Ok(stack)
    })
}

pub fn over() -> Word {
    Transformation::named("over", |mut stack: Stack| {
        require(&stack, "over", 2)?;
        let second = stack[stack.len() - 2].clone();
        stack.push(second);
        Ok(stack)
    })
}

pub fn pop() -> Word {
    Transformation::named("pop", |mut stack: Stack| {
        require(&stack, "pop", 1)?;
        stack.pop();
        Ok(stack)
    })
}

pub fn nip() -> Word {
    Transformation::named("nip", |mut stack: Stack| {
        require(&stack, "nip", 2)?;
        let second = stack.len() - 2;
        stack.remove(second);
        Ok(stack)
    })
}

pub fn swap() -> Word {
    Transformation::named("swap", |mut stack: Stack| {
        require(&stack, "swap", 2)?;
        let len = stack.len();
        stack.swap(len - 1, len - 2);
        Ok(stack)
    })
}

pub fn quote() -> Word {
    Transformation::named("quote", |mut stack: Stack| {
        let top = top_mut(&mut stack, "quote")?;
        let val = std::mem::replace(top, Val::Bool(false));
        *top = Val::Quotation(Quotation::new().with(val));
        Ok(stack)
    })
}

pub fn unquote() -> Word {
    Transformation::named("unquote", |mut stack: Stack| {
        let quotation = pop_quotation(&mut stack, "unquote")?;
        call(stack, &quotation)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{inspect, Pipe};

    fn run(word: Word) -> StackResult {
        word.apply(Stack::new())
    }

    fn ints(values: &[i64]) -> Stack {
        values.iter().copied().map(Val::Int).collect()
    }

    #[test]
    fn push_push_add() {
        assert_eq!(run(push(2) | push(3) | add()), Ok(ints(&[5])));
    }

    #[test]
    fn push_push_sub() {
        assert_eq!(run(push(4) | push(2) | sub()), Ok(ints(&[2])));
    }

    #[test]
    fn arithmetic_takes_the_top_as_right_operand() {
        let stack = ints(&[1, 10, 4]);
        assert_eq!(mul().apply(stack.clone()), Ok(ints(&[1, 40])));
        assert_eq!(idiv().apply(stack.clone()), Ok(ints(&[1, 2])));
        assert_eq!(rem().apply(stack.clone()), Ok(ints(&[1, 2])));
        assert_eq!(div().apply(stack), Ok(vec![Val::Int(1), Val::Real(2.5)]));
    }

    #[test]
    fn comparisons_and_booleans() {
        let check = |word: Word, left: i64, right: i64| {
            word.apply(ints(&[left, right])).unwrap() == vec![Val::Bool(true)]
        };
        assert!(check(lt(), 1, 2));
        assert!(check(le(), 2, 2));
        assert!(check(gt(), 3, 2));
        assert!(check(ge(), 2, 2));
        assert!(check(eq(), 2, 2));
        assert!(check(ne(), 2, 3));
        assert!(!check(lt(), 2, 1));

        let both = push(true) | push(false) | boolean_and();
        assert_eq!(run(both), Ok(vec![Val::Bool(false)]));
        let either = push(true) | push(false) | boolean_or();
        assert_eq!(run(either), Ok(vec![Val::Bool(true)]));
        assert_eq!(run(push(false) | boolean_not()), Ok(vec![Val::Bool(true)]));
    }

    #[test]
    fn booleans_are_not_coerced() {
        let error = run(push(1) | boolean_not()).unwrap_err();
        assert_eq!(error, StackError::mismatch("boolean_not", "bool", &Val::Int(1)));
    }

    #[test]
    fn underflow_on_short_stacks() {
        let binary_words = [add(), sub(), swap(), over(), nip(), mul(), lt(), boolean_and()];
        for word in binary_words {
            let name = word.name().to_owned();
            for depth in 0..2 {
                let stack = ints(&[7; 2][..depth]);
                assert!(
                    matches!(
                        word.apply(stack),
                        Err(StackError::StackUnderflow { needed: 2, found, .. }) if found == depth
                    ),
                    "{} at depth {}",
                    name,
                    depth
                );
            }
        }
        for word in [pop(), dup(), boolean_not(), quote(), unquote()] {
            let name = word.name().to_owned();
            assert!(
                matches!(run(word), Err(StackError::StackUnderflow { needed: 1, found: 0, .. })),
                "{}",
                name
            );
        }
    }

    #[test]
    fn shape_words() {
        let stack = ints(&[1, 2]);
        assert_eq!(dup().apply(stack.clone()), Ok(ints(&[1, 2, 2])));
        assert_eq!(over().apply(stack.clone()), Ok(ints(&[1, 2, 1])));
        assert_eq!(pop().apply(stack.clone()), Ok(ints(&[1])));
        assert_eq!(nip().apply(stack.clone()), Ok(ints(&[2])));
        assert_eq!(swap().apply(stack), Ok(ints(&[2, 1])));
    }

    #[test]
    fn quote_then_unquote_round_trips() {
        let literals: Vec<Val> = vec![
            Val::Int(9),
            Val::Real(-0.5),
            Val::from("text"),
            Val::Bool(true),
            Val::from(quotation![1, add()]),
        ];
        for val in literals {
            let pushed = run(push(val.clone())).unwrap();
            let round = run(push(val) | quote() | unquote()).unwrap();
            assert_eq!(round, pushed);
        }
    }

    #[test]
    fn quote_wraps_the_top() {
        let stack = run(push(1) | quote()).unwrap();
        assert_eq!(stack, vec![Val::from(quotation![1])]);
        assert_eq!(stack[0].to_string(), "[1]");
    }

    #[test]
    fn unquote_splices_into_the_current_stack() {
        let word = push(10) | push(quotation![dup(), mul(), 1, sub()]) | unquote();
        assert_eq!(run(word), Ok(ints(&[99])));
        let error = run(push(1) | unquote()).unwrap_err();
        assert_eq!(error, StackError::mismatch("unquote", "quotation", &Val::Int(1)));
    }

    #[test]
    fn call_runs_literals_and_operations_in_order() {
        let program = quotation![2, 3, add(), 4, mul()];
        assert_eq!(call(Stack::new(), &program), Ok(ints(&[20])));
        assert_eq!(apply(program).apply(ints(&[1])), Ok(ints(&[1, 20])));
    }

    #[test]
    fn faults_stop_the_call() {
        let program = quotation![1, 0, idiv(), 5];
        assert_eq!(
            call(Stack::new(), &program),
            Err(StackError::DivisionByZero { word: "idiv" })
        );
    }

    #[test]
    fn word_composition_laws() {
        let a = push(3);
        let b = dup();
        let c = mul();
        let left = (a.clone() | b.clone()) | c.clone();
        let right = a.clone() | (b | c);
        for depth in 0..3 {
            let stack = ints(&[1, 2, 3][..depth]);
            assert_eq!(left.apply(stack.clone()), right.apply(stack.clone()));
            assert_eq!((nop() | a.clone()).apply(stack.clone()), a.apply(stack.clone()));
            assert_eq!((a.clone() | nop()).apply(stack.clone()), a.apply(stack));
        }
    }

    #[test]
    fn lifted_observers() {
        let seen = std::rc::Rc::new(std::cell::Cell::new(0));
        let depth = std::rc::Rc::clone(&seen);
        let observe = lift(inspect(move |s: &Stack| depth.set(s.len())));
        let program = push(1) | push(2) | observe | add();
        assert_eq!(Stack::new().pipe(&program), Ok(ints(&[3])));
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn names() {
        assert_eq!((push(2) | push("x") | add()).name(), "push 2 | push \"x\" | add");
        assert_eq!(apply(quotation![1, dup()]).name(), "apply [1 dup]");
    }
}
