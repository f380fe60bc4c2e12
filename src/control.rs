//! Control combinators built on [`call`].
//!
//! Both are ordinary words: they take their quotations off the stack, so
//! they compose with every other word.

use tracing::trace;

use crate::{
    stack::{call, pop_bool, pop_quotation, require},
    transform::Transformation,
    value::{Quotation, Stack, StackError, StackResult, Val, Word},
};

/// `[cond] [then] [else] ifte`
///
/// Runs `cond` against the stack, pops the boolean it leaves, and runs the
/// matching branch against what remains.
pub fn ifte() -> Word {
    Transformation::named("ifte", |mut stack: Stack| {
        require(&stack, "ifte", 3)?;
        let otherwise = pop_quotation(&mut stack, "ifte")?;
        let then = pop_quotation(&mut stack, "ifte")?;
        let cond = pop_quotation(&mut stack, "ifte")?;
        let mut stack = call(stack, &cond)?;
        let branch = if pop_bool(&mut stack, "ifte")? {
            then
        } else {
            otherwise
        };
        call(stack, &branch)
    })
}

struct Binrec {
    case: Quotation,
    leave: Quotation,
    left: Quotation,
    right: Quotation,
    merge: Quotation,
}

/// `[case] [leave] [left] [right] [merge] binrec`
///
/// Divide and conquer over the value on top of the stack:
///
/// 1. `case` tests the value and leaves a boolean, which is popped and
///    replaced by the value again.
/// 2. If it was true, `leave` runs against the value and produces the result.
/// 3. Otherwise `left` derives a subvalue which is solved recursively, then a
///    fresh copy of the value is pushed, `right` derives a second subvalue
///    which is solved recursively, and `merge` combines the two results.
///
/// Recursion happens on the host call stack, one frame per level of the
/// induced call tree.
pub fn binrec() -> Word {
    Transformation::named("binrec", |mut stack: Stack| {
        require(&stack, "binrec", 6)?;
        let merge = pop_quotation(&mut stack, "binrec")?;
        let right = pop_quotation(&mut stack, "binrec")?;
        let left = pop_quotation(&mut stack, "binrec")?;
        let leave = pop_quotation(&mut stack, "binrec")?;
        let case = pop_quotation(&mut stack, "binrec")?;
        let value = stack.last().cloned().expect("depth checked");
        let rec = Binrec {
            case,
            leave,
            left,
            right,
            merge,
        };
        rec.run(stack, value, 0)
    })
}

impl Binrec {
    fn run(&self, stack: Stack, value: Val, depth: usize) -> StackResult {
        trace!(target: "concatenative::control", %value, depth, "binrec");
        let mut stack = call(stack, &self.case)?;
        let can_leave = pop_bool(&mut stack, "binrec")?;
        stack.push(value.clone());
        if can_leave {
            return call(stack, &self.leave);
        }

        let stack = call(stack, &self.left)?;
        let sub = top(&stack)?;
        let mut stack = self.run(stack, sub, depth + 1)?;

        stack.push(value);
        let stack = call(stack, &self.right)?;
        let sub = top(&stack)?;
        let stack = self.run(stack, sub, depth + 1)?;

        call(stack, &self.merge)
    }
}

fn top(stack: &Stack) -> Result<Val, StackError> {
    require(stack, "binrec", 1)?;
    Ok(stack[stack.len() - 1].clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        quotation,
        stack::{add, dup, gt, idiv, lt, mul, pop, push, sub},
    };

    fn fib() -> Word {
        push(quotation![3, lt()])
            | push(quotation![pop(), 1])
            | push(quotation![1, sub()])
            | push(quotation![2, sub()])
            | push(quotation![add()])
            | binrec()
    }

    #[test]
    fn binrec_fibonacci() {
        let expected = [1, 1, 2, 3, 5, 8, 13, 21, 34, 55];
        for (n, fib_n) in (1..).zip(expected) {
            assert_eq!(
                (push(n) | fib()).apply(Stack::new()),
                Ok(vec![Val::Int(fib_n)]),
                "fib {}",
                n
            );
        }
    }

    #[test]
    fn binrec_base_case_leaves_directly() {
        let leave_calls = std::rc::Rc::new(std::cell::Cell::new(0));
        let counter = std::rc::Rc::clone(&leave_calls);
        let counted_leave = Transformation::named("count", move |stack: Stack| {
            counter.set(counter.get() + 1);
            Ok(stack)
        });
        let word = push(2)
            | push(quotation![3, lt()])
            | push(quotation![counted_leave, pop(), 1])
            | push(quotation![1, sub()])
            | push(quotation![2, sub()])
            | push(quotation![add()])
            | binrec();
        assert_eq!(word.apply(Stack::new()), Ok(vec![Val::Int(1)]));
        assert_eq!(leave_calls.get(), 1);
    }

    #[test]
    fn binrec_keeps_what_lies_below() {
        let word = push("below") | push(6) | fib();
        assert_eq!(
            word.apply(Stack::new()),
            Ok(vec![Val::from("below"), Val::Int(8)])
        );
    }

    #[test]
    fn binrec_counts_leaves_of_a_halving_tree() {
        // splits n into n/2 and n - n/2 until 1, so the result is n itself
        let word = push(quotation![2, lt()])
            | push(quotation![])
            | push(quotation![2, idiv()])
            | push(quotation![dup(), 2, idiv(), sub()])
            | push(quotation![add()])
            | binrec();
        for n in [1, 2, 7, 64, 100] {
            assert_eq!(word.apply(vec![Val::Int(n)]), Ok(vec![Val::Int(n)]));
        }
    }

    #[test]
    fn binrec_needs_quotations_and_a_value() {
        let short = push(quotation![]) | push(quotation![]) | binrec();
        assert!(matches!(
            short.apply(Stack::new()),
            Err(StackError::StackUnderflow { word: "binrec", needed: 6, found: 2 })
        ));
        let wrong = push(1) | push(2) | push(3) | push(4) | push(5) | push(6) | binrec();
        assert_eq!(
            wrong.apply(Stack::new()),
            Err(StackError::mismatch("binrec", "quotation", &Val::Int(6)))
        );
    }

    #[test]
    fn binrec_case_must_leave_a_bool() {
        let word = push(5)
            | push(quotation![])
            | push(quotation![])
            | push(quotation![])
            | push(quotation![])
            | push(quotation![])
            | binrec();
        assert_eq!(
            word.apply(Stack::new()),
            Err(StackError::mismatch("binrec", "bool", &Val::Int(5)))
        );
    }

    #[test]
    fn ifte_picks_a_branch() {
        let sign = push(quotation![0, gt()])
            | push(quotation!["pos"])
            | push(quotation!["neg"])
            | ifte();
        assert_eq!(sign.apply(vec![Val::Int(-3)]), Ok(vec![Val::from("neg")]));
        assert_eq!(sign.apply(vec![Val::Int(3)]), Ok(vec![Val::from("pos")]));
    }

    #[test]
    fn ifte_condition_may_preserve_its_input() {
        let square_if_small = push(quotation![dup(), 10, lt()])
            | push(quotation![dup(), mul()])
            | push(quotation![])
            | ifte();
        assert_eq!(square_if_small.apply(vec![Val::Int(4)]), Ok(vec![Val::Int(16)]));
        assert_eq!(square_if_small.apply(vec![Val::Int(40)]), Ok(vec![Val::Int(40)]));
    }

    #[test]
    fn ifte_faults() {
        assert!(matches!(
            ifte().apply(Stack::new()),
            Err(StackError::StackUnderflow { word: "ifte", needed: 3, found: 0 })
        ));
        let not_bool = push(quotation![1]) | push(quotation![]) | push(quotation![]) | ifte();
        assert_eq!(
            not_bool.apply(Stack::new()),
            Err(StackError::mismatch("ifte", "bool", &Val::Int(1)))
        );
    }
}
