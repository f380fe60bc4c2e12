use clap::{ArgAction, Parser, Subcommand};
use itertools::Itertools;
use tracing::{info, Level};

use concatenative::{
    attempt::{map_or_else, select, try_map},
    control::binrec,
    debug::debug,
    inspect, operator, prompt::prompt, quotation,
    stack::{add, lift, lt, pop, push, sub},
    Pipe, Stack, Word,
};

fn main() -> anyhow::Result<()> {
    color_backtrace::install();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(match cli.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        })
        .with_writer(std::io::stderr)
        .init();

    match cli.app {
        App::Fib { n } => {
            let mut program = push(n) | fib() | lift(inspect(print_stack));
            if cli.trace_words {
                program = debug(program);
            }
            #[cfg(feature = "debug")]
            println!("{}", program);
            let stack = Stack::new().pipe(&program)?;
            info!(depth = stack.len(), "fib finished");
        }
        App::Guess { answer } => guess(answer),
    }
    Ok(())
}

#[derive(Parser)]
#[clap(about = "Run concatenative demo programs")]
struct Cli {
    /// Log more (repeat for more detail)
    #[clap(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Log the program's input stack and its outcome
    #[clap(long, global = true)]
    trace_words: bool,
    #[clap(subcommand)]
    app: App,
}

#[derive(Subcommand)]
enum App {
    /// Compute a Fibonacci number with `binrec`
    #[clap(alias = "f")]
    Fib { n: i64 },
    /// Guess the number
    #[clap(alias = "g")]
    Guess {
        #[clap(long, default_value = "42")]
        answer: i64,
    },
}

fn fib() -> Word {
    push(quotation![3, lt()])
        | push(quotation![pop(), 1])
        | push(quotation![1, sub()])
        | push(quotation![2, sub()])
        | push(quotation![add()])
        | binrec()
}

fn print_stack(stack: &Stack) {
    println!("{}", stack.iter().join(" "));
}

fn guess(answer: i64) {
    let is_answer = operator::eq(answer);
    let check = select::<_, anyhow::Error, _>(move |n: &i64| is_answer.apply(*n))
        | map_or_else(|_| println!("right guess"), || println!("wrong guess"));
    let game = prompt()
        | try_map(|line: String| line.trim().parse::<i64>())
        | map_or_else(check.into_fn(), || println!("invalid number"));
    String::from("enter a number: ").pipe(&game)
}
