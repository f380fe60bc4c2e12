use std::{
    cell::RefCell,
    io::{self, BufRead, Write},
};

use anyhow::{bail, Context};

use crate::{attempt::guard, transform::Transformation, tristate::TriState};

/// Show the input as a message and read one line from standard input
pub fn prompt() -> Transformation<String, TriState<String>> {
    prompt_from(io::stdin().lock(), io::stdout())
}

/// Like [`prompt`], but over an arbitrary reader and writer.
///
/// The line ending is stripped. Running out of input is an `Error`, as is any
/// I/O failure.
pub fn prompt_from<R, W>(reader: R, writer: W) -> Transformation<String, TriState<String>>
where
    R: BufRead + 'static,
    W: Write + 'static,
{
    let streams = RefCell::new((reader, writer));
    Transformation::named("prompt", move |message: String| {
        guard(|| {
            let mut streams = streams.borrow_mut();
            let (reader, writer) = &mut *streams;
            write!(writer, "{}", message).context("failed to write prompt")?;
            writer.flush().context("failed to write prompt")?;
            let mut line = String::new();
            if reader.read_line(&mut line).context("failed to read input")? == 0 {
                bail!("end of input");
            }
            let trimmed = line.trim_end_matches(&['\r', '\n'][..]).len();
            line.truncate(trimmed);
            Ok(line)
        })
    })
}
