//! The `brackets` driver: feeds expressions to the automaton and renders
//! what comes back.

use std::io::{self, BufRead, Write};

use bracket_automata::{Alphabet, Dpda};
use clap::Parser;

use crate::cli::args::{BracketsArgs, Command};
use crate::cli::output::Style;

pub mod args;
pub mod output;

/// Expressions run by `demo`, in the default `P` / `0` markers.
pub const DEMO: [&str; 7] = ["PP00P0", "P0P0", "PPP000", "0P0P", "PP0", "", "P0P00"];

/// Process exit status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Ok,
    Malformed,
}

impl Status {
    pub fn code(self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::Malformed => 2,
        }
    }

    fn and(self, other: Status) -> Status {
        if self == Status::Malformed { self } else { other }
    }
}

pub fn init_logger(level: log::LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init()
        .ok();
}

pub fn run() -> Result<Status, Box<dyn std::error::Error>> {
    let args = BracketsArgs::parse();
    init_logger(args.log_level());

    let alphabet = Alphabet::new(args.open, args.close)?;
    let session = Session {
        dpda: Dpda::new(alphabet),
        style: Style {
            json: args.json,
            trace: !args.no_trace,
        },
    };
    log::info!("markers {alphabet}");

    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut out = stdout.lock();
    let mut err = stderr.lock();

    let status = match args.command {
        Some(Command::Demo) => session.demo(&mut out, &mut err)?,
        Some(Command::Run { expressions }) => {
            let mut status = Status::Ok;
            for expression in &expressions {
                status = status.and(session.evaluate(&mut out, &mut err, expression)?);
            }
            status
        }
        Some(Command::Repl) => session.repl(io::stdin().lock(), &mut out, &mut err)?,
        None => {
            let status = session.demo(&mut out, &mut err)?;
            status.and(session.repl(io::stdin().lock(), &mut out, &mut err)?)
        }
    };
    out.flush()?;
    Ok(status)
}

pub struct Session {
    pub dpda: Dpda,
    pub style: Style,
}

impl Session {
    pub fn evaluate(
        &self,
        out: &mut impl Write,
        err: &mut impl Write,
        expression: &str,
    ) -> io::Result<Status> {
        let malformed = if self.style.json || self.style.trace {
            let result = self.dpda.run(expression);
            output::print_result(out, err, expression, &result, self.dpda.alphabet(), self.style)?;
            result.is_err()
        } else {
            let result = self.dpda.verdict(expression);
            output::print_verdict(out, err, expression, &result)?;
            result.is_err()
        };
        Ok(if malformed { Status::Malformed } else { Status::Ok })
    }

    /// Runs [`DEMO`], translated into the session's markers.
    pub fn demo(&self, out: &mut impl Write, err: &mut impl Write) -> io::Result<Status> {
        let alphabet = self.dpda.alphabet();
        if !self.style.json {
            output::banner(out, alphabet)?;
            writeln!(out, "\n=== Running examples ===\n")?;
        }

        let mut status = Status::Ok;
        for expression in DEMO {
            let expression: String = expression
                .chars()
                .map(|c| match c {
                    Alphabet::DEFAULT_OPEN => alphabet.open(),
                    _ => alphabet.close(),
                })
                .collect();
            if !self.style.json {
                let shown = if expression.is_empty() {
                    bracket_automata::automatan::EPSILON
                } else {
                    expression.as_str()
                };
                writeln!(
                    out,
                    ">>> Expression: '{shown}'  (classical: '{}')",
                    output::classical(&expression, alphabet)
                )?;
            }
            status = status.and(self.evaluate(out, err, &expression)?);
        }

        if !self.style.json {
            writeln!(out, "=== Examples done ===")?;
        }
        Ok(status)
    }

    /// Prompts for expressions until an empty line or end of input.
    pub fn repl(
        &self,
        input: impl BufRead,
        out: &mut impl Write,
        err: &mut impl Write,
    ) -> io::Result<Status> {
        let mut status = Status::Ok;
        let mut lines = input.lines();
        loop {
            if !self.style.json {
                write!(out, "Expression: ")?;
                out.flush()?;
            }
            let Some(line) = lines.next().transpose()? else {
                break;
            };
            let expression = line.trim();
            if expression.is_empty() {
                break;
            }
            status = status.and(self.evaluate(out, err, expression)?);
        }
        if !self.style.json {
            writeln!(out, "\nBye.")?;
        }
        Ok(status)
    }
}
