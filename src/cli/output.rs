//! Console rendering of runs: trace tables, verdict lines, diagnostics and
//! JSON records.

use std::io::{self, Write};

use bracket_automata::{
    Alphabet, InvalidAlphabet, Run, Verdict,
    automatan::{BOTTOM_NAME, EPSILON, Symbol, trace::Trace},
    loader::log::Logs,
};
use serde::Serialize;

/// How a single expression is printed.
#[derive(Clone, Copy, Debug)]
pub struct Style {
    pub json: bool,
    pub trace: bool,
}

/// The expression with brackets in place of the markers, `ε` when empty.
pub fn classical(expression: &str, alphabet: &Alphabet) -> String {
    if expression.is_empty() {
        return EPSILON.to_string();
    }
    expression
        .chars()
        .map(|c| match alphabet.letter(c) {
            Some(Symbol::Open) => '(',
            Some(Symbol::Close) => ')',
            None => c,
        })
        .collect()
}

pub fn banner(out: &mut impl Write, alphabet: &Alphabet) -> io::Result<()> {
    let rule = "=".repeat(55);
    writeln!(out, "{rule}")?;
    writeln!(out, "  DPDA - well nested bracket expressions")?;
    writeln!(
        out,
        "  Open bracket: '{}'  |  Close bracket: '{}'",
        alphabet.open(),
        alphabet.close()
    )?;
    writeln!(out, "{rule}")
}

#[derive(Serialize)]
struct Offender {
    character: char,
    position: usize,
}

#[derive(Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
enum Record<'a> {
    Completed {
        input: &'a str,
        answer: &'static str,
        verdict: Verdict,
        trace: &'a Trace,
    },
    InvalidAlphabet {
        input: &'a str,
        answer: &'static str,
        verdict: Verdict,
        message: String,
        offending: Vec<Offender>,
    },
}

/// Prints one run, or the diagnostics for a malformed expression.
pub fn print_result(
    out: &mut impl Write,
    err: &mut impl Write,
    expression: &str,
    result: &Result<Run, InvalidAlphabet>,
    alphabet: &Alphabet,
    style: Style,
) -> io::Result<()> {
    if style.json {
        return print_json(out, expression, result);
    }

    match result {
        Ok(run) => {
            if style.trace {
                writeln!(out, "{}", run.trace.display(alphabet))?;
                let closing = match (run.verdict, run.trace.last()) {
                    (Verdict::Accepted, _) => format!("End of input & {BOTTOM_NAME} on top -> ACCEPT"),
                    (Verdict::Rejected, Some(last))
                        if last.remaining.is_empty() && last.depth > 0 =>
                    {
                        format!("End of input with unmatched '{}' -> REJECT", alphabet.open())
                    }
                    (Verdict::Rejected, _) => "Reject".to_string(),
                };
                writeln!(out, "{closing}")?;
            }
        }
        Err(invalid) => print_diagnostics(err, expression, invalid)?,
    }

    let verdict = match result {
        Ok(run) => run.verdict,
        Err(invalid) => invalid.verdict(),
    };
    writeln!(out, "Result: {}", verdict.as_answer())?;
    if style.trace {
        writeln!(out)?;
    }
    Ok(())
}

/// Prints only the answer line, for runs made without a trace.
pub fn print_verdict(
    out: &mut impl Write,
    err: &mut impl Write,
    expression: &str,
    result: &Result<Verdict, InvalidAlphabet>,
) -> io::Result<()> {
    let verdict = match result {
        Ok(verdict) => *verdict,
        Err(invalid) => {
            print_diagnostics(err, expression, invalid)?;
            invalid.verdict()
        }
    };
    writeln!(out, "Result: {}", verdict.as_answer())
}

fn print_diagnostics(
    err: &mut impl Write,
    expression: &str,
    invalid: &InvalidAlphabet,
) -> io::Result<()> {
    let mut logs = Logs::new();
    invalid.report(&mut logs);
    for entry in logs.displayable_with(expression) {
        write!(err, "{entry}")?;
    }
    Ok(())
}

fn print_json(
    out: &mut impl Write,
    input: &str,
    result: &Result<Run, InvalidAlphabet>,
) -> io::Result<()> {
    let record = match result {
        Ok(run) => Record::Completed {
            input,
            answer: run.verdict.as_answer(),
            verdict: run.verdict,
            trace: &run.trace,
        },
        Err(invalid) => Record::InvalidAlphabet {
            input,
            answer: invalid.verdict().as_answer(),
            verdict: invalid.verdict(),
            message: invalid.to_string(),
            offending: invalid
                .offending
                .iter()
                .map(|s| Offender {
                    character: s.0,
                    position: s.1.0,
                })
                .collect(),
        },
    };
    serde_json::to_writer(&mut *out, &record)?;
    writeln!(out)
}
