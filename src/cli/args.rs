//! Command-line arguments for the `brackets` driver.

use clap::{ArgAction, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "brackets",
    version,
    about = "Recognises well nested bracket expressions with a deterministic pushdown automaton."
)]
pub struct BracketsArgs {
    /// Character standing for an opening bracket.
    #[arg(long, global = true, default_value_t = 'P')]
    pub open: char,

    /// Character standing for a closing bracket.
    #[arg(long, global = true, default_value_t = '0')]
    pub close: char,

    /// Print one JSON record per expression instead of tables.
    #[arg(long, global = true)]
    pub json: bool,

    /// Only print the verdict.
    #[arg(long, global = true)]
    pub no_trace: bool,

    /// More log output, repeatable.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Silence all log output.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Without a subcommand the demo table runs, followed by the prompt.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the built-in example table.
    Demo,
    /// Run the given expressions once each.
    Run {
        #[arg(required = true)]
        expressions: Vec<String>,
    },
    /// Read expressions from standard input until an empty line.
    Repl,
}

impl BracketsArgs {
    pub fn log_level(&self) -> log::LevelFilter {
        if self.quiet {
            return log::LevelFilter::Off;
        }
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}
