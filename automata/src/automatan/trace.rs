use std::fmt::Display;

use super::*;

/// What the trace keeps per configuration. The stack is always `Bottom`
/// followed by `depth` opens, and the remaining input is the tail of
/// [`Trace::input`] from `cursor`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
struct Step {
    depth: usize,
    state: State,
    cursor: usize,
}

/// One configuration as seen before a transition fires, or at
/// termination. Borrowed from a [`Trace`].
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Snapshot<'a> {
    /// Opens above `Bottom`.
    pub depth: usize,
    pub state: State,
    pub remaining: &'a [Symbol],
}

impl<'a> Snapshot<'a> {
    /// Bottom first.
    pub fn stack(&self) -> impl Iterator<Item = StackSymbol> + use<> {
        std::iter::once(StackSymbol::Bottom)
            .chain(std::iter::repeat_n(StackSymbol::Open, self.depth))
    }

    pub fn stack_len(&self) -> usize {
        self.depth + 1
    }

    pub fn top(&self) -> StackSymbol {
        if self.depth == 0 {
            StackSymbol::Bottom
        } else {
            StackSymbol::Open
        }
    }
}

/// Every snapshot of one run. The input is held once; each snapshot costs a
/// fixed number of words.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Trace {
    input: Vec<Symbol>,
    steps: Vec<Step>,
}

impl Trace {
    pub fn new(input: Vec<Symbol>) -> Self {
        Self {
            input,
            steps: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, depth: usize, state: State, cursor: usize) {
        self.steps.push(Step {
            depth,
            state,
            cursor,
        });
    }

    pub fn input(&self) -> &[Symbol] {
        &self.input
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Snapshot<'_>> {
        self.steps.get(index).map(|step| self.view(step))
    }

    pub fn last(&self) -> Option<Snapshot<'_>> {
        self.steps.last().map(|step| self.view(step))
    }

    pub fn iter(&self) -> Snapshots<'_> {
        Snapshots {
            input: &self.input,
            steps: self.steps.iter(),
        }
    }

    fn view(&self, step: &Step) -> Snapshot<'_> {
        Snapshot {
            depth: step.depth,
            state: step.state,
            remaining: &self.input[step.cursor..],
        }
    }

    pub fn display<'a>(&'a self, alphabet: &'a Alphabet) -> TraceDisplay<'a> {
        TraceDisplay {
            trace: self,
            alphabet,
        }
    }
}

pub struct Snapshots<'a> {
    input: &'a [Symbol],
    steps: std::slice::Iter<'a, Step>,
}

impl<'a> Iterator for Snapshots<'a> {
    type Item = Snapshot<'a>;

    fn next(&mut self) -> Option<Snapshot<'a>> {
        let step = self.steps.next()?;
        Some(Snapshot {
            depth: step.depth,
            state: step.state,
            remaining: &self.input[step.cursor..],
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.steps.size_hint()
    }
}

impl ExactSizeIterator for Snapshots<'_> {}

impl<'a> IntoIterator for &'a Trace {
    type Item = Snapshot<'a>;
    type IntoIter = Snapshots<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Snapshot<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        struct Stack(usize);
        impl serde::Serialize for Stack {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_seq(
                    std::iter::once(StackSymbol::Bottom)
                        .chain(std::iter::repeat_n(StackSymbol::Open, self.0)),
                )
            }
        }

        let mut s = serializer.serialize_struct("Snapshot", 3)?;
        s.serialize_field("stack", &Stack(self.depth))?;
        s.serialize_field("state", &self.state)?;
        s.serialize_field("remaining", self.remaining)?;
        s.end()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Trace {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

const STACK_WIDTH: usize = 20;
const STATE_WIDTH: usize = 10;

/// Renders a [`Trace`] as a three column table.
pub struct TraceDisplay<'a> {
    trace: &'a Trace,
    alphabet: &'a Alphabet,
}

impl<'a> TraceDisplay<'a> {
    fn header() -> String {
        format!(
            "{:<STACK_WIDTH$} {:<STATE_WIDTH$} {}",
            "Stack", "State", "Remaining input"
        )
    }

    /// Dashed line as wide as the header.
    pub fn separator() -> String {
        "-".repeat(Self::header().chars().count())
    }

    pub fn row(&self, snapshot: &Snapshot<'_>) -> String {
        let stack = snapshot
            .stack()
            .map(|s| self.alphabet.stack_name(s))
            .collect::<Vec<_>>()
            .join(", ");
        let remaining = if snapshot.remaining.is_empty() {
            EPSILON.to_string()
        } else {
            self.alphabet.spell(snapshot.remaining)
        };
        format!(
            "{:<STACK_WIDTH$} {:<STATE_WIDTH$} {remaining}",
            format!("[{stack}]"),
            snapshot.state.to_string(),
        )
    }
}

impl<'a> Display for TraceDisplay<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", Self::header())?;
        writeln!(f, "{}", Self::separator())?;
        for snapshot in self.trace {
            writeln!(f, "{}", self.row(&snapshot))?;
        }
        write!(f, "{}", Self::separator())
    }
}
