use super::trace::Trace;
use super::*;

use crate::loader::{self, InvalidAlphabet};

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum StackOp {
    Push(StackSymbol),
    Pop,
    Keep,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct To {
    pub state: State,
    pub op: StackOp,
}

/// The transition function.
///
/// | state   | top    | symbol | result              |
/// |---------|--------|--------|---------------------|
/// | Running | Bottom | Open   | push Open, Running  |
/// | Running | Open   | Open   | push Open, Running  |
/// | Running | Open   | Close  | pop, Running        |
/// | Running | Bottom | Close  | keep, Error         |
/// | Error   | any    | any    | none                |
pub fn delta(state: State, top: StackSymbol, symbol: Symbol) -> Option<To> {
    use StackSymbol as T;
    use Symbol as S;
    match (state, top, symbol) {
        (State::Running, T::Bottom | T::Open, S::Open) => Some(To {
            state: State::Running,
            op: StackOp::Push(StackSymbol::Open),
        }),
        (State::Running, T::Open, S::Close) => Some(To {
            state: State::Running,
            op: StackOp::Pop,
        }),
        (State::Running, T::Bottom, S::Close) => Some(To {
            state: State::Error,
            op: StackOp::Keep,
        }),
        (State::Error, _, _) => None,
    }
}

/// Bottom first. Always holds exactly one `Bottom`, at index zero.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Stack(Vec<StackSymbol>);

impl Stack {
    pub fn new() -> Self {
        Self(vec![StackSymbol::Bottom])
    }

    pub fn top(&self) -> StackSymbol {
        self.0.last().copied().unwrap_or(StackSymbol::Bottom)
    }

    pub fn push(&mut self, symbol: StackSymbol) {
        if symbol == StackSymbol::Bottom {
            return;
        }
        self.0.push(symbol)
    }

    /// Never removes `Bottom`.
    pub fn pop(&mut self) -> Option<StackSymbol> {
        if self.0.len() > 1 { self.0.pop() } else { None }
    }

    pub fn depth(&self) -> usize {
        self.0.len() - 1
    }

    pub fn as_slice(&self) -> &[StackSymbol] {
        &self.0
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Configuration {
    pub stack: Stack,
    pub state: State,
    pub cursor: usize,
}

impl Configuration {
    pub fn initial() -> Self {
        Self {
            stack: Stack::new(),
            state: State::Running,
            cursor: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimulatorResult {
    Pending,
    Reject,
    Accept,
}

/// Steps the automaton over an already validated input, one snapshot per
/// call to [`Simulator::step`].
pub struct Simulator {
    config: Configuration,
    trace: Trace,
    record: bool,
    verdict: Option<Verdict>,
}

impl Simulator {
    pub fn begin(input: impl Into<Vec<Symbol>>) -> Self {
        Self {
            config: Configuration::initial(),
            trace: Trace::new(input.into()),
            record: true,
            verdict: None,
        }
    }

    /// Steps without recording snapshots; the trace stays empty.
    pub fn without_trace(mut self) -> Self {
        self.record = false;
        self
    }

    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    fn snapshot(&mut self) {
        if self.record {
            self.trace
                .record(self.config.stack.depth(), self.config.state, self.config.cursor);
        }
    }

    fn halt(&mut self, verdict: Verdict) -> SimulatorResult {
        self.verdict = Some(verdict);
        match verdict {
            Verdict::Accepted => SimulatorResult::Accept,
            Verdict::Rejected => SimulatorResult::Reject,
        }
    }

    pub fn step(&mut self) -> SimulatorResult {
        match self.verdict {
            Some(Verdict::Accepted) => return SimulatorResult::Accept,
            Some(Verdict::Rejected) => return SimulatorResult::Reject,
            None => {}
        }

        let Some(symbol) = self.trace.input().get(self.config.cursor).copied() else {
            return match self.config.stack.top() {
                StackSymbol::Bottom => {
                    self.snapshot();
                    self.halt(Verdict::Accepted)
                }
                StackSymbol::Open => {
                    log::trace!("end of input with {} open", self.config.stack.depth());
                    self.config.state = State::Error;
                    self.snapshot();
                    self.halt(Verdict::Rejected)
                }
            };
        };

        self.snapshot();
        let top = self.config.stack.top();
        let Some(to) = delta(self.config.state, top, symbol) else {
            return self.halt(Verdict::Rejected);
        };
        log::trace!(
            "delta({}, {top}, {symbol:?}) = {:?}, {}",
            self.config.state,
            to.op,
            to.state
        );

        self.config.cursor += 1;
        match to.op {
            StackOp::Push(symbol) => self.config.stack.push(symbol),
            StackOp::Pop => _ = self.config.stack.pop(),
            StackOp::Keep => {}
        }
        self.config.state = to.state;

        if self.config.state == State::Error {
            self.snapshot();
            return self.halt(Verdict::Rejected);
        }
        SimulatorResult::Pending
    }

    pub fn finish(mut self) -> (Verdict, Trace) {
        loop {
            match self.step() {
                SimulatorResult::Pending => {}
                SimulatorResult::Accept => return (Verdict::Accepted, self.trace),
                SimulatorResult::Reject => return (Verdict::Rejected, self.trace),
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Run {
    pub verdict: Verdict,
    pub trace: Trace,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Dpda {
    alphabet: Alphabet,
}

impl Dpda {
    pub fn new(alphabet: Alphabet) -> Self {
        Self { alphabet }
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn run(&self, input: &str) -> Result<Run, InvalidAlphabet> {
        let symbols = loader::load(input, &self.alphabet)?;
        let (verdict, trace) = Simulator::begin(symbols).finish();
        log::debug!(
            "{:?}: {verdict:?} after {} snapshot(s)",
            input,
            trace.len()
        );
        Ok(Run { verdict, trace })
    }

    /// Like [`Dpda::run`] but keeps no trace.
    pub fn verdict(&self, input: &str) -> Result<Verdict, InvalidAlphabet> {
        let symbols = loader::load(input, &self.alphabet)?;
        let (verdict, _) = Simulator::begin(symbols).without_trace().finish();
        log::debug!("{:?}: {verdict:?}", input);
        Ok(verdict)
    }
}

/// Runs the bracket automaton with the default `P` / `0` markers.
pub fn run(input: &str) -> Result<Run, InvalidAlphabet> {
    Dpda::default().run(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(input: &str) -> Verdict {
        run(input).unwrap().verdict
    }

    fn balanced(input: &str) -> bool {
        let mut depth = 0i64;
        for c in input.chars() {
            depth += if c == 'P' { 1 } else { -1 };
            if depth < 0 {
                return false;
            }
        }
        depth == 0
    }

    fn all_strings(max_len: usize) -> Vec<String> {
        let mut out = vec![String::new()];
        let mut layer = vec![String::new()];
        for _ in 0..max_len {
            layer = layer
                .iter()
                .flat_map(|s| [format!("{s}P"), format!("{s}0")])
                .collect();
            out.extend(layer.iter().cloned());
        }
        out
    }

    #[test]
    fn scenarios() {
        assert_eq!(verdict("PP00P0"), Verdict::Accepted);
        assert_eq!(verdict("P0P0"), Verdict::Accepted);
        assert_eq!(verdict("PPP000"), Verdict::Accepted);
        assert_eq!(verdict("0P0P"), Verdict::Rejected);
        assert_eq!(verdict("PP0"), Verdict::Rejected);
        assert_eq!(verdict(""), Verdict::Accepted);
        assert_eq!(verdict("P0P00"), Verdict::Rejected);
    }

    #[test]
    fn transition_table_is_total_on_running() {
        for top in [StackSymbol::Bottom, StackSymbol::Open] {
            for symbol in [Symbol::Open, Symbol::Close] {
                assert!(delta(State::Running, top, symbol).is_some());
                assert_eq!(delta(State::Error, top, symbol), None);
            }
        }
        assert_eq!(
            delta(State::Running, StackSymbol::Bottom, Symbol::Close),
            Some(To {
                state: State::Error,
                op: StackOp::Keep
            })
        );
        assert_eq!(
            delta(State::Running, StackSymbol::Open, Symbol::Close).map(|t| t.op),
            Some(StackOp::Pop)
        );
    }

    #[test]
    fn stack_keeps_bottom() {
        let mut stack = Stack::new();
        assert_eq!(stack.pop(), None);
        stack.push(StackSymbol::Bottom);
        assert_eq!(stack.as_slice(), &[StackSymbol::Bottom]);
        stack.push(StackSymbol::Open);
        assert_eq!(stack.top(), StackSymbol::Open);
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.pop(), Some(StackSymbol::Open));
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.top(), StackSymbol::Bottom);
    }

    #[test]
    fn accepted_iff_balanced() {
        for input in all_strings(10) {
            assert_eq!(
                verdict(&input).is_accepted(),
                balanced(&input),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn trace_has_one_snapshot_per_consumed_symbol_plus_terminal() {
        for input in all_strings(8) {
            let run = run(&input).unwrap();
            let terminal = run.trace.last().unwrap();
            let consumed = input.len() - terminal.remaining.len();
            assert_eq!(run.trace.len(), consumed + 1, "input {input:?}");
        }
    }

    #[test]
    fn bottom_is_only_at_the_base() {
        for input in all_strings(8) {
            for snapshot in &run(&input).unwrap().trace {
                let stack: Vec<_> = snapshot.stack().collect();
                assert_eq!(stack.first(), Some(&StackSymbol::Bottom));
                assert_eq!(
                    stack.iter().filter(|s| **s == StackSymbol::Bottom).count(),
                    1
                );
            }
        }
    }

    #[test]
    fn repeated_runs_are_identical() {
        for input in ["PP00P0", "0P0P", "PP0", ""] {
            assert_eq!(run(input).unwrap(), run(input).unwrap());
        }
    }

    #[test]
    fn accepted_trace() {
        let trace = run("P0").unwrap().trace;
        let stacks: Vec<usize> = trace.iter().map(|s| s.stack_len()).collect();
        assert_eq!(stacks, [1, 2, 1]);
        assert!(trace.iter().all(|s| s.state == State::Running));
        assert!(trace.last().unwrap().remaining.is_empty());
    }

    #[test]
    fn mismatch_halts_with_unconsumed_input() {
        let run = run("0P0P").unwrap();
        assert_eq!(run.verdict, Verdict::Rejected);
        assert_eq!(run.trace.len(), 2);
        let first = run.trace.get(0).unwrap();
        assert_eq!(first.state, State::Running);
        assert_eq!(first.remaining.len(), 4);
        let last = run.trace.last().unwrap();
        assert_eq!(last.state, State::Error);
        assert_eq!(
            last.remaining,
            [Symbol::Open, Symbol::Close, Symbol::Open]
        );
        assert_eq!(last.top(), StackSymbol::Bottom);
        assert_eq!(last.depth, 0);
    }

    #[test]
    fn extra_close_after_balanced_prefix() {
        let run = run("P0P00").unwrap();
        assert_eq!(run.trace.len(), 6);
        let last = run.trace.last().unwrap();
        assert_eq!(last.state, State::Error);
        assert!(last.remaining.is_empty());
    }

    #[test]
    fn leftover_open_ends_in_error() {
        let run = run("PP0").unwrap();
        assert_eq!(run.verdict, Verdict::Rejected);
        assert_eq!(run.trace.len(), 4);
        let last = run.trace.last().unwrap();
        assert_eq!(last.state, State::Error);
        assert_eq!(
            last.stack().collect::<Vec<_>>(),
            [StackSymbol::Bottom, StackSymbol::Open]
        );
        assert!(last.remaining.is_empty());
    }

    #[test]
    fn empty_input() {
        let run = run("").unwrap();
        assert_eq!(run.verdict, Verdict::Accepted);
        assert_eq!(run.trace.len(), 1);
        assert_eq!(run.trace.get(0).unwrap().depth, 0);
    }

    #[test]
    fn simulator_steps_lazily() {
        let mut sim = Simulator::begin([Symbol::Open, Symbol::Close]);
        assert_eq!(sim.step(), SimulatorResult::Pending);
        assert_eq!(sim.trace().len(), 1);
        assert_eq!(sim.configuration().stack.depth(), 1);
        assert_eq!(sim.step(), SimulatorResult::Pending);
        assert_eq!(sim.step(), SimulatorResult::Accept);
        assert_eq!(sim.trace().len(), 3);
        assert_eq!(sim.step(), SimulatorResult::Accept);
        assert_eq!(sim.trace().len(), 3);
    }

    #[test]
    fn untraced_run_agrees() {
        let dpda = Dpda::default();
        for input in all_strings(8) {
            assert_eq!(dpda.verdict(&input).unwrap(), verdict(&input), "input {input:?}");
        }
        let mut sim = Simulator::begin([Symbol::Open]).without_trace();
        assert_eq!(sim.step(), SimulatorResult::Pending);
        assert_eq!(sim.step(), SimulatorResult::Reject);
        assert!(sim.trace().is_empty());
        assert!(dpda.verdict("P?").is_err());
    }

    #[test]
    fn concurrent_runs_match_sequential() {
        let inputs = ["PP00P0", "0P0P", "PP0", "", "P0P00", "PPP000"];
        let expected: Vec<_> = inputs.iter().map(|i| run(i).unwrap()).collect();
        let dpda = Dpda::default();

        let results: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = inputs
                .iter()
                .map(|input| scope.spawn(move || dpda.run(input).unwrap()))
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .collect()
        });

        assert_eq!(results, expected);
    }

    #[test]
    fn invalid_alphabet_short_circuits() {
        for input in ["x", "PxP0", "P0P0 ", "()"] {
            let err = run(input).unwrap_err();
            assert_eq!(err.verdict(), Verdict::Rejected);
        }
    }

    #[test]
    fn custom_markers() {
        let dpda = Dpda::new(Alphabet::new('(', ')').unwrap());
        assert_eq!(dpda.run("(())()").unwrap().verdict, Verdict::Accepted);
        assert_eq!(dpda.run(")(").unwrap().verdict, Verdict::Rejected);
        assert!(dpda.run("P0").is_err());
    }
}
