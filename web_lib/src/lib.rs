use bracket_automata::{
    Alphabet, Dpda,
    loader::log::{LogSink, Logs},
};

use wasm_bindgen::prelude::wasm_bindgen;

#[wasm_bindgen]
pub fn init() {
    console_error_panic_hook::set_once();
}

#[wasm_bindgen]
#[derive(Clone, Copy)]
pub enum Verdict {
    Accepted = "accepted",
    Rejected = "rejected",
}

#[wasm_bindgen(getter_with_clone)]
#[derive(Clone)]
pub struct Diagnostic {
    pub message: String,
    pub start: Option<usize>,
    pub end: Option<usize>,
}

#[wasm_bindgen(getter_with_clone)]
pub struct SimulateResult {
    pub verdict: Verdict,
    pub malformed: bool,
    pub log: Vec<Diagnostic>,
    pub ansi_log: String,
    pub table: Option<String>,
    pub trace: Option<String>,
}

/// Runs `input` with the given markers, returning the trace as JSON and as
/// a rendered table. Offsets in `log` are UTF-16 so they line up with
/// JavaScript strings.
#[wasm_bindgen]
pub fn simulate(input: &str, open: char, close: char) -> SimulateResult {
    let mut logs = Logs::new();
    let alphabet = match Alphabet::new(open, close) {
        Ok(alphabet) => alphabet,
        Err(err) => {
            logs.emit_error_locless(err.to_string());
            return malformed(input, &logs);
        }
    };

    match Dpda::new(alphabet).run(input) {
        Ok(run) => SimulateResult {
            verdict: match run.verdict {
                bracket_automata::Verdict::Accepted => Verdict::Accepted,
                bracket_automata::Verdict::Rejected => Verdict::Rejected,
            },
            malformed: false,
            log: Vec::new(),
            ansi_log: String::new(),
            table: Some(run.trace.display(&alphabet).to_string()),
            trace: serde_json::to_string(&run.trace).ok(),
        },
        Err(invalid) => {
            invalid.report(&mut logs);
            malformed(input, &logs)
        }
    }
}

fn malformed(input: &str, logs: &Logs) -> SimulateResult {
    use std::fmt::Write;
    let ansi_log = logs.displayable_with(input).fold(String::new(), |mut s, e| {
        _ = write!(&mut s, "{e}");
        s
    });

    let utf16 = |offset: usize| input[..offset].chars().map(char::len_utf16).sum::<usize>();
    let log = logs
        .entries()
        .iter()
        .map(|e| Diagnostic {
            message: e.message.clone(),
            start: e.span.map(|span| utf16(span.0)),
            end: e.span.map(|span| utf16(span.1)),
        })
        .collect();

    SimulateResult {
        verdict: Verdict::Rejected,
        malformed: true,
        log,
        ansi_log,
        table: None,
        trace: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulates_balanced_input() {
        let result = simulate("P0", 'P', '0');
        assert!(matches!(result.verdict, Verdict::Accepted));
        assert!(!result.malformed);
        assert!(result.table.unwrap().contains("[Z0, P]"));
        assert!(result.trace.unwrap().starts_with('['));
    }

    #[test]
    fn utf16_offsets() {
        let result = simulate("P😀0", 'P', '0');
        assert!(result.malformed);
        assert_eq!(result.log[0].start, Some(1));
        assert_eq!(result.log[0].end, Some(3));
    }

    #[test]
    fn identical_markers_are_reported() {
        let result = simulate("PP", 'P', 'P');
        assert!(result.malformed);
        assert!(matches!(result.verdict, Verdict::Rejected));
        assert_eq!(result.log.len(), 1);
        assert!(result.log[0].message.contains("must differ"));
        assert_eq!(result.log[0].start, None);
        assert!(result.ansi_log.contains("must differ"));
        assert!(result.table.is_none());
    }
}
