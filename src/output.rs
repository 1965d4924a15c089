use itertools::Itertools;
use owo_colors::{AnsiColors, OwoColorize};

use crate::{automaton::DFA, error::InvalidInput, minimization::Minimization, Show};

/// The colors that consecutive test cases are printed in, repeating from the start once exhausted.
pub const PALETTE: [AnsiColors; 5] = [
    AnsiColors::BrightRed,
    AnsiColors::BrightGreen,
    AnsiColors::BrightYellow,
    AnsiColors::BrightBlue,
    AnsiColors::BrightCyan,
];

/// Determines what is printed for each test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    /// Whether ANSI colors are used.
    pub colored: bool,
    /// Print the reachable states.
    pub reachable: bool,
    /// Print the equivalence classes in addition to the pairs.
    pub classes: bool,
    /// Print the transition table of the automaton.
    pub table: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            colored: true,
            reachable: false,
            classes: false,
            table: false,
        }
    }
}

/// Returns the color for the test case with the given number, counting from 1.
pub fn case_color(number: usize) -> AnsiColors {
    PALETTE[number.saturating_sub(1) % PALETTE.len()]
}

fn paint(text: &str, color: AnsiColors, options: &ReportOptions) -> String {
    if options.colored {
        text.color(color).to_string()
    } else {
        text.to_string()
    }
}

/// Renders the result for one test case: a header line, the equivalent pairs separated by spaces and
/// a blank line. Depending on `options`, the transition table, the reachable states and the equivalence
/// classes are printed between header and pairs.
pub fn render_case(
    number: usize,
    dfa: &DFA,
    minimization: &Minimization,
    options: &ReportOptions,
) -> String {
    let color = case_color(number);
    let mut out = paint(&format!("Case {number}:"), color, options);
    out.push('\n');

    if options.table {
        out.push_str(&dfa.build_transition_table());
        out.push('\n');
    }
    if options.reachable {
        out.push_str(&format!("reachable: {}\n", minimization.reachable().show()));
    }
    if options.classes {
        out.push_str(&format!("classes: {}\n", minimization.classes().show()));
    }

    let pairs = minimization
        .pairs()
        .into_iter()
        .map(|pair| paint(&pair.show(), color, options))
        .join(" ");
    out.push_str(&pairs);
    out.push_str("\n\n");
    out
}

/// Renders the note for a test case that could not be processed.
pub fn render_skipped(number: usize, error: &InvalidInput, options: &ReportOptions) -> String {
    let mut out = paint(&format!("Case {number}:"), case_color(number), options);
    out.push('\n');
    let note = format!("skipped: {error}");
    if options.colored {
        out.push_str(&note.dimmed().to_string());
    } else {
        out.push_str(&note);
    }
    out.push_str("\n\n");
    out
}
