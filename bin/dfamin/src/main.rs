use std::io::{Read, Write};
use std::process::ExitCode;

use automata_minimize::{
    input::Batch,
    output::{render_case, render_skipped, ReportOptions},
    InvalidInput, StateIndex,
};

use tracing::{debug, error, info, trace, warn};
use tracing_subscriber::{filter, prelude::*};

use clap::{Arg, ArgAction, ArgMatches, Command};

fn cli() -> clap::Command {
    Command::new("dfamin")
        .about("Removes unreachable states from deterministic finite automata and reports which of the remaining states are equivalent")
        .arg(
            Arg::new("input")
                .value_name("FILE")
                .default_value("input.txt")
                .help("file containing the test cases, `-` reads from stdin"),
        )
        .arg(
            Arg::new("start")
                .short('s')
                .long("start")
                .value_parser(clap::value_parser!(usize))
                .default_value("0")
                .help("initial state of every automaton"),
        )
        .arg(
            Arg::new("classes")
                .long("classes")
                .action(ArgAction::SetTrue)
                .help("also print the equivalence classes"),
        )
        .arg(
            Arg::new("reachable")
                .long("reachable")
                .action(ArgAction::SetTrue)
                .help("also print the reachable states"),
        )
        .arg(
            Arg::new("table")
                .long("table")
                .action(ArgAction::SetTrue)
                .help("also print the transition table"),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .action(ArgAction::SetTrue)
                .help("do not color the output"),
        )
        .arg(
            Arg::new("skip-invalid")
                .long("skip-invalid")
                .action(ArgAction::SetTrue)
                .help("skip malformed test cases instead of aborting"),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbosity")
                .num_args(0..=1)
                .require_equals(true)
                .value_parser(["info", "debug", "trace"])
                .default_missing_value("info"),
        )
}

fn setup_logging(matches: &ArgMatches) {
    let level = match matches
        .try_get_one::<String>("verbosity")
        .ok()
        .flatten()
        .map(|m| m.as_str())
    {
        Some("trace") => filter::LevelFilter::TRACE,
        Some("debug") => filter::LevelFilter::DEBUG,
        Some("info") => filter::LevelFilter::INFO,
        _ => filter::LevelFilter::WARN,
    };

    let stderr_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(stderr_log.with_filter(level))
        .init();

    trace!("setup {level} logging");
}

fn read_input(path: &str) -> std::io::Result<String> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin().lock().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path)
    }
}

/// Processes every case of the batch with `start` as initial state and returns the combined report.
/// A malformed case aborts the run, unless `skip_invalid` is set, in which case it is reported as skipped.
fn run(
    batch: &Batch,
    start: StateIndex,
    options: &ReportOptions,
    skip_invalid: bool,
) -> Result<String, InvalidInput> {
    let mut out = String::new();
    for case in batch.iter() {
        let report = match case.to_dfa(start) {
            Ok(dfa) => {
                let begin = std::time::Instant::now();
                let minimization = dfa.minimize();
                info!(
                    "case {} with {} states took {}µs",
                    case.number,
                    dfa.size(),
                    begin.elapsed().as_micros()
                );
                render_case(case.number, &dfa, &minimization, options)
            }
            Err(e) if skip_invalid => {
                warn!(
                    "skipping case {} starting in line {}: {e}",
                    case.number, case.line
                );
                render_skipped(case.number, &e, options)
            }
            Err(e) => {
                error!(
                    "case {} starting in line {} is malformed: {e}",
                    case.number, case.line
                );
                return Err(e);
            }
        };
        out.push_str(&report);
    }
    Ok(out)
}

pub fn main() -> ExitCode {
    let matches = cli().get_matches();

    setup_logging(&matches);

    let path = matches
        .get_one::<String>("input")
        .map(String::as_str)
        .unwrap_or("input.txt");
    let start = matches.get_one::<usize>("start").copied().unwrap_or(0);
    let options = ReportOptions {
        colored: !matches.get_flag("no-color"),
        reachable: matches.get_flag("reachable"),
        classes: matches.get_flag("classes"),
        table: matches.get_flag("table"),
    };
    let skip_invalid = matches.get_flag("skip-invalid");

    debug!("reading test cases from {path}");
    let text = match read_input(path) {
        Ok(text) => text,
        Err(e) => {
            error!("could not read {path}: {e}");
            return ExitCode::FAILURE;
        }
    };
    let batch: Batch = match text.parse() {
        Ok(batch) => batch,
        Err(e) => {
            error!("could not parse {path}: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!("read {} test cases", batch.len());

    let report = match run(&batch, start, &options, skip_invalid) {
        Ok(report) => report,
        Err(_) => return ExitCode::FAILURE,
    };
    if let Err(e) = std::io::stdout().lock().write_all(report.as_bytes()) {
        error!("could not write output: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::{cli, run};
    use automata_minimize::{input::Batch, output::ReportOptions, InvalidInput};

    const BATCH: &str = "3\n2\na\n1\n0 1\n1 1\n2\na\n\n0 0\n0 1\n2\na\n0\n0 1\n1 0\n";

    fn plain() -> ReportOptions {
        ReportOptions {
            colored: false,
            ..Default::default()
        }
    }

    #[test]
    fn cli_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn parses_flags() {
        let matches = cli()
            .try_get_matches_from(["dfamin", "cases.txt", "--start", "2", "--classes", "-v=debug"])
            .unwrap();
        assert_eq!(matches.get_one::<String>("input").unwrap(), "cases.txt");
        assert_eq!(matches.get_one::<usize>("start"), Some(&2));
        assert!(matches.get_flag("classes"));
        assert!(!matches.get_flag("table"));
        assert_eq!(
            matches.get_one::<String>("verbosity").map(String::as_str),
            Some("debug")
        );
    }

    #[test_log::test]
    fn malformed_case_aborts() {
        let batch: Batch = BATCH.parse().unwrap();
        assert_eq!(
            run(&batch, 0, &plain(), false),
            Err(InvalidInput::DuplicateRow { state: 0 })
        );
    }

    #[test]
    fn malformed_case_is_skipped() {
        let batch: Batch = BATCH.parse().unwrap();
        assert_eq!(
            run(&batch, 0, &plain(), true).unwrap(),
            "Case 1:\n\n\nCase 2:\nskipped: row of state 0 is given more than once\n\nCase 3:\n\n\n"
        );
    }

    #[test]
    fn start_applies_to_every_case() {
        let batch: Batch = "2\n2\na\n\n0 0\n1 1\n1\na\n\n0 0\n".parse().unwrap();
        assert_eq!(
            run(&batch, 1, &plain(), true).unwrap(),
            "Case 1:\n\n\nCase 2:\nskipped: state 1 does not exist in an automaton with 1 states\n\n"
        );
        assert_eq!(
            run(&batch, 1, &plain(), false),
            Err(InvalidInput::StateOutOfRange { state: 1, size: 1 })
        );
    }
}
