use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use strum::IntoEnumIterator;

use polyfit::approx::{self, fit_segmented, FitStatus};
use polyfit::emit::Table;
use polyfit::functions::Builtin;
use polyfit::opts::Opts;
use polyfit::precision::Precision;

fn open_output(file: &Option<PathBuf>) -> io::Result<Box<dyn Write>> {
    if let Some(path) = file {
        Ok(Box::new(BufWriter::new(File::create(path)?)))
    } else {
        Ok(Box::new(io::stdout()))
    }
}

/// Fits `builtin` as configured, returning `None` after reporting a failure.
fn build_table(builtin: Builtin, opts: &Opts) -> Option<Table> {
    let name = builtin.to_string();

    let precision = Precision::new(opts.digits);

    let problem = match builtin.problem(opts.order, precision) {
        Ok(problem) => problem
            .with_seed(opts.seed)
            .with_max_iterations(opts.max_iterations),
        Err(err) => {
            eprintln!("error: {name}: {err}");

            return None;
        }
    };

    if opts.segments == 1 {
        match approx::fit(problem) {
            Ok(state) => {
                if state.status() == FitStatus::IterationLimitReached {
                    eprintln!("warning: {name}: {}", state.status());
                }

                Some(Table::single(&name, &state))
            }
            Err(err) => {
                eprintln!("error: {name}: {err}");

                None
            }
        }
    } else {
        let result = match fit_segmented(&problem, opts.segments) {
            Ok(result) => result,
            Err(err) => {
                eprintln!("error: {name}: {err}");

                return None;
            }
        };

        for failure in result.failures() {
            eprintln!("error: {name}: {failure}");
        }

        match result.into_results() {
            Ok(segments) => {
                Some(Table::segmented(&name, opts.order, &segments))
            }
            Err(_) => None,
        }
    }
}

fn main() -> ExitCode {
    let opts = Opts::parse();

    env_logger::Builder::new()
        .filter_level(opts.log_level)
        .init();

    let builtins = if opts.functions.is_empty() {
        Builtin::iter().collect()
    } else {
        opts.functions.clone()
    };

    let mut out = match open_output(&opts.output) {
        Ok(out) => out,
        Err(err) => {
            eprintln!("error: {err}");

            return ExitCode::FAILURE;
        }
    };

    let mut failed = false;

    for builtin in builtins {
        let Some(table) = build_table(builtin, &opts) else {
            failed = true;
            continue;
        };

        if let Err(err) = table.write(&opts.format, &mut out) {
            eprintln!("error: {builtin}: {err}");

            failed = true;
        }
    }

    if let Err(err) = out.flush() {
        eprintln!("error: {err}");

        return ExitCode::FAILURE;
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
