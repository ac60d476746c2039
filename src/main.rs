mod args;

use std::io::{IsTerminal, Write};
use std::process::ExitCode;

use clap::Parser;
use yansi::Paint;

use crate::args::Args;
use linelog::{Event, Level, Logger, Reader, StderrSink, DEFAULT_DATETIME_FORMAT};

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Err(err) => {
            let root = err.root_cause();

            eprint!("\x1b[31m");
            eprintln!("Error: {}", err);
            eprintln!();
            eprintln!("Caused by:");
            eprint!("  {}", root);
            eprintln!("\x1b[0m");
            ExitCode::from(1)
        }
        Ok(_) => ExitCode::from(0),
    }
}

fn run(args: Args) -> eyre::Result<()> {
    let mut diag = Logger::with_sink(args.diagnostic_level(), Box::new(StderrSink::new()));
    diag.debug(format!("passing levels up to {}", args.level));

    let mut reader = Reader::new();
    if let Some(format) = &args.datetime_format {
        reader = reader.with_datetime_format(format.as_str());
    }
    let datetime_format = args
        .datetime_format
        .clone()
        .unwrap_or_else(|| DEFAULT_DATETIME_FORMAT.to_string());

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let use_color = stdout.is_terminal();

    let mut passed = 0usize;
    let mut dropped = 0usize;

    for event in reader.events(stdin.lock()) {
        match event {
            Event::Line(record) => {
                // Fail closed on unknown severity tokens: a record we can't
                // rank can't be compared against the threshold.
                let Some(level) = record.level else {
                    dropped += 1;
                    diag.notice(format!("dropping unranked line: {}", record.level_str));
                    continue;
                };

                if level > args.level {
                    dropped += 1;
                    continue;
                }
                passed += 1;

                let date = match record.date {
                    Some(date) => date.format(&datetime_format).to_string(),
                    None => "-".to_string(),
                };

                let mut out = stdout.lock();
                if use_color {
                    writeln!(out, "[{}] {} {}", date, paint_level(level), record.msg)?;
                } else {
                    writeln!(out, "[{}] {} {}", date, level, record.msg)?;
                }
            }
            Event::End => {
                diag.info(format!("{} passed, {} dropped", passed, dropped));
            }
        }
    }

    Ok(())
}

fn paint_level(level: Level) -> String {
    let name = level.name();
    match level {
        Level::Emergency | Level::Alert | Level::Critical | Level::Error => {
            name.red().to_string()
        }
        Level::Warning => name.yellow().to_string(),
        Level::Notice | Level::Info => name.green().to_string(),
        Level::Debug => name.dim().to_string(),
    }
}
