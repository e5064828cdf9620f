mod journal;
mod replay;
mod report;

use crate::journal::Journal;
use crate::report::ProfileReport;
use clap::{App, Arg};
use slog::{o, Drain, Level};

fn root_logger(level: Level) -> slog::Logger {
    let decorator = slog_term::TermDecorator::new().stdout().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let async_drain = slog_async::Async::new(drain).build().fuse();
    let level_filter = slog::LevelFilter(async_drain, level).fuse();
    slog::Logger::root(level_filter, o!())
}

fn main() {
    let matches = App::new("httprof")
        .version("0.1")
        .about("Aggregate a recorded HTTP call journal into a profile report")
        .arg(
            Arg::with_name("journal")
                .short("j")
                .long("journal")
                .value_name("FILE")
                .help("Path to a recorded call journal")
                .required(true)
                .takes_value(true),
        )
        .arg(
            Arg::with_name("v")
                .short("v")
                .multiple(true)
                .help("Sets verbosity level"),
        )
        .get_matches();
    let journal_path = matches.value_of("journal").unwrap();
    let level = match matches.occurrences_of("v") {
        0 => Level::Warning,
        1 => Level::Info,
        2 => Level::Debug,
        _ => Level::Trace,
    };
    let logger = root_logger(level);
    let journal = match Journal::load(&journal_path) {
        Ok(journal) => journal,
        Err(e) => {
            eprintln!("Could not load journal: {}", e);
            std::process::exit(1);
        }
    };
    let collector = replay::profile(&logger, journal.entries);
    println!("{}", ProfileReport::new(collector.snapshot().clone()));
}
