use crate::journal::JournalEntry;
use httprof_collector::{priority, Call, CallCollector, Emitter, EndEvent, History, Stopwatch};
use std::rc::Rc;

/// Replay a recorded journal through the event pipeline and collect the
/// resulting snapshot.
pub fn profile(logger: &slog::Logger, entries: Vec<JournalEntry>) -> CallCollector {
    let stopwatch = Rc::new(Stopwatch::new());
    let history = History::new();

    let mut emitter = Emitter::new();
    // Timing must be recorded before any other end-event consumer runs.
    emitter.attach(priority::EARLY, stopwatch.clone());
    emitter.attach(priority::NORMAL, Rc::new(history.clone()));

    let mut collector = CallCollector::new(history.clone(), &stopwatch);

    let total = entries.len();
    for entry in entries {
        match entry.timing {
            Some((total_time, connect_time)) => emitter.emit_end(&EndEvent::new(
                entry.request,
                entry.response,
                total_time,
                connect_time,
            )),
            // The transfer never completed through the instrumented
            // client; the call is known only from the journal.
            None => history.record(Call::new(entry.request, entry.response)),
        }
    }
    slog::debug!(logger, "replayed {} calls", total);

    collector.collect();
    collector
}
