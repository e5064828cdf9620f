use crate::events::{EndEvent, Subscriber};
use crate::model::ResponseId;
use fnv::FnvHashMap;
use std::cell::RefCell;
use std::rc::Rc;

/// Transfer timing captured for one completed transaction. Values are
/// unit-agnostic ticks; the zero entry is the missing-data sentinel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimingEntry {
    pub total: u64,
    pub connection: u64,
}

/// Shared association from response identity to its timing.
///
/// Clones are handles to the same underlying map. Single-threaded by
/// contract: the caller sequences recording before lookup.
#[derive(Debug, Clone, Default)]
pub struct TimingStore(Rc<RefCell<FnvHashMap<ResponseId, TimingEntry>>>);

impl TimingStore {
    pub fn new() -> TimingStore {
        TimingStore::default()
    }

    /// Associate timing with a response, replacing any previous entry.
    pub fn attach(&self, id: ResponseId, entry: TimingEntry) {
        self.0.borrow_mut().insert(id, entry);
    }

    /// Stored timing for the response, or the zero entry when the
    /// response was never seen by the recorder. Never fails.
    pub fn lookup(&self, id: ResponseId) -> TimingEntry {
        self.0.borrow().get(&id).copied().unwrap_or_default()
    }

    pub fn contains(&self, id: ResponseId) -> bool {
        self.0.borrow().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

/// Records transfer timing per completed transaction.
///
/// Attach at `priority::EARLY` so timing exists before any other consumer
/// of the same end event runs.
#[derive(Debug, Clone, Default)]
pub struct Stopwatch {
    store: TimingStore,
}

impl Stopwatch {
    pub fn new() -> Stopwatch {
        Stopwatch::default()
    }

    /// Handle to the shared timing association.
    pub fn store(&self) -> TimingStore {
        self.store.clone()
    }
}

impl Subscriber for Stopwatch {
    fn on_end(&self, event: &EndEvent) {
        let entry = TimingEntry {
            total: event.total_time(),
            connection: event.connect_time(),
        };
        log::debug!(
            "response {}: total {} connect {}",
            event.response().id(),
            entry.total,
            entry.connection
        );
        self.store.attach(event.response().id(), entry);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::{Query, Request, Response};

    fn end_event(response: &Response, total: u64, connection: u64) -> EndEvent {
        let request = Request::new("GET", "http", "test.local", "/", Query::new(""));
        EndEvent::new(request, response.clone(), total, connection)
    }

    #[test]
    fn end_event_stores_timing() {
        let response = Response::new(200, "OK");
        let stopwatch = Stopwatch::new();

        stopwatch.on_end(&end_event(&response, 10, 1));

        let expected = TimingEntry {
            total: 10,
            connection: 1,
        };
        assert_eq!(stopwatch.store().lookup(response.id()), expected);
    }

    #[test]
    fn duplicate_end_event_overwrites() {
        let response = Response::new(200, "OK");
        let stopwatch = Stopwatch::new();

        stopwatch.on_end(&end_event(&response, 10, 1));
        stopwatch.on_end(&end_event(&response, 20, 2));

        let entry = stopwatch.store().lookup(response.id());
        assert_eq!(entry.total, 20);
        assert_eq!(entry.connection, 2);
        assert_eq!(stopwatch.store().len(), 1);
    }

    #[test]
    fn lookup_defaults_to_zero() {
        let store = TimingStore::new();
        let entry = store.lookup(Response::new(200, "OK").id());
        assert_eq!(entry, TimingEntry::default());
    }

    #[test]
    fn equal_content_responses_get_independent_entries() {
        let a = Response::new(200, "OK");
        let b = Response::new(200, "OK");
        let stopwatch = Stopwatch::new();

        stopwatch.on_end(&end_event(&a, 10, 1));

        assert!(stopwatch.store().contains(a.id()));
        assert!(!stopwatch.store().contains(b.id()));
    }
}
