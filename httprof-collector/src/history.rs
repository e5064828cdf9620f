use crate::events::{EndEvent, Subscriber};
use crate::model::Call;
use std::cell::{Ref, RefCell};
use std::rc::Rc;

/// Ordered journal of completed calls, populated as transactions finish.
///
/// Clones are handles to the same journal, so the emitter and the
/// collector can share it.
#[derive(Debug, Clone, Default)]
pub struct History(Rc<RefCell<Vec<Call>>>);

impl History {
    pub fn new() -> History {
        History::default()
    }

    pub fn record(&self, call: Call) {
        self.0.borrow_mut().push(call);
    }

    /// Borrow the recorded calls, in completion order.
    pub fn entries(&self) -> Ref<'_, [Call]> {
        Ref::map(self.0.borrow(), |calls| calls.as_slice())
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Drop all recorded calls, starting a fresh cycle.
    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

impl Subscriber for History {
    fn on_end(&self, event: &EndEvent) {
        self.record(Call::new(event.request().clone(), event.response().clone()));
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::{Query, Request, Response};

    fn call(path: &str) -> Call {
        let request = Request::new("GET", "http", "test.local", path, Query::new(""));
        Call::new(request, Response::new(200, "OK"))
    }

    #[test]
    fn records_in_completion_order() {
        let history = History::new();
        history.record(call("/a"));
        history.record(call("/b"));

        let entries = history.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].request().path(), "/a");
        assert_eq!(entries[1].request().path(), "/b");
    }

    #[test]
    fn end_event_records_the_pair() {
        let history = History::new();
        let request = Request::new("POST", "http", "test.local", "/new", Query::new(""));
        let response = Response::new(201, "Created");
        history.on_end(&EndEvent::new(request, response.clone(), 10, 1));

        let entries = history.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].request().method(), "POST");
        assert_eq!(entries[0].response().id(), response.id());
    }

    #[test]
    fn clear_starts_a_fresh_cycle() {
        let history = History::new();
        history.record(call("/a"));
        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn clones_share_the_journal() {
        let history = History::new();
        let handle = history.clone();
        handle.record(call("/a"));
        assert_eq!(history.len(), 1);
    }
}
