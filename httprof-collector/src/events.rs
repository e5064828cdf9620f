use crate::model::{Request, Response};
use std::rc::Rc;

/// Listener priorities for [`Emitter::attach`]. Higher runs earlier.
pub mod priority {
    pub const EARLY: i32 = 10_000;
    pub const NORMAL: i32 = 0;
    pub const LATE: i32 = -10_000;
}

/// Emitted once per finished transaction, carrying the completed
/// request/response pair and the client's transfer metrics.
#[derive(Debug, Clone)]
pub struct EndEvent {
    request: Request,
    response: Response,
    total_time: u64,
    connect_time: u64,
}

impl EndEvent {
    pub fn new(request: Request, response: Response, total_time: u64, connect_time: u64) -> EndEvent {
        EndEvent {
            request,
            response,
            total_time,
            connect_time,
        }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn response(&self) -> &Response {
        &self.response
    }

    pub fn total_time(&self) -> u64 {
        self.total_time
    }

    pub fn connect_time(&self) -> u64 {
        self.connect_time
    }
}

pub trait Subscriber {
    fn on_end(&self, event: &EndEvent);
}

struct Listener {
    priority: i32,
    seq: usize,
    subscriber: Rc<dyn Subscriber>,
}

/// Ordered registry of transaction-end listeners.
#[derive(Default)]
pub struct Emitter {
    listeners: Vec<Listener>,
}

impl Emitter {
    pub fn new() -> Emitter {
        Emitter::default()
    }

    /// Register a subscriber. Higher priorities are notified first; equal
    /// priorities are notified in attach order.
    pub fn attach(&mut self, priority: i32, subscriber: Rc<dyn Subscriber>) {
        let seq = self.listeners.len();
        self.listeners.push(Listener {
            priority,
            seq,
            subscriber,
        });
        self.listeners
            .sort_by(|a, b| b.priority.cmp(&a.priority).then(a.seq.cmp(&b.seq)));
    }

    pub fn emit_end(&self, event: &EndEvent) {
        log::trace!("end event for response {}", event.response().id());
        for listener in &self.listeners {
            listener.subscriber.on_end(event);
        }
    }
}
