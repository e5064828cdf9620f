mod collector;
mod events;
mod history;
mod model;
mod stats;
mod stopwatch;

pub use crate::collector::{CallCollector, CallRecord, RequestInfo, ResponseInfo, Snapshot};
pub use crate::events::{priority, EndEvent, Emitter, Subscriber};
pub use crate::history::History;
pub use crate::model::{Call, Query, Request, Response, ResponseId};
pub use crate::stats::{default_percentiles, LatencyStats, Percentile};
pub use crate::stopwatch::{Stopwatch, TimingEntry, TimingStore};
