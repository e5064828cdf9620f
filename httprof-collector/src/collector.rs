use crate::history::History;
use crate::model::{Request, Response};
use crate::stopwatch::{Stopwatch, TimingEntry, TimingStore};
use fnv::FnvHashMap;

/// Display view of one recorded request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestInfo {
    pub method: String,
    pub scheme: String,
    pub host: String,
    pub path: String,
    pub query: String,
    pub query_params: FnvHashMap<String, String>,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Display view of one recorded response.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseInfo {
    pub status_code: u16,
    pub reason_phrase: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallRecord {
    pub request: RequestInfo,
    pub response: ResponseInfo,
    pub time: TimingEntry,
    pub error: bool,
}

/// Aggregated output of one collection cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub calls: Vec<CallRecord>,
    pub error_count: u64,
    pub methods: FnvHashMap<String, u64>,
    pub total_time: u64,
}

/// Folds the call journal and the recorded timing into a [`Snapshot`]
/// for the reporting collaborator.
pub struct CallCollector {
    history: History,
    timings: TimingStore,
    data: Snapshot,
}

impl CallCollector {
    pub fn new(history: History, stopwatch: &Stopwatch) -> CallCollector {
        CallCollector {
            history,
            timings: stopwatch.store(),
            data: Snapshot::default(),
        }
    }

    /// Registration identifier for the reporting collaborator.
    pub fn name(&self) -> &'static str {
        "guzzle"
    }

    /// Fold the journal into a fresh snapshot, replacing any previous one.
    ///
    /// Single pass in journal order. A call whose response was never seen
    /// by the stopwatch contributes the zero timing entry.
    pub fn collect(&mut self) {
        let mut data = Snapshot::default();
        for call in self.history.entries().iter() {
            let request = collect_request(call.request());
            let response = collect_response(call.response());
            let time = self.timings.lookup(call.response().id());
            let error = is_error(response.status_code);

            *data.methods.entry(request.method.clone()).or_insert(0) += 1;
            data.total_time += time.total;
            if error {
                data.error_count += 1;
            }

            data.calls.push(CallRecord {
                request,
                response,
                time,
                error,
            });
        }
        log::debug!(
            "collected {} calls ({} errors)",
            data.calls.len(),
            data.error_count
        );
        self.data = data;
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.data
    }

    pub fn calls(&self) -> &[CallRecord] {
        &self.data.calls
    }

    pub fn count_errors(&self) -> u64 {
        self.data.error_count
    }

    pub fn methods(&self) -> &FnvHashMap<String, u64> {
        &self.data.methods
    }

    pub fn total_time(&self) -> u64 {
        self.data.total_time
    }
}

fn collect_request(request: &Request) -> RequestInfo {
    RequestInfo {
        method: request.method().to_string(),
        scheme: request.scheme().to_string(),
        host: request.host().to_string(),
        path: request.path().to_string(),
        query: request.query().as_str().to_string(),
        query_params: request.query().params(),
        headers: request.headers().to_vec(),
        body: request.body().to_string(),
    }
}

fn collect_response(response: &Response) -> ResponseInfo {
    ResponseInfo {
        status_code: response.status_code(),
        reason_phrase: response.reason_phrase().to_string(),
        headers: response.headers().to_vec(),
        body: response.body().to_string(),
    }
}

/// Client (4xx) and server (5xx) failures both count as errors.
fn is_error(status_code: u16) -> bool {
    (400..600).contains(&status_code)
}
