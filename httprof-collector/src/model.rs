use fnv::FnvHashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_RESPONSE_ID: AtomicU64 = AtomicU64::new(0);

/// Opaque handle identifying one observed response instance.
///
/// Two responses with identical content constructed separately get
/// distinct ids; clones keep the id of the original. Timing is keyed by
/// this handle, never by response content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResponseId(u64);

impl fmt::Display for ResponseId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Query portion of a request URL, convertible to both its string form
/// and a key/value mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    raw: String,
}

impl Query {
    pub fn new<S: Into<String>>(raw: S) -> Query {
        Query { raw: raw.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Key/value view of the query string. A later occurrence of a key
    /// shadows earlier ones; a pair without `=` maps to the empty value.
    pub fn params(&self) -> FnvHashMap<String, String> {
        let mut params = FnvHashMap::default();
        for pair in self.raw.split('&') {
            if pair.is_empty() {
                continue;
            }
            let mut parts = pair.splitn(2, '=');
            let key = parts.next().unwrap_or("");
            let value = parts.next().unwrap_or("");
            params.insert(key.to_string(), value.to_string());
        }
        params
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// A request as observed by the client. Headers are carried opaquely and
/// never interpreted by the profiler.
#[derive(Debug, Clone)]
pub struct Request {
    method: String,
    scheme: String,
    host: String,
    path: String,
    query: Query,
    headers: Vec<(String, String)>,
    body: String,
}

impl Request {
    pub fn new<M, S, H, P>(method: M, scheme: S, host: H, path: P, query: Query) -> Request
    where
        M: Into<String>,
        S: Into<String>,
        H: Into<String>,
        P: Into<String>,
    {
        Request {
            method: method.into(),
            scheme: scheme.into(),
            host: host.into(),
            path: path.into(),
            query,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    pub fn header<N: Into<String>, V: Into<String>>(mut self, name: N, value: V) -> Request {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body<S: Into<String>>(mut self, body: S) -> Request {
        self.body = body.into();
        self
    }

    /// Method verb, case preserved exactly as the client sent it.
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

/// A response as observed by the client, carrying its identity handle.
#[derive(Debug, Clone)]
pub struct Response {
    id: ResponseId,
    status: u16,
    reason: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl Response {
    pub fn new<S: Into<String>>(status: u16, reason: S) -> Response {
        Response {
            id: ResponseId(NEXT_RESPONSE_ID.fetch_add(1, Ordering::Relaxed)),
            status,
            reason: reason.into(),
            headers: Vec::new(),
            body: String::new(),
        }
    }

    pub fn header<N: Into<String>, V: Into<String>>(mut self, name: N, value: V) -> Response {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body<S: Into<String>>(mut self, body: S) -> Response {
        self.body = body.into();
        self
    }

    pub fn id(&self) -> ResponseId {
        self.id
    }

    pub fn status_code(&self) -> u16 {
        self.status
    }

    pub fn reason_phrase(&self) -> &str {
        &self.reason
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

/// One completed request/response pair, immutable once recorded.
#[derive(Debug, Clone)]
pub struct Call {
    request: Request,
    response: Response,
}

impl Call {
    pub fn new(request: Request, response: Response) -> Call {
        Call { request, response }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn response(&self) -> &Response {
        &self.response
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn query_params_split_pairs() {
        let query = Query::new("foo=bar&page=2");
        let params = query.params();
        assert_eq!(params.get("foo").map(String::as_str), Some("bar"));
        assert_eq!(params.get("page").map(String::as_str), Some("2"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn query_params_empty_string() {
        assert!(Query::new("").params().is_empty());
    }

    #[test]
    fn query_params_last_duplicate_wins() {
        let params = Query::new("k=1&k=2").params();
        assert_eq!(params.get("k").map(String::as_str), Some("2"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn query_params_key_without_value() {
        let params = Query::new("flag").params();
        assert_eq!(params.get("flag").map(String::as_str), Some(""));
    }

    #[test]
    fn equal_content_responses_have_distinct_ids() {
        let a = Response::new(200, "OK");
        let b = Response::new(200, "OK");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn clone_keeps_response_id() {
        let original = Response::new(404, "Not Found");
        assert_eq!(original.clone().id(), original.id());
    }
}
