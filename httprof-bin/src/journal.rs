use anyhow::Error;
use httprof_collector::{Query, Request, Response};
use serde::Deserialize;
use std::fs::File;
use std::io::prelude::*;
use std::path::Path;
use thiserror::Error as ThisError;

#[derive(Debug, Deserialize)]
pub struct FileCall {
    pub method: Option<String>,
    pub scheme: Option<String>,
    pub host: Option<String>,
    pub path: Option<String>,
    pub query: Option<String>,
    pub request_headers: Option<Vec<String>>,
    pub request_body: Option<String>,
    pub status: u16,
    pub reason: Option<String>,
    pub response_headers: Option<Vec<String>>,
    pub response_body: Option<String>,
    pub total_time: Option<u64>,
    pub connect_time: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct FileJournal {
    pub default_scheme: Option<String>,
    pub default_host: Option<String>,
    pub default_method: Option<String>,
    pub calls: Vec<FileCall>,
}

/// One replayable call. `timing` is absent when the transfer never
/// completed through the instrumented client.
#[derive(Debug, Clone)]
pub struct JournalEntry {
    pub request: Request,
    pub response: Response,
    pub timing: Option<(u64, u64)>,
}

#[derive(Debug)]
pub struct Journal {
    pub entries: Vec<JournalEntry>,
}

#[derive(Debug, ThisError)]
pub enum JournalError {
    #[error("call #{0} has no host and no default_host is set")]
    MissingHost(usize),
    #[error("call #{0}: malformed header '{1}', expected 'Name: value'")]
    MalformedHeader(usize, String),
}

impl Journal {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Journal, Error> {
        let mut f = File::open(path.as_ref())?;
        let mut contents = String::new();
        f.read_to_string(&mut contents)?;
        let file: FileJournal = toml::from_str(&contents)?;
        Journal::resolve(file)
    }

    fn resolve(file: FileJournal) -> Result<Journal, Error> {
        let default_scheme = file.default_scheme.unwrap_or_else(|| "http".into());
        let default_method = file.default_method.unwrap_or_else(|| "GET".into());
        let default_host = file.default_host;

        let mut entries = Vec::with_capacity(file.calls.len());
        for (idx, call) in file.calls.into_iter().enumerate() {
            let host = match call.host.or_else(|| default_host.clone()) {
                Some(host) => host,
                None => return Err(JournalError::MissingHost(idx).into()),
            };
            let mut request = Request::new(
                call.method.unwrap_or_else(|| default_method.clone()),
                call.scheme.unwrap_or_else(|| default_scheme.clone()),
                host,
                call.path.unwrap_or_else(|| "/".into()),
                Query::new(call.query.unwrap_or_default()),
            );
            for header in call.request_headers.unwrap_or_default() {
                let (name, value) = split_header(idx, &header)?;
                request = request.header(name, value);
            }
            if let Some(body) = call.request_body {
                request = request.with_body(body);
            }

            let mut response = Response::new(call.status, call.reason.unwrap_or_default());
            for header in call.response_headers.unwrap_or_default() {
                let (name, value) = split_header(idx, &header)?;
                response = response.header(name, value);
            }
            if let Some(body) = call.response_body {
                response = response.with_body(body);
            }

            let timing = match (call.total_time, call.connect_time) {
                (None, None) => None,
                (total, connect) => Some((total.unwrap_or(0), connect.unwrap_or(0))),
            };
            entries.push(JournalEntry {
                request,
                response,
                timing,
            });
        }
        Ok(Journal { entries })
    }
}

fn split_header(idx: usize, raw: &str) -> Result<(String, String), JournalError> {
    let mut parts = raw.splitn(2, ':');
    match (parts.next(), parts.next()) {
        (Some(name), Some(value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(JournalError::MalformedHeader(idx, raw.to_string())),
    }
}
