use httprof_collector::{CallRecord, LatencyStats, Snapshot};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::time::Duration;

/// Text rendering of one collection cycle.
pub struct ProfileReport {
    snapshot: Snapshot,
    stats: Option<LatencyStats>,
}

impl ProfileReport {
    pub fn new(snapshot: Snapshot) -> ProfileReport {
        let stats = LatencyStats::from_snapshot(&snapshot);
        ProfileReport { snapshot, stats }
    }
}

// Journal tick values are rendered as microseconds.
fn fmt_duration(ticks: u64) -> String {
    let d = Duration::from_micros(ticks);
    if d.as_secs() >= 5 {
        let s: f64 = d.as_secs() as f64 + (d.subsec_millis() as f64 / 1000.0);
        format!("{:.3}s", s)
    } else if d.subsec_millis() > 0 || d.as_secs() > 0 {
        format!("{}ms", (d.as_secs() * 1000) + u64::from(d.subsec_millis()))
    } else {
        format!("{}us", ticks)
    }
}

fn fmt_call(call: &CallRecord, f: &mut Formatter) -> FmtResult {
    let query = if call.request.query.is_empty() {
        String::new()
    } else {
        format!("?{}", call.request.query)
    };
    writeln!(
        f,
        "{} {} {}://{}{}{} -> {} {} ({})",
        if call.error { "!" } else { " " },
        call.request.method,
        call.request.scheme,
        call.request.host,
        call.request.path,
        query,
        call.response.status_code,
        call.response.reason_phrase,
        fmt_duration(call.time.total),
    )
}

impl Display for ProfileReport {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        writeln!(
            f,
            "{} calls, {} errors, total {}",
            self.snapshot.calls.len(),
            self.snapshot.error_count,
            fmt_duration(self.snapshot.total_time),
        )?;
        for call in &self.snapshot.calls {
            fmt_call(call, f)?;
        }
        let mut methods: Vec<_> = self.snapshot.methods.iter().collect();
        methods.sort();
        if !methods.is_empty() {
            write!(f, "Methods:")?;
            for (method, count) in methods {
                write!(f, " {}={}", method, count)?;
            }
            writeln!(f)?;
        }
        if let Some(ref stats) = self.stats {
            write!(
                f,
                "Latency: min {}/avg {}/max {}/stdev {}",
                fmt_duration(stats.min()),
                fmt_duration(stats.mean()),
                fmt_duration(stats.max()),
                fmt_duration(stats.stdev()),
            )?;
            for (p, v) in stats.percentiles() {
                write!(f, " {}={}", p.label(), fmt_duration(*v))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::journal::JournalEntry;
    use crate::replay;
    use httprof_collector::{Query, Request, Response};
    use slog::o;

    #[test]
    fn durations_scale_with_magnitude() {
        assert_eq!(fmt_duration(0), "0us");
        assert_eq!(fmt_duration(150), "150us");
        assert_eq!(fmt_duration(1_500), "1ms");
        assert_eq!(fmt_duration(2_000_000), "2000ms");
        assert_eq!(fmt_duration(6_000_000), "6.000s");
    }

    #[test]
    fn report_shows_calls_and_aggregates() {
        let entries = vec![
            JournalEntry {
                request: Request::new("GET", "https", "test.local", "/a", Query::new("p=1")),
                response: Response::new(200, "OK"),
                timing: Some((1500, 100)),
            },
            JournalEntry {
                request: Request::new("POST", "https", "test.local", "/b", Query::new("")),
                response: Response::new(500, "Internal Server Error"),
                timing: Some((400, 50)),
            },
        ];
        let logger = slog::Logger::root(slog::Discard, o!());
        let collector = replay::profile(&logger, entries);
        let rendered = ProfileReport::new(collector.snapshot().clone()).to_string();

        assert!(rendered.starts_with("2 calls, 1 errors, total 1ms"));
        assert!(rendered.contains("GET https://test.local/a?p=1 -> 200 OK (1ms)"));
        assert!(rendered.contains("! POST https://test.local/b -> 500 Internal Server Error"));
        assert!(rendered.contains("Methods: GET=1 POST=1"));
        assert!(rendered.contains("Latency: min 400us"));
    }

    #[test]
    fn empty_snapshot_omits_breakdowns() {
        let rendered = ProfileReport::new(Snapshot::default()).to_string();
        assert_eq!(rendered, "0 calls, 0 errors, total 0us\n");
    }
}
