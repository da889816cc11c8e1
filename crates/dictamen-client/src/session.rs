//! Request lifecycle for the analyze action.
//!
//! A session owns the observable state of the last analysis attempt as three
//! independent fields: a loading flag, the last received report and the last
//! error message. They are deliberately separate so a failed attempt records
//! its message without discarding a previously rendered report.
//!
//! Submissions may overlap. Every request gets a monotonically increasing
//! sequence number and only the latest-issued request may update state on
//! completion; a slower, stale response is discarded wholesale. State is
//! mutated only by the completion handler of the accepted request, with the
//! lock never held across the network suspension point.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use dictamen_core::report::{AnalysisReport, AnalyzeRequest, Jurisdiction};
use tracing::debug;

use crate::http::{AnalysisTransport, ClientError};

/// Shown when a failure carries no message of its own.
const FALLBACK_ERROR: &str = "Error";

/// Observable state of the current or last attempt.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// A request is in flight.
    pub loading: bool,
    /// Last successfully received report, if any.
    pub report: Option<AnalysisReport>,
    /// Message from the last completed attempt, if it failed.
    pub error: Option<String>,
}

/// Coarse lifecycle phase derived from the snapshot fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    Idle,
    Loading,
    Success,
    Error,
}

impl Snapshot {
    /// Loading while in flight; otherwise the last completed attempt decides
    /// (an error message outranks the retained report), and with neither the
    /// session is still idle.
    pub fn phase(&self) -> LifecyclePhase {
        if self.loading {
            LifecyclePhase::Loading
        } else if self.error.is_some() {
            LifecyclePhase::Error
        } else if self.report.is_some() {
            LifecyclePhase::Success
        } else {
            LifecyclePhase::Idle
        }
    }
}

/// What became of one `submit` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The completion updated the session state.
    Applied,
    /// A newer submission was issued while this one was in flight; its
    /// completion was discarded.
    Superseded,
    /// The clause was empty after trimming; no request was issued.
    EmptyClause,
}

/// Lifecycle session around one transport.
pub struct AnalysisSession<T> {
    transport: T,
    state: Mutex<Snapshot>,
    issued: AtomicU64,
}

impl<T: AnalysisTransport> AnalysisSession<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: Mutex::new(Snapshot::default()),
            issued: AtomicU64::new(0),
        }
    }

    /// Current observable state.
    pub fn snapshot(&self) -> Snapshot {
        self.state.lock().unwrap().clone()
    }

    /// Submit a clause for analysis.
    ///
    /// Safe to call with an empty clause: nothing is sent and nothing
    /// changes. Otherwise sets the loading flag, clears any prior error and
    /// issues one `POST /analyze` with the clause verbatim. On completion the
    /// report or the error message is stored and loading cleared, unless a
    /// newer submission was issued meanwhile.
    pub async fn submit(&self, clause: &str, jurisdiction: Jurisdiction) -> SubmitOutcome {
        if clause.trim().is_empty() {
            return SubmitOutcome::EmptyClause;
        }

        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.state.lock().unwrap();
            state.loading = true;
            state.error = None;
        }

        let request = AnalyzeRequest {
            clause: clause.to_string(),
            jurisdiction,
        };
        let completion = self.transport.analyze(&request).await;

        let mut state = self.state.lock().unwrap();
        if self.issued.load(Ordering::SeqCst) != seq {
            debug!(seq, "discarding stale analyze completion");
            return SubmitOutcome::Superseded;
        }
        state.loading = false;
        match completion {
            Ok(report) => {
                state.report = Some(report);
                state.error = None;
            }
            Err(err) => {
                state.error = Some(error_message(&err));
            }
        }
        SubmitOutcome::Applied
    }
}

/// Inline message for a failed attempt: the raw body for server errors, the
/// failure's own rendering otherwise, with a fixed fallback when blank.
fn error_message(err: &ClientError) -> String {
    let message = match err {
        ClientError::Server { body, .. } => body.clone(),
        other => other.to_string(),
    };
    if message.trim().is_empty() {
        FALLBACK_ERROR.to_string()
    } else {
        message
    }
}
