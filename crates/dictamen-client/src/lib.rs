//! Client layer: base-address resolution, HTTP transport, submission lifecycle.

pub mod config;
pub mod http;
pub mod session;

pub use config::ServiceConfig;
pub use http::{AnalysisClient, AnalysisTransport, ClientError, HealthReport};
pub use session::{AnalysisSession, LifecyclePhase, Snapshot, SubmitOutcome};
