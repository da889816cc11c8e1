//! Base-address resolution for the analysis service.
//!
//! Resolution runs once at startup from an injected [`ServiceConfig`];
//! nothing here inspects the ambient environment. An explicit override wins;
//! otherwise a three-way host rule picks between the local default and the
//! production address.

/// Local development service address.
pub const LOCAL_BASE_URL: &str = "http://localhost:8000";
/// Production service address.
pub const REMOTE_BASE_URL: &str = "https://dictamen-pi.onrender.com";

const LOCAL_HOST: &str = "localhost";

/// Startup configuration for reaching the analysis service.
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    /// Explicit base-address override; a non-blank value wins outright.
    pub base_url: Option<String>,
    /// Host name of the surrounding context, when one exists (a served UI
    /// knows its origin). `None` for host-less contexts like the CLI or
    /// tests.
    pub host: Option<String>,
}

impl ServiceConfig {
    /// Resolve the service base address.
    ///
    /// Deterministic and independent of request content: override if set,
    /// local default with no host context or on `localhost`, the production
    /// address for any other host.
    pub fn resolve(&self) -> String {
        if let Some(base) = self.base_url.as_deref()
            && !base.trim().is_empty()
        {
            return base.to_string();
        }
        match self.host.as_deref() {
            None => LOCAL_BASE_URL.to_string(),
            Some(LOCAL_HOST) => LOCAL_BASE_URL.to_string(),
            Some(_) => REMOTE_BASE_URL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_override_wins() {
        let config = ServiceConfig {
            base_url: Some("https://staging.dictamen.internal".into()),
            host: Some("app.dictamen.example".into()),
        };
        assert_eq!(config.resolve(), "https://staging.dictamen.internal");
    }

    #[test]
    fn blank_override_falls_through_to_host_rule() {
        let config = ServiceConfig {
            base_url: Some("   ".into()),
            host: None,
        };
        assert_eq!(config.resolve(), LOCAL_BASE_URL);
    }

    #[test]
    fn no_host_context_uses_local_default() {
        assert_eq!(ServiceConfig::default().resolve(), LOCAL_BASE_URL);
    }

    #[test]
    fn localhost_uses_local_default() {
        let config = ServiceConfig {
            base_url: None,
            host: Some("localhost".into()),
        };
        assert_eq!(config.resolve(), LOCAL_BASE_URL);
    }

    #[test]
    fn any_other_host_uses_production_address() {
        let config = ServiceConfig {
            base_url: None,
            host: Some("dictamen.example.org".into()),
        };
        assert_eq!(config.resolve(), REMOTE_BASE_URL);
    }
}
