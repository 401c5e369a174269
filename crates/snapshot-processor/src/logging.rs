//! Scoped log output for snapshot processing.
//!
//! Components log through `tracing` macros and never install a subscriber
//! themselves. A [`LogSession`] installs one as the default for the current
//! thread until it is shut down or dropped.

use tracing::dispatcher::{self, DefaultGuard, Dispatch};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use crate::config::HandlerConfig;

/// An active log subscriber.
pub struct LogSession {
    guard: Option<DefaultGuard>,
}

impl LogSession {
    /// Install an fmt subscriber configured by `config`.
    pub fn start(config: &HandlerConfig) -> Self {
        let builder = FmtSubscriber::builder()
            .with_max_level(config.level())
            .with_target(true);

        let dispatch = if config.log_json {
            Dispatch::new(builder.json().finish())
        } else {
            Dispatch::new(builder.finish())
        };

        let guard = dispatcher::set_default(&dispatch);
        info!(level = %config.level(), json = config.log_json, "Log session started");

        Self { guard: Some(guard) }
    }

    pub fn is_active(&self) -> bool {
        self.guard.is_some()
    }

    /// Remove the subscriber. Further calls are no-ops.
    pub fn shutdown(&mut self) {
        if let Some(guard) = self.guard.take() {
            info!("Log session stopped");
            drop(guard);
        }
    }
}

impl Drop for LogSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_lifecycle() {
        let config = HandlerConfig {
            log_level: "debug".to_string(),
            ..HandlerConfig::default()
        };

        let mut session = LogSession::start(&config);
        assert!(session.is_active());
        assert!(tracing::enabled!(tracing::Level::DEBUG));

        session.shutdown();
        assert!(!session.is_active());
        session.shutdown();
    }

    #[test]
    fn test_json_session() {
        let config = HandlerConfig {
            log_json: true,
            ..HandlerConfig::default()
        };
        let session = LogSession::start(&config);
        assert!(session.is_active());
        assert!(!tracing::enabled!(tracing::Level::DEBUG));
    }
}
