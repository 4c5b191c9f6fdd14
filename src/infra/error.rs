use std::net::SocketAddr;

use sqlx::migrate::MigrateError;
use thiserror::Error;

use crate::application::repos::RepoError;

/// Failures while bringing the service up or keeping its listeners running.
#[derive(Debug, Error)]
pub enum InfraError {
    #[error("database url is not configured")]
    MissingDatabaseUrl,
    #[error("failed to connect to the database: {0}")]
    Connect(#[source] sqlx::Error),
    #[error("database is unreachable: {0}")]
    Unreachable(#[source] RepoError),
    #[error("failed to apply migrations: {0}")]
    Migrate(#[from] MigrateError),
    #[error("failed to bind {listener} listener on {addr}: {source}")]
    Bind {
        listener: &'static str,
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("http server stopped: {0}")]
    Serve(#[source] std::io::Error),
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
}

impl InfraError {
    pub fn bind(listener: &'static str, addr: SocketAddr) -> impl FnOnce(std::io::Error) -> Self {
        move |source| Self::Bind {
            listener,
            addr,
            source,
        }
    }

    pub fn telemetry(message: impl Into<String>) -> Self {
        Self::Telemetry(message.into())
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;
    use std::io;

    use super::*;

    #[test]
    fn bind_failure_names_listener_and_address() {
        let addr: SocketAddr = "127.0.0.1:8081".parse().expect("addr");
        let err = InfraError::bind("admin", addr)(io::Error::from(io::ErrorKind::AddrInUse));

        let message = err.to_string();
        assert!(message.contains("admin listener"));
        assert!(message.contains("127.0.0.1:8081"));
        assert!(err.source().is_some());
    }

    #[test]
    fn migration_errors_convert_and_keep_their_cause() {
        let err = InfraError::from(MigrateError::VersionMissing(20261001000000));

        assert!(matches!(err, InfraError::Migrate(_)));
        assert!(err.to_string().contains("20261001000000"));
        assert!(err.source().is_some());
    }

    #[test]
    fn failed_ping_is_unreachable() {
        let err = InfraError::Unreachable(RepoError::Timeout);
        assert!(err.to_string().starts_with("database is unreachable"));
    }
}
