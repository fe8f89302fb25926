//! # Logging
//! src/logging.rs
//!
//! Instala el subscriber global de `tracing`. `RUST_LOG` tiene prioridad
//! sobre el nivel recibido por configuración.

use crate::error::ServerError;
use tracing_subscriber::EnvFilter;

/// Nivel por defecto cuando no hay `RUST_LOG`
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Configura el subscriber fmt con nombres de thread (worker-N, stats)
///
/// Falla si ya había un subscriber global instalado.
pub fn init_logging(level: &str) -> Result<(), ServerError> {
    tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(level))
        .with_target(false)
        .with_thread_names(true)
        .try_init()
        .map_err(|err| ServerError::Logging(err.to_string()))
}

fn build_env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}
