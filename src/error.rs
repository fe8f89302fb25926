//! # Errores del Servidor
//! src/error.rs
//!
//! Taxonomía de errores tipados. La cola en sí no tiene errores: esperar
//! mientras está llena o vacía es backpressure, no una falla.

use crate::http::StatusCode;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Valores de configuración inválidos detectados al arrancar
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("thread pool size must be >= 1")]
    ZeroThreads,

    #[error("queue capacity must be >= 1")]
    ZeroBuffers,

    #[error("base directory is not a directory: {}", .0.display())]
    InvalidBaseDir(PathBuf),
}

/// Errores fatales del proceso servidor (solo durante el arranque)
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to spawn thread {name}: {source}")]
    Spawn {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to install tracing subscriber: {0}")]
    Logging(String),

    #[error("server io failure: {0}")]
    Io(#[from] io::Error),
}

/// Falla al transferir un archivo ya desencolado (clase (d))
///
/// Queda contenida en el worker que la produjo: se registra y se abandona
/// la conexión, sin reintentos.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed writing response: {0}")]
    Write(#[source] io::Error),

    #[error("file shrank: expected {expected} bytes, sent {sent}")]
    Truncated { expected: u64, sent: u64 },

    #[error("transfer panicked")]
    Panicked,
}

/// Rechazo del dispatcher antes de tocar la cola
///
/// Cada variante corresponde a una llamada al respondedor de errores.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Rejection {
    #[error("malformed request line")]
    BadRequest,

    #[error("unsupported method {0}")]
    NotImplemented(String),

    #[error("dynamic content requested: {0}")]
    DynamicContent(String),

    #[error("directory traversal attempt: {0}")]
    Traversal(String),

    #[error("file not found: {0}")]
    NotFound(String),

    #[error("file not readable: {0}")]
    Unreadable(String),
}

impl Rejection {
    /// Código HTTP de la respuesta de error
    pub fn status(&self) -> StatusCode {
        match self {
            Rejection::BadRequest => StatusCode::BadRequest,
            Rejection::NotImplemented(_) | Rejection::DynamicContent(_) => {
                StatusCode::NotImplemented
            }
            Rejection::Traversal(_) | Rejection::Unreadable(_) => StatusCode::Forbidden,
            Rejection::NotFound(_) => StatusCode::NotFound,
        }
    }

    /// Lo que causó el rechazo (método o nombre de archivo)
    pub fn cause(&self) -> &str {
        match self {
            Rejection::BadRequest => "unknown",
            Rejection::NotImplemented(cause)
            | Rejection::DynamicContent(cause)
            | Rejection::Traversal(cause)
            | Rejection::NotFound(cause)
            | Rejection::Unreadable(cause) => cause,
        }
    }

    /// Mensaje corto para la status line y el título de la página
    pub fn short_message(&self) -> &'static str {
        match self {
            Rejection::BadRequest => "Bad Request",
            Rejection::NotImplemented(_) | Rejection::DynamicContent(_) => "Not Implemented",
            Rejection::Traversal(_) | Rejection::Unreadable(_) => "Forbidden",
            Rejection::NotFound(_) => "Not found",
        }
    }

    /// Mensaje largo para el cuerpo HTML
    pub fn long_message(&self) -> &'static str {
        match self {
            Rejection::BadRequest => "Malformed request line",
            Rejection::NotImplemented(_) => "server does not implement this method",
            Rejection::DynamicContent(_) => "server does not serve dynamic content request",
            Rejection::Traversal(_) => "Directory Traversal Attempt",
            Rejection::NotFound(_) => "server could not find this file",
            Rejection::Unreadable(_) => "server could not read this file",
        }
    }
}
