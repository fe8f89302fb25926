//! # Módulo HTTP
//!
//! Implementa la parte mínima de HTTP/1.0 que necesita un servidor de
//! archivos estáticos, sin librerías de alto nivel:
//!
//! - Parsing de la request line (los headers se descartan)
//! - Construcción del header de respuesta y de páginas de error
//! - Códigos de estado
//! - Inferencia de content type
//!
//! HTTP/1.0 (RFC 1945) no mantiene conexiones persistentes: cada conexión
//! sirve exactamente un request y luego se cierra.

pub mod mime;      // Content-Type por extensión
pub mod request;   // Parsing de HTTP requests
pub mod response;  // Construcción de HTTP responses
pub mod status;    // Códigos de estado HTTP

// Re-exportamos los tipos principales para facilitar su uso
pub use request::{ParseError, Request};
pub use response::{respond_error, Response};
pub use status::StatusCode;
