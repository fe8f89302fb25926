//! # Static HTTP Server
//! src/lib.rs
//!
//! Servidor HTTP/1.0 concurrente de archivos estáticos: un thread acepta
//! conexiones y las entrega, a través de una cola acotada, a un pool fijo
//! de workers que las atienden según una política de planificación.
//!
//! ## Arquitectura
//!
//! - `queue`: cola acotada productor/consumidor y políticas FIFO/SFF/RANDOM
//! - `workers`: pool de threads que drenan la cola
//! - `transfer`: envío del archivo por la conexión
//! - `server`: aceptador TCP y dispatcher (validación previa a la cola)
//! - `http`: parsing de la request line y construcción de respuestas
//! - `config`: parámetros de arranque (CLI + variables de entorno)
//! - `metrics`: contadores y latencias
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use static_http_server::config::Config;
//! use static_http_server::server::Server;
//!
//! let server = Server::new(Config::default()).expect("Error al iniciar servidor");
//! server.run().expect("Error en el aceptador");
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod metrics;
pub mod queue;
pub mod server;
pub mod transfer;
pub mod workers;
