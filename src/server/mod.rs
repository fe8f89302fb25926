//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Este módulo implementa el lado de red del servidor:
//! 1. Escucha en un puerto y acepta conexiones (un único thread)
//! 2. Lee y valida cada request (`Dispatcher`)
//! 3. Encola los requests válidos para el pool de workers

pub mod dispatcher;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use dispatcher::{Dispatcher, ResolvedFile};
pub use tcp::Server;
