//! # Descriptor de Request
//! src/queue/descriptor.rs
//!
//! Metadata de un request pendiente junto con su conexión. El descriptor
//! tiene un único dueño en cada momento: el dispatcher hasta encolarlo,
//! luego la cola, y finalmente el worker que lo desencola.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Request estático ya validado, listo para ser servido
///
/// `C` es el handle de la conexión (`TcpStream` en el servidor real).
#[derive(Debug)]
pub struct RequestDescriptor<C> {
    connection: C,
    path: PathBuf,
    /// Tamaño al momento de resolver el path; puede quedar desactualizado
    /// si el archivo cambia antes de servirse (solo lo usa SFF)
    size: u64,
    arrival_time: SystemTime,
}

impl<C> RequestDescriptor<C> {
    /// Crea el descriptor marcando la llegada con la hora actual
    pub fn new(connection: C, path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            connection,
            path: path.into(),
            size,
            arrival_time: SystemTime::now(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn arrival_time(&self) -> SystemTime {
        self.arrival_time
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    /// Consume el descriptor entregando la conexión a quien lo desencoló
    pub fn into_connection(self) -> C {
        self.connection
    }

    /// Desarma el descriptor: `(conexión, path, size)`
    pub fn into_parts(self) -> (C, PathBuf, u64) {
        (self.connection, self.path, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_descriptor() {
        let before = SystemTime::now();
        let descriptor = RequestDescriptor::new(7u32, "./index.html", 120);

        assert_eq!(descriptor.path(), Path::new("./index.html"));
        assert_eq!(descriptor.size(), 120);
        assert_eq!(*descriptor.connection(), 7);
        assert!(descriptor.arrival_time() >= before);
    }

    #[test]
    fn test_into_parts_moves_connection_out() {
        let descriptor = RequestDescriptor::new(String::from("conn"), "./a.gif", 9);
        let (connection, path, size) = descriptor.into_parts();

        assert_eq!(connection, "conn");
        assert_eq!(path, PathBuf::from("./a.gif"));
        assert_eq!(size, 9);
    }
}
