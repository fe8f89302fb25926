//! # Transferencia de Archivos
//! src/transfer.rs
//!
//! Escribe en la conexión el header 200 seguido de los bytes del archivo.
//! No cierra la conexión: eso lo hace el worker al soltar el descriptor.

use crate::error::TransferError;
use crate::http::mime::content_type_for;
use crate::http::Response;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

/// Servicio que envía un archivo ya resuelto por una conexión
pub trait FileTransfer<C>: Send + Sync {
    /// Envía `size` bytes de `path` precedidos por el header HTTP
    ///
    /// Retorna la cantidad de bytes del body enviados.
    fn serve(&self, connection: &mut C, path: &Path, size: u64) -> Result<u64, TransferError>;
}

/// Transferencia de archivos estáticos desde el filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticFileTransfer;

impl<W: Write> FileTransfer<W> for StaticFileTransfer {
    fn serve(&self, connection: &mut W, path: &Path, size: u64) -> Result<u64, TransferError> {
        let file = File::open(path).map_err(|source| TransferError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let head = Response::file_header(size, content_type_for(path));
        connection
            .write_all(&head.to_bytes())
            .map_err(TransferError::Write)?;

        // Se envía exactamente lo anunciado en Content-Length, aunque el
        // archivo haya crecido desde que se resolvió
        let sent = io::copy(&mut file.take(size), connection).map_err(TransferError::Write)?;
        connection.flush().map_err(TransferError::Write)?;

        if sent < size {
            return Err(TransferError::Truncated { expected: size, sent });
        }

        Ok(sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_serve_writes_header_and_body() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hello.html");
        fs::write(&path, "<p>hi</p>").unwrap();

        let mut out = Vec::new();
        let sent = StaticFileTransfer.serve(&mut out, &path, 9).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(sent, 9);
        assert!(text.starts_with("HTTP/1.0 200 OK\r\n"));
        assert!(text.contains("Content-Length: 9\r\n"));
        assert!(text.contains("Content-Type: text/html\r\n"));
        assert!(text.ends_with("\r\n\r\n<p>hi</p>"));
    }

    #[test]
    fn test_serve_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gone.txt");

        let mut out = Vec::new();
        let err = StaticFileTransfer.serve(&mut out, &path, 10).unwrap_err();

        assert!(matches!(err, TransferError::Open { .. }));
        assert!(out.is_empty(), "nothing should be written when open fails");
    }

    #[test]
    fn test_serve_file_shrank_since_resolution() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.txt");
        fs::write(&path, "abc").unwrap();

        let mut out = Vec::new();
        let err = StaticFileTransfer.serve(&mut out, &path, 10).unwrap_err();

        assert!(matches!(err, TransferError::Truncated { expected: 10, sent: 3 }));
    }

    #[test]
    fn test_serve_file_grew_sends_announced_size() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.txt");
        fs::write(&path, "0123456789").unwrap();

        let mut out = Vec::new();
        let sent = StaticFileTransfer.serve(&mut out, &path, 4).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(sent, 4);
        assert!(text.ends_with("\r\n\r\n0123"));
    }
}
