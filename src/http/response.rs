//! # Construcción de Respuestas HTTP
//!
//! Este módulo proporciona una API para construir respuestas HTTP/1.0
//! y convertirlas a bytes para enviar al cliente.
//!
//! ## Formato de una respuesta de archivo
//!
//! ```text
//! HTTP/1.0 200 OK\r\n
//! Server: static_http_server\r\n
//! Content-Length: 13\r\n
//! Content-Type: text/html\r\n
//! \r\n
//! <bytes del archivo>
//! ```
//!
//! ## Ejemplo de uso
//!
//! ```
//! use static_http_server::http::{Response, StatusCode};
//!
//! let response = Response::new(StatusCode::Ok)
//!     .with_header("Content-Type", "text/plain")
//!     .with_body("Hello");
//!
//! let bytes = response.to_bytes();
//! assert!(bytes.starts_with(b"HTTP/1.0 200 OK\r\n"));
//! ```

use super::StatusCode;
use std::io::{self, Write};

/// Valor del header `Server` en todas las respuestas
pub const SERVER_NAME: &str = "static_http_server";

/// Representa una respuesta HTTP/1.0 completa
#[derive(Debug, Clone)]
pub struct Response {
    /// Código de estado HTTP (200, 404, etc.)
    status: StatusCode,

    /// Texto de la status line (por defecto el reason phrase del código)
    reason: String,

    /// Headers HTTP en orden de inserción
    headers: Vec<(String, String)>,

    /// Cuerpo de la respuesta (vacío en el header de un archivo)
    body: Vec<u8>,
}

impl Response {
    /// Crea una nueva respuesta sin headers ni body
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            reason: status.reason_phrase().to_string(),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Agrega un header a la respuesta
    ///
    /// Si el header ya existe, se sobrescribe.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.add_header(name, value);
        self
    }

    /// Agrega un header a una respuesta existente (versión mutable)
    pub fn add_header(&mut self, name: &str, value: &str) {
        match self.headers.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
            Some((_, v)) => *v = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
    }

    /// Establece el cuerpo desde un string y calcula `Content-Length`
    pub fn with_body(mut self, body: &str) -> Self {
        self.body = body.as_bytes().to_vec();
        let len = self.body.len().to_string();
        self.add_header("Content-Length", &len);
        self
    }

    /// Header de una respuesta 200 para un archivo de `size` bytes
    ///
    /// El body no se incluye: los bytes del archivo se escriben después,
    /// directamente sobre la conexión.
    ///
    /// # Ejemplo
    /// ```
    /// use static_http_server::http::Response;
    ///
    /// let head = Response::file_header(42, "text/html");
    /// let text = String::from_utf8(head.to_bytes()).unwrap();
    /// assert!(text.contains("Content-Length: 42\r\n"));
    /// assert!(text.ends_with("\r\n\r\n"));
    /// ```
    pub fn file_header(size: u64, content_type: &str) -> Self {
        Self::new(StatusCode::Ok)
            .with_header("Server", SERVER_NAME)
            .with_header("Content-Length", &size.to_string())
            .with_header("Content-Type", content_type)
    }

    /// Crea una página de error HTML mínima
    ///
    /// El body sigue el formato `<h2>código: corto</h2><p>largo: causa</p>`
    /// y la status line usa el mismo mensaje corto.
    pub fn error_page(status: StatusCode, cause: &str, short_message: &str, long_message: &str) -> Self {
        let body = format!(
            "<!doctype html>\r\n\
             <head>\r\n  \
             <title>{server} Error</title>\r\n\
             </head>\r\n\
             <body>\r\n  \
             <h2>{code}: {short}</h2>\r\n  \
             <p>{long}: {cause}</p>\r\n\
             </body>\r\n\
             </html>\r\n",
            server = SERVER_NAME,
            code = status.as_u16(),
            short = short_message,
            long = long_message,
            cause = cause,
        );
        let mut response = Self::new(status)
            .with_header("Content-Type", "text/html")
            .with_body(&body);
        response.reason = short_message.to_string();
        response
    }

    /// Convierte la respuesta a bytes listos para enviar por el socket
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::new();

        // 1. Status line
        result.extend_from_slice(format!("HTTP/1.0 {} {}\r\n", self.status.as_u16(), self.reason).as_bytes());

        // 2. Headers
        for (name, value) in &self.headers {
            result.extend_from_slice(format!("{}: {}\r\n", name, value).as_bytes());
        }

        // 3. Línea vacía que separa headers del body
        result.extend_from_slice(b"\r\n");

        // 4. Body (si existe)
        result.extend_from_slice(&self.body);

        result
    }
}

/// Envía una página de error y cierra la conexión
///
/// La conexión se consume: al retornar ya fue liberada.
pub fn respond_error<W: Write>(
    mut connection: W,
    cause: &str,
    status: StatusCode,
    short_message: &str,
    long_message: &str,
) -> io::Result<()> {
    let response = Response::error_page(status, cause, short_message, long_message);
    connection.write_all(&response.to_bytes())?;
    connection.flush()
}
