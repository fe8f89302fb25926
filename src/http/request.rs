//! # Parsing de Requests HTTP/1.0
//! src/http/request.rs
//!
//! Parser mínimo: solo interesa la request line. Los headers se leen y se
//! descartan hasta la línea vacía (HTTP/1.0 sin conexiones persistentes).
//!
//! ## Formato de un Request HTTP/1.0
//!
//! ```text
//! GET /index.html HTTP/1.0\r\n
//! Host: localhost:10000\r\n
//! \r\n
//! ```

use std::io::{self, BufRead, Read};

/// Máximo de bytes aceptados para request line + headers
pub const MAX_HEAD_BYTES: u64 = 8192;

/// Único método que sirve el servidor (comparado sin distinguir mayúsculas)
const GET: &str = "GET";

/// Representa un request HTTP/1.0 ya validado
///
/// Solo se conserva la URI: el método es siempre GET y ni la versión ni los
/// headers influyen en cómo se sirve el archivo.
#[derive(Debug, Clone)]
pub struct Request {
    /// URI tal cual llegó (ej: "/docs/index.html?x=1")
    uri: String,
}

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Request vacío (el cliente cerró sin enviar nada)
    EmptyRequest,

    /// Request line truncada antes del fin de línea
    IncompleteRequest,

    /// La request line no tiene exactamente 3 partes
    InvalidRequestLine,

    /// Método HTTP no soportado
    UnsupportedMethod(String),

    /// Request line + headers superan `MAX_HEAD_BYTES`
    TooLarge,

    /// Error de lectura del socket
    Io(io::ErrorKind),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::EmptyRequest => write!(f, "Empty request"),
            ParseError::IncompleteRequest => write!(f, "Incomplete HTTP request"),
            ParseError::InvalidRequestLine => write!(f, "Invalid request line format"),
            ParseError::UnsupportedMethod(m) => write!(f, "Unsupported HTTP method: {}", m),
            ParseError::TooLarge => write!(f, "Request head too large"),
            ParseError::Io(kind) => write!(f, "Read error: {:?}", kind),
        }
    }
}

impl std::error::Error for ParseError {}

impl Request {
    /// Lee la request line y descarta los headers hasta la línea vacía
    ///
    /// Nunca consume más de `MAX_HEAD_BYTES`. El contenido de los headers no
    /// se interpreta: cualquier línea es aceptada.
    pub fn read_from<R: BufRead>(reader: &mut R) -> Result<Self, ParseError> {
        let mut limited = reader.take(MAX_HEAD_BYTES);

        let mut request_line = String::new();
        let read = limited
            .read_line(&mut request_line)
            .map_err(|e| ParseError::Io(e.kind()))?;
        if read == 0 {
            return Err(ParseError::EmptyRequest);
        }
        if !request_line.ends_with('\n') {
            return Err(if limited.limit() == 0 {
                ParseError::TooLarge
            } else {
                ParseError::IncompleteRequest
            });
        }

        // Headers: se leen y se descartan
        let mut line = String::new();
        loop {
            line.clear();
            let read = limited
                .read_line(&mut line)
                .map_err(|e| ParseError::Io(e.kind()))?;

            if read == 0 {
                if limited.limit() == 0 {
                    return Err(ParseError::TooLarge);
                }
                // El cliente cerró sin la línea vacía final
                break;
            }
            if line == "\r\n" || line == "\n" {
                break;
            }
        }

        Self::parse(request_line.as_bytes())
    }

    /// Parsea un request HTTP/1.0 desde bytes
    ///
    /// Solo la primera línea importa; el resto se ignora.
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use static_http_server::http::Request;
    ///
    /// let raw = b"GET /index.html HTTP/1.0\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.uri(), "/index.html");
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        let request_str =
            std::str::from_utf8(buffer).map_err(|_| ParseError::InvalidRequestLine)?;

        if request_str.trim().is_empty() {
            return Err(ParseError::EmptyRequest);
        }

        let first_line = request_str.split('\n').next().unwrap_or_default();
        Self::parse_request_line(first_line)
    }

    /// Formato: `método URI versión`
    ///
    /// La versión debe estar presente pero no se valida.
    fn parse_request_line(line: &str) -> Result<Self, ParseError> {
        let parts: Vec<&str> = line.split_whitespace().collect();

        if parts.len() != 3 {
            return Err(ParseError::InvalidRequestLine);
        }

        if !parts[0].eq_ignore_ascii_case(GET) {
            return Err(ParseError::UnsupportedMethod(parts[0].to_string()));
        }

        Ok(Request {
            uri: parts[1].to_string(),
        })
    }

    /// Obtiene la URI completa (con query string si la hay)
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Obtiene la URI sin query string
    pub fn path(&self) -> &str {
        match self.uri.split_once('?') {
            Some((path, _)) => path,
            None => &self.uri,
        }
    }
}
