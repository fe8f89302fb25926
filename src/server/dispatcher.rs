//! # Dispatcher
//! src/server/dispatcher.rs
//!
//! Primer contacto con cada conexión aceptada: lee el request, resuelve el
//! archivo dentro del directorio servido y lo valida. Solo los requests
//! válidos llegan a la cola; el resto recibe una página de error aquí mismo.
//! La cola no valida nada por su cuenta.

use crate::error::Rejection;
use crate::http::{respond_error, ParseError, Request};
use crate::metrics::MetricsCollector;
use crate::queue::{RequestDescriptor, RequestQueue};
use std::fs;
use std::io::{BufReader, Read, Write};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Archivo estático ya validado
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    pub path: PathBuf,
    pub size: u64,
}

/// Convierte conexiones aceptadas en descriptores encolados
pub struct Dispatcher<C> {
    root: PathBuf,
    queue: RequestQueue<C>,
    metrics: MetricsCollector,
}

impl<C: Read + Write> Dispatcher<C> {
    pub fn new(root: impl Into<PathBuf>, queue: RequestQueue<C>, metrics: MetricsCollector) -> Self {
        Self {
            root: root.into(),
            queue,
            metrics,
        }
    }

    /// Atiende la fase de validación de una conexión
    ///
    /// Si el request es válido lo encola (bloqueando mientras la cola esté
    /// llena). Si no, responde el error y cierra la conexión.
    pub fn dispatch(&self, connection: C) -> Result<(), Rejection> {
        let mut reader = BufReader::new(connection);
        let resolved = Request::read_from(&mut reader)
            .map_err(Self::rejection_for)
            .and_then(|request| self.resolve(&request));
        let connection = reader.into_inner();

        match resolved {
            Ok(file) => {
                // Antes de encolar: un worker puede terminar la transferencia
                // antes de que `enqueue` retorne
                self.metrics.record_enqueued();
                self.queue
                    .enqueue(RequestDescriptor::new(connection, file.path, file.size));
                Ok(())
            }
            Err(rejection) => {
                self.reject(connection, &rejection);
                Err(rejection)
            }
        }
    }

    fn rejection_for(error: ParseError) -> Rejection {
        match error {
            ParseError::UnsupportedMethod(method) => Rejection::NotImplemented(method),
            _ => Rejection::BadRequest,
        }
    }

    fn reject(&self, connection: C, rejection: &Rejection) {
        let status = rejection.status();
        warn!(%status, cause = rejection.cause(), "request rejected: {}", rejection);
        self.metrics.record_rejection(status.as_u16());

        if let Err(e) = respond_error(
            connection,
            rejection.cause(),
            status,
            rejection.short_message(),
            rejection.long_message(),
        ) {
            debug!(error = %e, "client gone before error response");
        }
    }

    /// Traduce la URI a un archivo regular y legible dentro de la raíz
    pub fn resolve(&self, request: &Request) -> Result<ResolvedFile, Rejection> {
        let uri = request.uri();

        // Nombre relativo tal como se reporta en las páginas de error
        let mut filename = format!(".{}", request.path());
        if filename.ends_with('/') {
            filename.push_str("index.html");
        }

        if uri.contains("cgi") {
            return Err(Rejection::DynamicContent(filename));
        }

        let relative = Path::new(&filename);
        if relative.components().any(|c| c == Component::ParentDir) {
            return Err(Rejection::Traversal(filename));
        }

        let path = self.root.join(relative);
        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(_) => return Err(Rejection::NotFound(filename)),
        };

        if !metadata.is_file() || !owner_readable(&metadata) {
            return Err(Rejection::Unreadable(filename));
        }

        Ok(ResolvedFile {
            path,
            size: metadata.len(),
        })
    }
}

#[cfg(unix)]
fn owner_readable(metadata: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o400 != 0
}

#[cfg(not(unix))]
fn owner_readable(_metadata: &fs::Metadata) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::SchedPolicy;
    use std::io::{self, Cursor};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tempfile::{tempdir, TempDir};

    /// Conexión en memoria: lee `input` y acumula lo escrito en `output`
    struct MockConnection {
        input: Cursor<Vec<u8>>,
        output: Arc<Mutex<Vec<u8>>>,
    }

    impl MockConnection {
        fn new(raw: &str) -> (Self, Arc<Mutex<Vec<u8>>>) {
            let output = Arc::new(Mutex::new(Vec::new()));
            let connection = Self {
                input: Cursor::new(raw.as_bytes().to_vec()),
                output: Arc::clone(&output),
            };
            (connection, output)
        }
    }

    impl Read for MockConnection {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.input.read(buf)
        }
    }

    impl Write for MockConnection {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.output.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn setup() -> (TempDir, Dispatcher<MockConnection>, RequestQueue<MockConnection>, MetricsCollector) {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "<h1>home</h1>").unwrap();
        fs::write(dir.path().join("big.jpg"), vec![0u8; 2048]).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let queue = RequestQueue::new(8, SchedPolicy::Fifo);
        let metrics = MetricsCollector::new();
        let dispatcher = Dispatcher::new(dir.path(), queue.clone(), metrics.clone());
        (dir, dispatcher, queue, metrics)
    }

    fn response_text(output: &Arc<Mutex<Vec<u8>>>) -> String {
        String::from_utf8(output.lock().unwrap().clone()).unwrap()
    }

    #[test]
    fn test_valid_request_is_enqueued() {
        let (dir, dispatcher, queue, metrics) = setup();
        let (connection, output) = MockConnection::new("GET /big.jpg HTTP/1.0\r\nHost: x\r\n\r\n");

        assert!(dispatcher.dispatch(connection).is_ok());
        assert_eq!(queue.len(), 1);
        assert!(output.lock().unwrap().is_empty(), "dispatcher must not answer valid requests");

        let descriptor = queue.dequeue_timeout(Duration::from_secs(1)).unwrap();
        assert_eq!(descriptor.path(), dir.path().join("./big.jpg"));
        assert_eq!(descriptor.size(), 2048);
        assert_eq!(metrics.snapshot().enqueued, 1);
    }

    #[test]
    fn test_trailing_slash_serves_index() {
        let (_dir, dispatcher, queue, _) = setup();
        let (connection, _) = MockConnection::new("GET / HTTP/1.0\r\n\r\n");

        dispatcher.dispatch(connection).unwrap();
        let descriptor = queue.dequeue_timeout(Duration::from_secs(1)).unwrap();
        assert!(descriptor.path().ends_with("index.html"));
        assert_eq!(descriptor.size(), 13);
    }

    #[test]
    fn test_query_string_is_ignored() {
        let (_dir, dispatcher, queue, _) = setup();
        let (connection, _) = MockConnection::new("GET /index.html?v=2 HTTP/1.0\r\n\r\n");

        dispatcher.dispatch(connection).unwrap();
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_traversal_is_forbidden_and_never_enqueued() {
        let (_dir, dispatcher, queue, metrics) = setup();
        let (connection, output) = MockConnection::new("GET /../../etc/passwd HTTP/1.0\r\n\r\n");

        let result = dispatcher.dispatch(connection);

        assert!(matches!(result, Err(Rejection::Traversal(_))));
        assert_eq!(queue.len(), 0);
        let text = response_text(&output);
        assert!(text.starts_with("HTTP/1.0 403 Forbidden\r\n"));
        assert!(text.contains("Directory Traversal Attempt"));
        assert_eq!(metrics.snapshot().rejections.get(&403), Some(&1));
        assert_eq!(metrics.snapshot().enqueued, 0);
    }

    #[test]
    fn test_relative_traversal_without_leading_slash() {
        let (_dir, dispatcher, queue, _) = setup();
        let (connection, _) = MockConnection::new("GET ../../etc/passwd HTTP/1.0\r\n\r\n");

        assert!(matches!(dispatcher.dispatch(connection), Err(Rejection::Traversal(_))));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let (_dir, dispatcher, queue, _) = setup();
        let (connection, output) = MockConnection::new("GET /nope.html HTTP/1.0\r\n\r\n");

        assert_eq!(
            dispatcher.dispatch(connection),
            Err(Rejection::NotFound("./nope.html".to_string()))
        );
        assert!(queue.is_empty());
        assert!(response_text(&output).starts_with("HTTP/1.0 404 Not found\r\n"));
    }

    #[test]
    fn test_not_found_uses_lowercase_short_message() {
        let (_dir, dispatcher, _, _) = setup();
        let (connection, output) = MockConnection::new("GET /nope.html HTTP/1.0\r\n\r\n");

        dispatcher.dispatch(connection).unwrap_err();
        let text = response_text(&output);
        assert!(text.starts_with("HTTP/1.0 404 Not found\r\n"));
        assert!(text.contains("<h2>404: Not found</h2>"));
    }

    #[test]
    fn test_header_without_colon_is_ignored() {
        let (_dir, dispatcher, queue, _) = setup();
        let (connection, output) = MockConnection::new("GET /index.html HTTP/1.0\r\nX-Weird\r\n\r\n");

        assert!(dispatcher.dispatch(connection).is_ok());
        assert_eq!(queue.len(), 1);
        assert!(output.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unusual_version_token_is_served() {
        let (_dir, dispatcher, queue, _) = setup();
        let (connection, _) = MockConnection::new("GET /index.html HTTP/2.0\r\n\r\n");

        assert!(dispatcher.dispatch(connection).is_ok());
        let descriptor = queue.dequeue_timeout(Duration::from_secs(1)).unwrap();
        assert!(descriptor.path().ends_with("index.html"));
    }

    #[test]
    fn test_enqueued_is_counted_before_a_worker_can_see_it() {
        let (_dir, dispatcher, queue, metrics) = setup();
        let consumer = {
            let queue = queue.clone();
            let metrics = metrics.clone();
            std::thread::spawn(move || {
                queue.dequeue_next();
                metrics.snapshot().enqueued
            })
        };

        let (connection, _) = MockConnection::new("GET /index.html HTTP/1.0\r\n\r\n");
        dispatcher.dispatch(connection).unwrap();
        assert_eq!(consumer.join().unwrap(), 1);
    }

    #[test]
    fn test_directory_is_forbidden() {
        let (_dir, dispatcher, queue, _) = setup();
        let (connection, _) = MockConnection::new("GET /sub HTTP/1.0\r\n\r\n");

        assert_eq!(
            dispatcher.dispatch(connection),
            Err(Rejection::Unreadable("./sub".to_string()))
        );
        assert!(queue.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_file_is_forbidden() {
        use std::os::unix::fs::PermissionsExt;

        let (dir, dispatcher, queue, _) = setup();
        let secret = dir.path().join("secret.txt");
        fs::write(&secret, "x").unwrap();
        fs::set_permissions(&secret, fs::Permissions::from_mode(0o200)).unwrap();

        let (connection, output) = MockConnection::new("GET /secret.txt HTTP/1.0\r\n\r\n");
        assert!(matches!(dispatcher.dispatch(connection), Err(Rejection::Unreadable(_))));
        assert!(queue.is_empty());
        assert!(response_text(&output).contains("server could not read this file"));
    }

    #[test]
    fn test_unsupported_method() {
        let (_dir, dispatcher, queue, _) = setup();
        let (connection, output) = MockConnection::new("DELETE /index.html HTTP/1.0\r\n\r\n");

        assert_eq!(
            dispatcher.dispatch(connection),
            Err(Rejection::NotImplemented("DELETE".to_string()))
        );
        assert!(queue.is_empty());
        assert!(response_text(&output).starts_with("HTTP/1.0 501 Not Implemented\r\n"));
    }

    #[test]
    fn test_dynamic_content_is_refused() {
        let (_dir, dispatcher, queue, _) = setup();
        let (connection, _) = MockConnection::new("GET /cgi-bin/run?x=1 HTTP/1.0\r\n\r\n");

        assert!(matches!(dispatcher.dispatch(connection), Err(Rejection::DynamicContent(_))));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_malformed_request_line() {
        let (_dir, dispatcher, queue, _) = setup();
        let (connection, output) = MockConnection::new("GET\r\n\r\n");

        assert_eq!(dispatcher.dispatch(connection), Err(Rejection::BadRequest));
        assert!(queue.is_empty());
        let text = response_text(&output);
        assert!(text.starts_with("HTTP/1.0 400 Bad Request\r\n"));
        assert!(text.contains("Malformed request line: unknown"));
    }
}
