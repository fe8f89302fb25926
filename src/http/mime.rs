//! # Tipos de Contenido
//! src/http/mime.rs
//!
//! Inferencia del `Content-Type` a partir de la extensión del archivo.

use std::path::Path;

/// Tipo usado cuando la extensión no es conocida
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// Infiere el content type por extensión (sin distinguir mayúsculas)
///
/// # Ejemplo
/// ```
/// use static_http_server::http::mime::content_type_for;
/// use std::path::Path;
///
/// assert_eq!(content_type_for(Path::new("./index.html")), "text/html");
/// assert_eq!(content_type_for(Path::new("./notes")), "text/plain");
/// ```
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => ext.to_ascii_lowercase(),
        None => return DEFAULT_CONTENT_TYPE,
    };

    match ext.as_str() {
        "html" | "htm" => "text/html",
        "gif" => "image/gif",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "css" => "text/css",
        "js" => "application/javascript",
        _ => DEFAULT_CONTENT_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(content_type_for(Path::new("a.html")), "text/html");
        assert_eq!(content_type_for(Path::new("a.gif")), "image/gif");
        assert_eq!(content_type_for(Path::new("a.jpg")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("a.JPEG")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("dir/style.css")), "text/css");
    }

    #[test]
    fn test_unknown_or_missing_extension() {
        assert_eq!(content_type_for(Path::new("a.tar")), "text/plain");
        assert_eq!(content_type_for(Path::new("README")), "text/plain");
    }
}
