//! # Static HTTP Server - Entry Point
//! src/main.rs
//!
//! Punto de entrada del servidor HTTP/1.0.

use static_http_server::config::Config;
use static_http_server::logging;
use static_http_server::server::Server;
use tracing::error;

fn main() {
    let config = Config::new();

    if let Err(e) = logging::init_logging(&config.log_level) {
        eprintln!("{}", e);
    }

    config.print_summary();

    // Crear el servidor (valida config, bind y workers)
    let server = match Server::new(config) {
        Ok(server) => server,
        Err(e) => {
            error!(error = %e, "startup failed");
            std::process::exit(1);
        }
    };

    // Iniciar el aceptador (esto bloqueará el thread)
    if let Err(e) = server.run() {
        error!(error = %e, "server stopped");
        std::process::exit(1);
    }
}
