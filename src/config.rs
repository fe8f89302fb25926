//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración de arranque del servidor con soporte para argumentos CLI y
//! variables de entorno. Se lee una sola vez y luego es de solo lectura.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./static_http_server -d ./www -p 8003 -t 8 -b 16 -s SFF
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! SERVER_PORT=8003 SERVER_SCHEDALG=RANDOM ./static_http_server
//! ```

use crate::error::ConfigError;
use crate::logging::DEFAULT_LOG_LEVEL;
use crate::queue::SchedPolicy;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// Configuración del servidor HTTP/1.0
#[derive(Debug, Clone, Parser)]
#[command(name = "static_http_server")]
#[command(about = "Servidor HTTP/1.0 de archivos estáticos con pool de workers")]
#[command(version)]
pub struct Config {
    /// Directorio raíz que se sirve
    #[arg(short = 'd', long, default_value = ".", env = "SERVER_BASEDIR")]
    pub basedir: PathBuf,

    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "10000", env = "SERVER_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "127.0.0.1", env = "SERVER_HOST")]
    pub host: String,

    /// Número de workers del pool
    #[arg(short, long, default_value = "1", env = "SERVER_THREADS")]
    pub threads: usize,

    /// Capacidad de la cola de requests
    #[arg(short, long, default_value = "1", env = "SERVER_BUFFERS")]
    pub buffers: usize,

    /// Política de planificación
    #[arg(short, long, value_enum, ignore_case = true, default_value = "FIFO", env = "SERVER_SCHEDALG")]
    pub schedalg: SchedPolicy,

    /// Segundos entre logs de métricas (0 = desactivado)
    #[arg(long = "stats-interval", default_value = "0", env = "SERVER_STATS_INTERVAL")]
    pub stats_interval: u64,

    /// Nivel de log por defecto (RUST_LOG tiene prioridad)
    #[arg(long = "log-level", default_value = DEFAULT_LOG_LEVEL, env = "SERVER_LOG_LEVEL")]
    pub log_level: String,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use static_http_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "127.0.0.1:10000");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valida la configuración
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.threads == 0 {
            return Err(ConfigError::ZeroThreads);
        }
        if self.buffers == 0 {
            return Err(ConfigError::ZeroBuffers);
        }
        if !self.basedir.is_dir() {
            return Err(ConfigError::InvalidBaseDir(self.basedir.clone()));
        }
        Ok(())
    }

    /// Loguea un resumen de la configuración
    pub fn print_summary(&self) {
        info!(
            address = %self.address(),
            basedir = %self.basedir.display(),
            threads = self.threads,
            buffers = self.buffers,
            schedalg = %self.schedalg,
            stats_interval = self.stats_interval,
            "configuration loaded"
        );
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            basedir: PathBuf::from("."),
            port: 10000,
            host: "127.0.0.1".to_string(),
            threads: 1,
            buffers: 1,
            schedalg: SchedPolicy::Fifo,
            stats_interval: 0,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}
