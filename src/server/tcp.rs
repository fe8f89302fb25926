//! # Servidor TCP
//! src/server/tcp.rs
//!
//! Un único thread acepta conexiones y las pasa por el dispatcher; el pool
//! de workers las atiende desde la cola acotada.
//!
//! ```text
//! TcpListener ──accept──> Dispatcher ──enqueue──> RequestQueue
//!                                                    │ dequeue_next
//!                                     worker-0 … worker-N-1 ──> StaticFileTransfer
//! ```

use crate::config::Config;
use crate::error::ServerError;
use crate::metrics::MetricsCollector;
use crate::queue::RequestQueue;
use crate::server::Dispatcher;
use crate::transfer::StaticFileTransfer;
use crate::workers::WorkerPool;
use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{error, info, warn};

/// Tiempo máximo que el aceptador espera la request line de un cliente
const READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Servidor HTTP/1.0 de archivos estáticos
pub struct Server {
    config: Config,
    listener: TcpListener,
    queue: RequestQueue<TcpStream>,
    metrics: MetricsCollector,
    workers: WorkerPool,
}

impl Server {
    /// Valida la configuración, hace bind y lanza los workers
    ///
    /// Los workers quedan esperando en la cola hasta que `run` empiece a
    /// aceptar conexiones.
    pub fn new(config: Config) -> Result<Self, ServerError> {
        config.validate()?;

        let address = config.address();
        let listener = TcpListener::bind(&address)
            .map_err(|source| ServerError::Bind { address, source })?;

        let queue = RequestQueue::new(config.buffers, config.schedalg);
        let metrics = MetricsCollector::new();
        let workers = WorkerPool::spawn(
            config.threads,
            queue.clone(),
            Arc::new(StaticFileTransfer),
            metrics.clone(),
        )?;

        if config.stats_interval > 0 {
            Self::spawn_stats_reporter(
                metrics.clone(),
                queue.clone(),
                Duration::from_secs(config.stats_interval),
            )?;
        }

        Ok(Self {
            config,
            listener,
            queue,
            metrics,
            workers,
        })
    }

    /// Loguea periódicamente un snapshot de métricas en JSON
    fn spawn_stats_reporter(
        metrics: MetricsCollector,
        queue: RequestQueue<TcpStream>,
        interval: Duration,
    ) -> Result<(), ServerError> {
        let name = "stats".to_string();
        thread::Builder::new()
            .name(name.clone())
            .spawn(move || loop {
                thread::sleep(interval);
                info!(
                    queue_depth = queue.len(),
                    metrics = %metrics.snapshot_json(),
                    "server stats"
                );
            })
            .map_err(|source| ServerError::Spawn { name, source })?;
        Ok(())
    }

    /// Dirección real en la que escucha (útil con puerto 0)
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    pub fn queue(&self) -> &RequestQueue<TcpStream> {
        &self.queue
    }

    /// Loop del aceptador. Solo retorna si el listener deja de producir
    /// conexiones.
    pub fn run(self) -> Result<(), ServerError> {
        let address = self.local_addr()?;
        info!(
            %address,
            workers = self.workers.len(),
            buffers = self.queue.capacity(),
            policy = %self.queue.policy(),
            "server listening"
        );

        let dispatcher = Dispatcher::new(
            self.config.basedir.clone(),
            self.queue.clone(),
            self.metrics.clone(),
        );

        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => {
                    if let Err(e) = stream.set_read_timeout(Some(READ_TIMEOUT)) {
                        warn!(error = %e, "cannot set read timeout");
                    }
                    // Los rechazos ya se respondieron y loguearon adentro
                    let _ = dispatcher.dispatch(stream);
                }
                Err(e) => {
                    error!(error = %e, "failed to accept connection");
                }
            }
        }

        Ok(())
    }
}
