//! # Pool de Workers
//! src/workers/pool.rs
//!
//! Conjunto fijo de threads que drenan la cola de requests. Cada worker:
//!
//! 1. Desencola el próximo descriptor (se suspende si la cola está vacía)
//! 2. Transfiere el archivo por la conexión
//! 3. Cierra la conexión y vuelve a empezar
//!
//! Los workers no terminan mientras viva el proceso. Una transferencia que
//! falla (o entra en pánico) solo afecta a su propio descriptor.

use crate::error::{ServerError, TransferError};
use crate::metrics::MetricsCollector;
use crate::queue::RequestQueue;
use crate::transfer::FileTransfer;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Pool de tamaño fijo, creado una vez al arrancar
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Lanza `size` workers que consumen de `queue`
    ///
    /// Los threads se llaman `worker-{i}`.
    pub fn spawn<C, T>(
        size: usize,
        queue: RequestQueue<C>,
        transfer: Arc<T>,
        metrics: MetricsCollector,
    ) -> Result<Self, ServerError>
    where
        C: Send + 'static,
        T: FileTransfer<C> + 'static,
    {
        let mut handles = Vec::with_capacity(size);

        for i in 0..size {
            let name = format!("worker-{}", i);
            let queue = queue.clone();
            let transfer = Arc::clone(&transfer);
            let metrics = metrics.clone();

            let handle = thread::Builder::new()
                .name(name.clone())
                .spawn(move || Self::worker_loop(queue, transfer, metrics))
                .map_err(|source| ServerError::Spawn { name, source })?;
            handles.push(handle);
        }

        info!(workers = size, policy = %queue.policy(), "worker pool started");
        Ok(Self { handles })
    }

    /// Loop principal del worker
    fn worker_loop<C, T>(queue: RequestQueue<C>, transfer: Arc<T>, metrics: MetricsCollector)
    where
        T: FileTransfer<C>,
    {
        debug!("worker started");

        loop {
            // Esperar por un request
            let descriptor = queue.dequeue_next();
            let (mut connection, path, size) = descriptor.into_parts();
            let start = Instant::now();

            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                transfer.serve(&mut connection, &path, size)
            }))
            .unwrap_or(Err(TransferError::Panicked));

            // Cerrar la conexión antes de tomar el siguiente
            drop(connection);

            match outcome {
                Ok(bytes) => {
                    let latency = start.elapsed();
                    metrics.record_transfer(bytes, latency);
                    debug!(
                        path = %path.display(),
                        bytes,
                        latency_ms = latency.as_secs_f64() * 1000.0,
                        "file served"
                    );
                }
                Err(e) => {
                    metrics.record_failure();
                    warn!(path = %path.display(), size, error = %e, "transfer abandoned");
                }
            }
        }
    }

    /// Número de workers
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
