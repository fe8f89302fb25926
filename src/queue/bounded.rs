//! # Cola Acotada de Requests
//! src/queue/bounded.rs
//!
//! Buffer productor/consumidor de capacidad fija, compartido entre el
//! thread que acepta conexiones y el pool de workers.
//!
//! ## Sincronización
//!
//! Un único `Mutex` protege el almacenamiento y dos `Condvar` señalan los
//! cambios de estado:
//!
//! - `not_full`: el productor espera aquí mientras la cola está llena
//! - `not_empty`: los workers esperan aquí mientras la cola está vacía
//!
//! No hay polling ni busy-waiting: los threads se suspenden en la condvar.
//! La selección según la política, la remoción y el corrimiento del resto
//! ocurren con el lock tomado, así que ningún otro thread observa estados
//! intermedios.

use super::{RequestDescriptor, SchedPolicy};
use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::debug;

/// Estado compartido entre todos los clones de la cola
struct Shared<C> {
    /// Descriptores en orden de llegada (cabeza = más antiguo)
    items: Mutex<VecDeque<RequestDescriptor<C>>>,

    /// Notifica cuando se libera un lugar
    not_full: Condvar,

    /// Notifica cuando llega un descriptor
    not_empty: Condvar,
}

/// Cola acotada thread-safe con política de remoción configurable
///
/// La capacidad y la política se fijan al construirla y no cambian durante
/// la vida del proceso. Los clones comparten el mismo almacenamiento.
pub struct RequestQueue<C> {
    shared: Arc<Shared<C>>,
    capacity: usize,
    policy: SchedPolicy,
}

impl<C> RequestQueue<C> {
    /// Crea una cola vacía
    ///
    /// # Panics
    ///
    /// Si `capacity` es 0: una cola sin lugares bloquearía a todos para
    /// siempre. `Config::validate` lo rechaza antes de llegar aquí.
    pub fn new(capacity: usize, policy: SchedPolicy) -> Self {
        assert!(capacity > 0, "queue capacity must be >= 1");

        Self {
            shared: Arc::new(Shared {
                items: Mutex::new(VecDeque::with_capacity(capacity)),
                not_full: Condvar::new(),
                not_empty: Condvar::new(),
            }),
            capacity,
            policy,
        }
    }

    /// Ningún thread deja la cola a medio modificar (las operaciones sobre
    /// el `VecDeque` no entran en pánico), así que un lock envenenado sigue
    /// siendo consistente.
    fn lock(&self) -> MutexGuard<'_, VecDeque<RequestDescriptor<C>>> {
        self.shared.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserta al final de la cola
    ///
    /// Bloquea mientras la cola está llena (backpressure sobre el productor).
    pub fn enqueue(&self, descriptor: RequestDescriptor<C>) {
        let capacity = self.capacity;
        let mut items = self
            .shared
            .not_full
            .wait_while(self.lock(), |items| items.len() >= capacity)
            .unwrap_or_else(PoisonError::into_inner);

        self.push(&mut items, descriptor);
    }

    /// Como `enqueue` pero esperando a lo sumo `timeout`
    ///
    /// Si no se liberó lugar a tiempo, devuelve el descriptor intacto.
    pub fn enqueue_timeout(
        &self,
        descriptor: RequestDescriptor<C>,
        timeout: Duration,
    ) -> Result<(), RequestDescriptor<C>> {
        let capacity = self.capacity;
        let (mut items, _) = self
            .shared
            .not_full
            .wait_timeout_while(self.lock(), timeout, |items| items.len() >= capacity)
            .unwrap_or_else(PoisonError::into_inner);

        if items.len() >= capacity {
            return Err(descriptor);
        }

        self.push(&mut items, descriptor);
        Ok(())
    }

    fn push(&self, items: &mut VecDeque<RequestDescriptor<C>>, descriptor: RequestDescriptor<C>) {
        debug!(
            path = %descriptor.path().display(),
            size = descriptor.size(),
            depth = items.len() + 1,
            "request enqueued"
        );
        items.push_back(descriptor);
        self.shared.not_empty.notify_one();
    }

    /// Remueve el descriptor que indique la política
    ///
    /// Bloquea mientras la cola está vacía. Cada descriptor se entrega a
    /// exactamente un llamador.
    pub fn dequeue_next(&self) -> RequestDescriptor<C> {
        let mut items = self.lock();

        loop {
            if let Some(descriptor) = self.pop(&mut items) {
                return descriptor;
            }

            // Esperar a que haya requests
            items = self
                .shared
                .not_empty
                .wait(items)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Como `dequeue_next` pero esperando a lo sumo `timeout`
    pub fn dequeue_timeout(&self, timeout: Duration) -> Option<RequestDescriptor<C>> {
        let (mut items, _) = self
            .shared
            .not_empty
            .wait_timeout_while(self.lock(), timeout, |items| items.is_empty())
            .unwrap_or_else(PoisonError::into_inner);

        self.pop(&mut items)
    }

    fn pop(&self, items: &mut VecDeque<RequestDescriptor<C>>) -> Option<RequestDescriptor<C>> {
        let descriptor = self.policy.remove_next(items)?;
        debug!(
            policy = %self.policy,
            path = %descriptor.path().display(),
            size = descriptor.size(),
            depth = items.len(),
            "request dequeued"
        );
        self.shared.not_full.notify_one();
        Some(descriptor)
    }

    /// Retorna el tamaño actual de la cola
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Verifica si la cola está vacía
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Verifica si la cola está llena
    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }

    /// Retorna la capacidad máxima
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Política activa
    pub fn policy(&self) -> SchedPolicy {
        self.policy
    }
}

impl<C> Clone for RequestQueue<C> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            capacity: self.capacity,
            policy: self.policy,
        }
    }
}
