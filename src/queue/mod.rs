//! # Cola de Requests
//! src/queue/mod.rs
//!
//! Núcleo concurrente del servidor: el buffer acotado que conecta al
//! thread aceptador con el pool de workers, y las políticas que deciden
//! el orden de atención.
//!
//! ```text
//! accept -> resolver path -> enqueue (bloquea si está llena)
//!        -> worker: dequeue_next según política -> servir -> cerrar
//! ```

pub mod bounded;
pub mod descriptor;
pub mod policy;

pub use bounded::RequestQueue;
pub use descriptor::RequestDescriptor;
pub use policy::SchedPolicy;
