//! # Políticas de Planificación
//! src/queue/policy.rs
//!
//! Regla que decide qué descriptor encolado se atiende a continuación.
//! Se elige una sola vez al arrancar y después es de solo lectura.
//!
//! | Política | Selección                               | Costo |
//! |----------|-----------------------------------------|-------|
//! | FIFO     | el más antiguo (cabeza de la cola)      | O(1)  |
//! | SFF      | el de menor `size`; empate: el más viejo | O(n)  |
//! | RANDOM   | uno uniforme entre los encolados        | O(n)  |
//!
//! SFF y RANDOM rompen el orden de llegada a propósito: SFF aproxima
//! shortest-job-first y puede postergar indefinidamente archivos grandes
//! bajo carga sostenida.

use super::RequestDescriptor;
use clap::ValueEnum;
use rand::Rng;
use std::collections::VecDeque;
use std::fmt;

/// Algoritmo de planificación de la cola de requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SchedPolicy {
    /// First In, First Out
    #[default]
    #[value(name = "FIFO")]
    Fifo,

    /// Smallest File First
    #[value(name = "SFF")]
    Sff,

    /// Selección aleatoria uniforme
    #[value(name = "RANDOM")]
    Random,
}

impl SchedPolicy {
    /// Elige el índice (relativo a la cabeza) del próximo descriptor
    ///
    /// Retorna `None` solo si la cola está vacía.
    pub fn select<C>(&self, queued: &VecDeque<RequestDescriptor<C>>) -> Option<usize> {
        if queued.is_empty() {
            return None;
        }

        match self {
            SchedPolicy::Fifo => Some(0),
            // min_by_key se queda con el primero entre iguales
            SchedPolicy::Sff => queued
                .iter()
                .enumerate()
                .min_by_key(|(_, descriptor)| descriptor.size())
                .map(|(index, _)| index),
            SchedPolicy::Random => Some(rand::thread_rng().gen_range(0..queued.len())),
        }
    }

    /// Selecciona y remueve un descriptor preservando el orden del resto
    pub fn remove_next<C>(
        &self,
        queued: &mut VecDeque<RequestDescriptor<C>>,
    ) -> Option<RequestDescriptor<C>> {
        let index = self.select(queued)?;
        queued.remove(index)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SchedPolicy::Fifo => "FIFO",
            SchedPolicy::Sff => "SFF",
            SchedPolicy::Random => "RANDOM",
        }
    }
}

impl fmt::Display for SchedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
