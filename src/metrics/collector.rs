//! # Collector de Métricas
//! src/metrics/collector.rs
//!
//! Recolecta y agrega métricas del servidor en tiempo real: transferencias
//! completadas o abandonadas, rechazos del dispatcher y latencias de
//! servicio de los workers.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Máximo de latencias a guardar (para calcular percentiles)
const MAX_LATENCIES: usize = 10_000;

/// Collector de métricas thread-safe
#[derive(Clone)]
pub struct MetricsCollector {
    inner: Arc<Mutex<MetricsData>>,
    start_time: Instant,
}

/// Datos internos de métricas
#[derive(Default)]
struct MetricsData {
    /// Descriptores insertados en la cola
    enqueued: u64,

    /// Transferencias completas
    transfers_ok: u64,

    /// Transferencias abandonadas (archivo desaparecido, error de escritura)
    transfers_failed: u64,

    /// Bytes de body enviados
    bytes_sent: u64,

    /// Rechazos del dispatcher por código de estado
    rejections: BTreeMap<u16, u64>,

    /// Latencias de servicio (en microsegundos), ventana acotada
    latencies: Vec<u64>,
}

impl MetricsCollector {
    /// Crea un nuevo collector de métricas
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MetricsData {
                latencies: Vec::with_capacity(MAX_LATENCIES),
                ..MetricsData::default()
            })),
            start_time: Instant::now(),
        }
    }

    fn data(&self) -> MutexGuard<'_, MetricsData> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registra un descriptor encolado por el dispatcher
    pub fn record_enqueued(&self) {
        self.data().enqueued += 1;
    }

    /// Registra un request rechazado antes de la cola
    pub fn record_rejection(&self, status_code: u16) {
        *self.data().rejections.entry(status_code).or_insert(0) += 1;
    }

    /// Registra una transferencia completa y su latencia de servicio
    pub fn record_transfer(&self, bytes: u64, latency: Duration) {
        let mut data = self.data();
        data.transfers_ok += 1;
        data.bytes_sent += bytes;

        // Si tenemos demasiadas latencias, eliminar las más antiguas
        if data.latencies.len() >= MAX_LATENCIES {
            data.latencies.remove(0);
        }
        data.latencies.push(latency.as_micros() as u64);
    }

    /// Registra una transferencia abandonada
    pub fn record_failure(&self) {
        self.data().transfers_failed += 1;
    }

    /// Calcula percentiles de latencia
    fn calculate_percentiles(latencies: &[u64]) -> (u64, u64, u64, u64) {
        if latencies.is_empty() {
            return (0, 0, 0, 0);
        }

        let mut sorted = latencies.to_vec();
        sorted.sort_unstable();

        let len = sorted.len();
        let p50 = sorted[len * 50 / 100];
        let p95 = sorted[len * 95 / 100];
        let p99 = sorted[len * 99 / 100];

        let sum: u64 = sorted.iter().sum();
        let avg = sum / len as u64;

        (p50, p95, p99, avg)
    }

    /// Obtiene un snapshot de las métricas
    pub fn snapshot(&self) -> MetricsSnapshot {
        let data = self.data();
        let (p50, p95, p99, avg) = Self::calculate_percentiles(&data.latencies);

        MetricsSnapshot {
            uptime_secs: self.start_time.elapsed().as_secs(),
            enqueued: data.enqueued,
            transfers_ok: data.transfers_ok,
            transfers_failed: data.transfers_failed,
            bytes_sent: data.bytes_sent,
            rejections: data.rejections.clone(),
            latency_p50_us: p50,
            latency_p95_us: p95,
            latency_p99_us: p99,
            latency_avg_us: avg,
        }
    }

    /// Obtiene las métricas actuales en formato JSON
    pub fn snapshot_json(&self) -> String {
        // Un struct plano con claves numéricas no puede fallar al serializar
        serde_json::to_string(&self.snapshot()).unwrap_or_default()
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot de métricas (para logs y uso externo)
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub uptime_secs: u64,
    pub enqueued: u64,
    pub transfers_ok: u64,
    pub transfers_failed: u64,
    pub bytes_sent: u64,
    pub rejections: BTreeMap<u16, u64>,
    pub latency_p50_us: u64,
    pub latency_p95_us: u64,
    pub latency_p99_us: u64,
    pub latency_avg_us: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_outcomes() {
        let collector = MetricsCollector::new();

        collector.record_enqueued();
        collector.record_enqueued();
        collector.record_transfer(100, Duration::from_millis(10));
        collector.record_failure();
        collector.record_rejection(403);
        collector.record_rejection(403);
        collector.record_rejection(404);

        let snapshot = collector.snapshot();
        assert_eq!(snapshot.enqueued, 2);
        assert_eq!(snapshot.transfers_ok, 1);
        assert_eq!(snapshot.transfers_failed, 1);
        assert_eq!(snapshot.bytes_sent, 100);
        assert_eq!(snapshot.rejections.get(&403), Some(&2));
        assert_eq!(snapshot.rejections.get(&404), Some(&1));
    }

    #[test]
    fn test_percentiles() {
        let collector = MetricsCollector::new();

        for i in 1..=100 {
            collector.record_transfer(1, Duration::from_micros(i));
        }

        let snapshot = collector.snapshot();
        assert!(snapshot.latency_p50_us > 0);
        assert!(snapshot.latency_p95_us > snapshot.latency_p50_us);
        assert!(snapshot.latency_p99_us > snapshot.latency_p95_us);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = MetricsCollector::new().snapshot();
        assert_eq!(snapshot.transfers_ok, 0);
        assert_eq!(snapshot.latency_p99_us, 0);
    }

    #[test]
    fn test_latency_window_management() {
        let collector = MetricsCollector::new();

        for i in 0..15_000 {
            collector.record_transfer(0, Duration::from_micros(i));
        }

        let snapshot = collector.snapshot();
        assert_eq!(snapshot.transfers_ok, 15_000);
        assert!(collector.data().latencies.len() <= MAX_LATENCIES);
    }

    #[test]
    fn test_json_format() {
        let collector = MetricsCollector::new();
        collector.record_transfer(42, Duration::from_millis(5));
        collector.record_rejection(501);

        let json: serde_json::Value = serde_json::from_str(&collector.snapshot_json()).unwrap();
        assert_eq!(json["transfers_ok"], 1);
        assert_eq!(json["bytes_sent"], 42);
        assert_eq!(json["rejections"]["501"], 1);
    }
}
