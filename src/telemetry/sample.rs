//! Telemetry sample as reported by the backend's `/stats` endpoint

use serde::{Deserialize, Serialize};

/// One snapshot of system metrics.
///
/// `gpu` and `vitals` are independently optional; a sample carrying neither
/// is still a complete, valid sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub cpu: f64,
    pub ram: RamStats,
    #[serde(default)]
    pub gpu: Option<GpuStats>,
    #[serde(default)]
    pub vitals: Option<Vitals>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RamStats {
    pub percent: f64,
    #[serde(default)]
    pub used_gb: Option<f64>,
    #[serde(default)]
    pub total_gb: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuStats {
    pub load: f64,
    pub temperature: f64,
    #[serde(default)]
    pub name: Option<String>,
    /// MB
    #[serde(default)]
    pub memory_used: Option<f64>,
    /// MB
    #[serde(default)]
    pub memory_total: Option<f64>,
}

/// Operator biometrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    pub bpm: f64,
    pub spo2: f64,
    pub stress: f64,
}

impl MetricSample {
    /// Minimal sample with only the mandatory fields.
    pub fn new(cpu: f64, ram_percent: f64) -> Self {
        Self {
            cpu,
            ram: RamStats {
                percent: ram_percent,
                used_gb: None,
                total_gb: None,
            },
            gpu: None,
            vitals: None,
        }
    }

    pub fn with_gpu(mut self, load: f64, temperature: f64) -> Self {
        self.gpu = Some(GpuStats {
            load,
            temperature,
            name: None,
            memory_used: None,
            memory_total: None,
        });
        self
    }

    pub fn with_vitals(mut self, bpm: f64, spo2: f64, stress: f64) -> Self {
        self.vitals = Some(Vitals { bpm, spo2, stress });
        self
    }
}
