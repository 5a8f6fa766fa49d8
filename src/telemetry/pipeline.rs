//! Sample → presentation transform
//!
//! Each tick is independent: smooth the CPU value, push it into the history,
//! project the graph and build a [`TelemetryFrame`] that is applied to the
//! surface in one step.

use super::history::MetricHistory;
use super::sample::MetricSample;
use crate::ui::surface::TelemetryView;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Presentation band for a 0..100 load value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadClass {
    #[default]
    Low,
    Medium,
    High,
}

impl LoadClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadClass::Low => "load-low",
            LoadClass::Medium => "load-med",
            LoadClass::High => "load-high",
        }
    }
}

/// `<50` low, `<80` medium, else high. 50 and 80 belong to the higher band.
pub fn classify_load(value: f64) -> LoadClass {
    if value < 50.0 {
        LoadClass::Low
    } else if value < 80.0 {
        LoadClass::Medium
    } else {
        LoadClass::High
    }
}

/// Largest offset that still means anything on a percentage scale.
pub const MAX_JITTER: f64 = 100.0;

/// Apply up to `±jitter` of random offset and clamp to `[0, 100]`.
/// Non-finite jitter is treated as none.
pub fn smooth_cpu<R: Rng + ?Sized>(raw: f64, jitter: f64, rng: &mut R) -> f64 {
    if !raw.is_finite() {
        return 0.0;
    }
    let jitter = sanitize_jitter(jitter);
    let offset = if jitter > 0.0 {
        rng.gen_range(-jitter..jitter)
    } else {
        0.0
    };
    (raw + offset).clamp(0.0, 100.0)
}

fn sanitize_jitter(jitter: f64) -> f64 {
    if jitter.is_finite() {
        jitter.clamp(0.0, MAX_JITTER)
    } else {
        0.0
    }
}

/// A vertex of the CPU polyline
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GraphPoint {
    pub x: f32,
    pub y: f32,
}

/// Map history index `i` to `x = i * width / (len - 1)` and value `v` to
/// `y = height - v / 100 * height`.
pub fn project_graph(history: &MetricHistory, width: f32, height: f32) -> Vec<GraphPoint> {
    let step = width / (history.len().saturating_sub(1).max(1)) as f32;
    history
        .iter()
        .enumerate()
        .map(|(i, v)| GraphPoint {
            x: i as f32 * step,
            y: height - (v as f32 / 100.0) * height,
        })
        .collect()
}

/// A horizontal meter
#[derive(Debug, Clone, PartialEq)]
pub struct BarView {
    /// Fill, 0..=100
    pub width_pct: f32,
    pub load: LoadClass,
    pub label: String,
}

impl Default for BarView {
    fn default() -> Self {
        Self {
            width_pct: 0.0,
            load: LoadClass::Low,
            label: "0%".to_string(),
        }
    }
}

impl BarView {
    pub fn new(value: f64, label: impl Into<String>) -> Self {
        Self {
            width_pct: value.clamp(0.0, 100.0) as f32,
            load: classify_load(value),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GpuView {
    pub load: BarView,
    pub temperature_label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VitalsView {
    pub bpm_label: String,
    pub spo2: BarView,
    pub stress: BarView,
}

/// Extra figures shown in the diagnostics overlay when the backend reports them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelemetryDetail {
    pub ram_usage: Option<String>,
    pub gpu_name: Option<String>,
    pub gpu_memory: Option<String>,
}

/// Everything one tick writes to the surface
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryFrame {
    pub cpu: BarView,
    pub graph: Vec<GraphPoint>,
    pub ram: BarView,
    pub gpu: Option<GpuView>,
    pub vitals: Option<VitalsView>,
    pub core_readout: u32,
    pub detail: TelemetryDetail,
}

impl TelemetryFrame {
    /// Write this frame into the view. Absent GPU or vitals segments leave
    /// whatever was rendered before untouched.
    pub fn apply(&self, view: &mut TelemetryView) {
        view.cpu = self.cpu.clone();
        view.graph = self.graph.clone();
        view.ram = self.ram.clone();
        view.core_readout = self.core_readout;

        if let Some(gpu) = &self.gpu {
            view.gpu = Some(gpu.clone());
        }
        if let Some(vitals) = &self.vitals {
            view.vitals = Some(vitals.clone());
        }

        if self.detail.ram_usage.is_some() {
            view.detail.ram_usage = self.detail.ram_usage.clone();
        }
        if self.detail.gpu_name.is_some() {
            view.detail.gpu_name = self.detail.gpu_name.clone();
        }
        if self.detail.gpu_memory.is_some() {
            view.detail.gpu_memory = self.detail.gpu_memory.clone();
        }

        view.frames += 1;
    }
}

/// Rolling CPU history plus the transforms that turn a sample into a frame
pub struct TelemetryPipeline {
    history: MetricHistory,
    rng: StdRng,
    jitter: f64,
    graph_width: f32,
    graph_height: f32,
}

impl TelemetryPipeline {
    pub fn new(history_len: usize, jitter: f64) -> Self {
        Self {
            history: MetricHistory::new(history_len),
            rng: StdRng::from_entropy(),
            jitter: sanitize_jitter(jitter),
            graph_width: 300.0,
            graph_height: 100.0,
        }
    }

    pub fn with_graph_size(mut self, width: f32, height: f32) -> Self {
        self.graph_width = width;
        self.graph_height = height;
        self
    }

    /// Deterministic jitter
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn history(&self) -> &MetricHistory {
        &self.history
    }

    /// Transform one sample. The history is only touched here, so a failed
    /// fetch that never reaches this call leaves it unchanged.
    pub fn render(&mut self, sample: &MetricSample) -> TelemetryFrame {
        let cpu = smooth_cpu(sample.cpu, self.jitter, &mut self.rng);
        self.history.push(cpu);

        let gpu = sample.gpu.as_ref().map(|gpu| GpuView {
            load: BarView::new(gpu.load, format!("{}%", gpu.load.round())),
            temperature_label: format!("{}°C", gpu.temperature),
        });

        let vitals = sample.vitals.as_ref().map(|v| VitalsView {
            bpm_label: format!("{} BPM", v.bpm),
            spo2: BarView::new(v.spo2, format!("{}%", v.spo2)),
            stress: BarView::new(v.stress, format!("{}%", v.stress)),
        });

        let detail = TelemetryDetail {
            ram_usage: match (sample.ram.used_gb, sample.ram.total_gb) {
                (Some(used), Some(total)) => Some(format!("{:.1} / {:.1} GB", used, total)),
                _ => None,
            },
            gpu_name: sample.gpu.as_ref().and_then(|g| g.name.clone()),
            gpu_memory: sample
                .gpu
                .as_ref()
                .and_then(|g| match (g.memory_used, g.memory_total) {
                    (Some(used), Some(total)) => Some(format!("{:.0} / {:.0} MB", used, total)),
                    _ => None,
                }),
        };

        TelemetryFrame {
            cpu: BarView::new(cpu, format!("{}%", cpu.round())),
            graph: project_graph(&self.history, self.graph_width, self.graph_height),
            ram: BarView::new(sample.ram.percent, format!("{}%", sample.ram.percent)),
            gpu,
            vitals,
            core_readout: cpu.floor() as u32,
            detail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_load_boundaries() {
        assert_eq!(classify_load(0.0), LoadClass::Low);
        assert_eq!(classify_load(49.9), LoadClass::Low);
        assert_eq!(classify_load(50.0), LoadClass::Medium);
        assert_eq!(classify_load(79.9), LoadClass::Medium);
        assert_eq!(classify_load(80.0), LoadClass::High);
        assert_eq!(classify_load(100.0), LoadClass::High);
    }

    #[test]
    fn test_smooth_cpu_stays_within_jitter_and_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let v = smooth_cpu(50.0, 1.0, &mut rng);
            assert!((49.0..=51.0).contains(&v));

            let low = smooth_cpu(0.2, 1.0, &mut rng);
            assert!((0.0..=1.2).contains(&low));

            let high = smooth_cpu(99.9, 1.0, &mut rng);
            assert!((98.9..=100.0).contains(&high));
        }
    }

    #[test]
    fn test_smooth_cpu_without_jitter_is_identity() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(smooth_cpu(42.0, 0.0, &mut rng), 42.0);
        assert_eq!(smooth_cpu(150.0, 0.0, &mut rng), 100.0);
        assert_eq!(smooth_cpu(f64::NAN, 0.0, &mut rng), 0.0);
    }

    #[test]
    fn test_extreme_jitter_is_tamed() {
        for jitter in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN, 1e308] {
            let mut pipeline = TelemetryPipeline::new(20, jitter).with_seed(3);
            for _ in 0..50 {
                let frame = pipeline.render(&MetricSample::new(40.0, 10.0));
                assert!((0.0..=100.0).contains(&pipeline.history().latest()));
                assert!(frame.core_readout <= 100);
            }
        }

        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(smooth_cpu(40.0, f64::INFINITY, &mut rng), 40.0);
        assert!((0.0..=100.0).contains(&smooth_cpu(40.0, 1e308, &mut rng)));
    }

    #[test]
    fn test_project_graph_coordinates() {
        let mut history = MetricHistory::new(3);
        history.push(0.0);
        history.push(50.0);
        history.push(100.0);

        let points = project_graph(&history, 200.0, 100.0);
        assert_eq!(
            points,
            vec![
                GraphPoint { x: 0.0, y: 100.0 },
                GraphPoint { x: 100.0, y: 50.0 },
                GraphPoint { x: 200.0, y: 0.0 },
            ]
        );
    }

    #[test]
    fn test_project_graph_is_monotonic_in_x() {
        let history = MetricHistory::default();
        let points = project_graph(&history, 300.0, 100.0);
        assert_eq!(points.len(), 20);
        assert!(points.windows(2).all(|w| w[0].x < w[1].x));
        assert_eq!(points.last().map(|p| p.x), Some(300.0));
    }

    #[test]
    fn test_render_labels() {
        let mut pipeline = TelemetryPipeline::new(20, 0.0);
        let sample = MetricSample::new(63.6, 55.1)
            .with_gpu(12.0, 48.0)
            .with_vitals(72.0, 98.0, 20.0);

        let frame = pipeline.render(&sample);
        assert_eq!(frame.cpu.label, "64%");
        assert_eq!(frame.cpu.load, LoadClass::Medium);
        assert_eq!(frame.core_readout, 63);
        assert_eq!(frame.ram.label, "55.1%");

        let gpu = frame.gpu.unwrap();
        assert_eq!(gpu.temperature_label, "48°C");
        assert_eq!(gpu.load.width_pct, 12.0);

        let vitals = frame.vitals.unwrap();
        assert_eq!(vitals.bpm_label, "72 BPM");
        assert_eq!(vitals.spo2.label, "98%");
        assert_eq!(vitals.stress.label, "20%");
        assert_eq!(pipeline.history().latest(), 63.6);
    }

    #[test]
    fn test_apply_keeps_previous_optional_segments() {
        let mut pipeline = TelemetryPipeline::new(20, 0.0);
        let mut view = TelemetryView::default();

        pipeline
            .render(&MetricSample::new(10.0, 20.0).with_gpu(30.0, 60.0))
            .apply(&mut view);
        pipeline.render(&MetricSample::new(90.0, 20.0)).apply(&mut view);

        assert_eq!(view.cpu.load, LoadClass::High);
        assert_eq!(view.gpu.as_ref().map(|g| g.temperature_label.as_str()), Some("60°C"));
        assert!(view.vitals.is_none());
        assert_eq!(view.frames, 2);
    }

    #[test]
    fn test_detail_formatting() {
        let mut pipeline = TelemetryPipeline::new(20, 0.0);
        let mut sample = MetricSample::new(5.0, 50.0).with_gpu(1.0, 40.0);
        sample.ram.used_gb = Some(12.34);
        sample.ram.total_gb = Some(31.9);
        if let Some(gpu) = sample.gpu.as_mut() {
            gpu.name = Some("RTX 3060".into());
            gpu.memory_used = Some(4096.0);
            gpu.memory_total = Some(8192.0);
        }

        let frame = pipeline.render(&sample);
        assert_eq!(frame.detail.ram_usage.as_deref(), Some("12.3 / 31.9 GB"));
        assert_eq!(frame.detail.gpu_name.as_deref(), Some("RTX 3060"));
        assert_eq!(frame.detail.gpu_memory.as_deref(), Some("4096 / 8192 MB"));
    }
}
