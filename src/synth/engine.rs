//! Parametric single-beat synthesis.
//!
//! A beat is laid out left to right on a canvas as five segments (P, Q, R, S,
//! T). Each segment is a sampled sine or cosine whose angular frequency comes
//! from one clinical timing value treated as a period:
//!
//! - P: `sin(2π / (60 / heart_rate) · i + pr_interval / 1000)`, amplitude 0.10·H
//! - Q: `cos(2π / (qrs_duration / 1000) · i)`, amplitude 0.30·H, below baseline
//! - R: mirror of Q, above baseline
//! - S: `sin` at the QRS frequency, amplitude 0.30·H
//! - T: `cos(2π / (qtc_interval / 1000) · i)`, amplitude 0.20·H
//!
//! The trace opens with one anchor point at `x = 0`; each segment then emits
//! `i = 1..=n` at `start_x + i · W/100`, reusing the previous segment's last
//! point as its own `i = 0`. A full beat is therefore 291 points ending at
//! `x = 290 · W/100`.
use std::f64::consts::PI;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::synth::error::SynthError;
use crate::synth::trace::{Segment, SegmentSpan, Trace, WaveformPoint, BEAT_SAMPLES};
use crate::types::ClinicalParameters;

const P_AMPLITUDE: f32 = 0.10;
const QRS_AMPLITUDE: f32 = 0.30;
const T_AMPLITUDE: f32 = 0.20;
/// Samples per canvas width.
const SAMPLES_PER_WIDTH: f32 = 100.0;

/// Decides when the synthesizer draws the flat "no data" line instead of a beat.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FallbackMode {
    /// Legacy: flat line iff heart rate, PR, QRS and QTc equal the sentinel
    /// defaults exactly. Editing any one of them by any amount draws a beat.
    #[default]
    LegacySentinel,
    /// Flat line iff the caller says nothing was entered.
    Explicit { has_input: bool },
}

/// Stateless beat synthesizer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WaveformSynthesizer {
    mode: FallbackMode,
}

impl WaveformSynthesizer {
    pub fn new(mode: FallbackMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> FallbackMode {
        self.mode
    }

    /// Lay out one beat on a `width` x `height` canvas.
    ///
    /// Returns either a complete trace or an error, never a partial trace.
    pub fn synthesize(
        &self,
        params: &ClinicalParameters,
        width: f32,
        height: f32,
    ) -> Result<Trace, SynthError> {
        validate_canvas(width, height)?;
        if self.draws_flat_line(params) {
            debug!("flat-line fallback ({:?}) on {width}x{height}", self.mode);
            return Ok(Trace::flat_line(width, height));
        }
        let shape = BeatShape::new(params, height)?;
        let x_spacing = width / SAMPLES_PER_WIDTH;
        let mut points = Vec::with_capacity(BEAT_SAMPLES + 1);
        let mut spans = Vec::with_capacity(Segment::ALL.len());
        points.push(WaveformPoint::new(0.0, shape.sample(Segment::P, 0)));
        let mut current_x = 0.0f32;
        for segment in Segment::ALL {
            let count = segment.sample_count();
            let start = points.len() - 1;
            for i in 1..=count {
                let x = current_x + i as f32 * x_spacing;
                points.push(WaveformPoint::new(x, shape.sample(segment, i)));
            }
            spans.push(SegmentSpan {
                segment,
                range: start..points.len(),
            });
            current_x += count as f32 * x_spacing;
        }
        debug!(
            "synthesized {} points (hr={} pr={} qrs={} qtc={}) on {width}x{height}",
            points.len(),
            params.heart_rate,
            params.pr_interval,
            params.qrs_duration,
            params.qtc_interval
        );
        Ok(Trace::from_parts((width, height), points, spans))
    }

    fn draws_flat_line(&self, params: &ClinicalParameters) -> bool {
        match self.mode {
            FallbackMode::LegacySentinel => params.is_sentinel(),
            FallbackMode::Explicit { has_input } => !has_input,
        }
    }
}

/// Synthesize with the legacy sentinel fallback.
pub fn synthesize(
    params: &ClinicalParameters,
    width: f32,
    height: f32,
) -> Result<Trace, SynthError> {
    WaveformSynthesizer::default().synthesize(params, width, height)
}

fn validate_canvas(width: f32, height: f32) -> Result<(), SynthError> {
    let usable = |v: f32| v.is_finite() && v > 0.0;
    // The beat runs to 2.9 canvas widths; that end must stay finite too.
    let beat_width = width / SAMPLES_PER_WIDTH * BEAT_SAMPLES as f32;
    if usable(width) && usable(height) && beat_width.is_finite() {
        Ok(())
    } else {
        Err(SynthError::InvalidCanvas { width, height })
    }
}

/// Reject values that would put NaN or infinity into the trace.
fn divisor(field: &'static str, value: f32) -> Result<f64, SynthError> {
    if value.is_finite() && value != 0.0 {
        Ok(f64::from(value))
    } else {
        Err(SynthError::InvalidParameter { field, value })
    }
}

fn finite(field: &'static str, value: f32) -> Result<f64, SynthError> {
    if value.is_finite() {
        Ok(f64::from(value))
    } else {
        Err(SynthError::InvalidParameter { field, value })
    }
}

struct BeatShape {
    baseline: f32,
    p_amplitude: f32,
    qrs_amplitude: f32,
    t_amplitude: f32,
    p_frequency: f64,
    p_phase: f64,
    qrs_frequency: f64,
    t_frequency: f64,
}

impl BeatShape {
    fn new(params: &ClinicalParameters, height: f32) -> Result<Self, SynthError> {
        let beat_seconds = 60.0 / divisor("heart_rate", params.heart_rate)?;
        let qrs_seconds = divisor("qrs_duration", params.qrs_duration)? / 1000.0;
        let qtc_seconds = divisor("qtc_interval", params.qtc_interval)? / 1000.0;
        let p_phase = finite("pr_interval", params.pr_interval)? / 1000.0;
        Ok(Self {
            baseline: height / 2.0,
            p_amplitude: height * P_AMPLITUDE,
            qrs_amplitude: height * QRS_AMPLITUDE,
            t_amplitude: height * T_AMPLITUDE,
            p_frequency: 2.0 * PI / beat_seconds,
            p_phase,
            qrs_frequency: 2.0 * PI / qrs_seconds,
            t_frequency: 2.0 * PI / qtc_seconds,
        })
    }

    fn sample(&self, segment: Segment, i: usize) -> f32 {
        let i = i as f64;
        match segment {
            Segment::P => {
                self.baseline + self.p_amplitude * (self.p_frequency * i + self.p_phase).sin() as f32
            }
            Segment::Q => self.baseline + self.qrs_amplitude * (self.qrs_frequency * i).cos() as f32,
            Segment::R => self.baseline - self.qrs_amplitude * (self.qrs_frequency * i).cos() as f32,
            Segment::S => self.baseline + self.qrs_amplitude * (self.qrs_frequency * i).sin() as f32,
            Segment::T => self.baseline + self.t_amplitude * (self.t_frequency * i).cos() as f32,
        }
    }
}
