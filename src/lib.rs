//! Deterministic ECG beat synthesis from clinical parameters.
//!
//! [`synth::synthesize`] turns heart rate, PR, QRS and QTc values into a
//! 291-point P-Q-R-S-T polyline laid out on a caller-sized canvas. Rendering
//! lives in [`synth::plot`]; the multi-cycle strip chart in [`synth::strip`].
pub mod config;
pub mod synth;
pub mod types;
pub use config::{AppConfig, CanvasConfig};
pub use synth::{synthesize, FallbackMode, SynthError, Trace, WaveformPoint, WaveformSynthesizer};
pub use types::{parse_field, ClinicalParameters, Rhythm, TWave};
