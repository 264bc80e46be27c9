// src/synth/mod.rs
// 波形合成引擎及其周边模块
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod plot;
pub mod source;
pub mod strip;
pub mod trace;
// 公开导出这些模块里的结构体，方便外部调用
pub use engine::{synthesize, FallbackMode, WaveformSynthesizer};
pub use error::SynthError;
pub use pipeline::SynthesisPipeline;
pub use plot::{render_strip_png, render_trace_png, PlotStyle};
pub use source::{ExampleSource, ManualSource, ParameterSource};
pub use strip::{StripChart, StripConfig};
pub use trace::{Segment, SegmentSpan, Trace, WaveformPoint, BEAT_SAMPLES};
