use std::fs;
use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::synth::{FallbackMode, PlotStyle, StripConfig, SynthError, WaveformSynthesizer};
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: f32,
    pub height: f32,
}
impl Default for CanvasConfig {
    fn default() -> Self {
        // A wide, short drawing surface like the phone view the beat was laid out for.
        CanvasConfig {
            width: 1000.0,
            height: 200.0,
        }
    }
}
/// Everything the binary needs, loadable from one JSON file. Missing sections use defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub canvas: CanvasConfig,
    pub fallback: FallbackMode,
    pub plot: PlotStyle,
    pub strip: StripConfig,
    pub strip_plot: Option<PlotStyle>,
}
impl AppConfig {
    pub fn from_json_str(json: &str) -> Result<Self, SynthError> {
        Ok(serde_json::from_str(json)?)
    }
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SynthError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
    pub fn synthesizer(&self) -> WaveformSynthesizer {
        WaveformSynthesizer::new(self.fallback)
    }
    /// Style for strip charts; orange-on-white unless overridden.
    pub fn strip_style(&self) -> PlotStyle {
        self.strip_plot.clone().unwrap_or_else(PlotStyle::strip)
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn empty_json_gives_defaults() {
        let config = AppConfig::from_json_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.canvas.width, 1000.0);
        assert_eq!(config.fallback, FallbackMode::LegacySentinel);
        assert_eq!(config.strip.cycles, 3);
        assert_eq!(config.strip_style(), PlotStyle::strip());
    }
    #[test]
    fn partial_sections_merge_with_defaults() {
        let json = r#"{
            "canvas": { "height": 480 },
            "fallback": { "kind": "explicit", "has_input": true },
            "plot": { "width": 640, "labels": false },
            "strip": { "cycles": 5 }
        }"#;
        let config = AppConfig::from_json_str(json).unwrap();
        assert_eq!(config.canvas.width, 1000.0);
        assert_eq!(config.canvas.height, 480.0);
        assert_eq!(
            config.synthesizer().mode(),
            FallbackMode::Explicit { has_input: true }
        );
        assert_eq!(config.plot.width, 640);
        assert_eq!(config.plot.height, PlotStyle::default().height);
        assert!(!config.plot.labels);
        assert_eq!(config.strip.cycles, 5);
        assert_eq!(config.strip.sample_rate_hz, 1000.0);
    }
    #[test]
    fn malformed_json_is_a_json_error() {
        assert!(matches!(
            AppConfig::from_json_str("{ canvas: "),
            Err(SynthError::Json(_))
        ));
    }
}
