use log::{info, warn};
use crate::synth::engine::WaveformSynthesizer;
use crate::synth::error::SynthError;
use crate::synth::plot::{render_trace_png, PlotStyle};
use crate::synth::source::ParameterSource;
use crate::synth::trace::Trace;
use crate::types::ClinicalParameters;
/// Pulls parameter sets from a source and keeps the most recent beat ready to draw.
///
/// Every request is synthesized from scratch; only the latest result is kept.
pub struct SynthesisPipeline<S: ParameterSource> {
    source: S,
    synthesizer: WaveformSynthesizer,
    canvas: (f32, f32),
    latest: Option<(ClinicalParameters, Trace)>,
}
impl<S: ParameterSource> SynthesisPipeline<S> {
    pub fn new(source: S, synthesizer: WaveformSynthesizer, width: f32, height: f32) -> Self {
        Self {
            source,
            synthesizer,
            canvas: (width, height),
            latest: None,
        }
    }
    pub fn canvas(&self) -> (f32, f32) {
        self.canvas
    }
    /// Resize the drawing surface. The next request is laid out on the new size.
    pub fn set_canvas(&mut self, width: f32, height: f32) {
        self.canvas = (width, height);
    }
    pub fn pump_once(&mut self) -> Result<Option<Trace>, SynthError> {
        let Some(params) = self.source.next_parameters()? else {
            return Ok(None);
        };
        let trace = self.submit(params)?;
        Ok(Some(trace))
    }
    /// Synthesize one request directly, bypassing the source.
    pub fn submit(&mut self, params: ClinicalParameters) -> Result<Trace, SynthError> {
        let (width, height) = self.canvas;
        let trace = self
            .synthesizer
            .synthesize(&params, width, height)
            .map_err(|err| {
                warn!("rejected request {params:?}: {err}");
                err
            })?;
        if trace.is_flat_line() {
            info!("no parameters entered yet; showing flat line");
        }
        self.latest = Some((params, trace.clone()));
        Ok(trace)
    }
    pub fn latest_trace(&self) -> Result<&Trace, SynthError> {
        self.latest
            .as_ref()
            .map(|(_, trace)| trace)
            .ok_or(SynthError::EmptyTrace)
    }
    pub fn latest_parameters(&self) -> Option<&ClinicalParameters> {
        self.latest.as_ref().map(|(params, _)| params)
    }
    pub fn render_latest(&self, style: &PlotStyle) -> Result<Vec<u8>, SynthError> {
        render_trace_png(self.latest_trace()?, style)
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::engine::FallbackMode;
    use crate::synth::source::ManualSource;
    #[test]
    fn pipeline_keeps_latest_trace() {
        let source = ManualSource::new([
            ClinicalParameters::default(),
            ClinicalParameters::new(90.0, 180.0, 100.0, 0.5, 400.0),
        ]);
        let mut pipeline =
            SynthesisPipeline::new(source, WaveformSynthesizer::default(), 1000.0, 200.0);
        assert!(matches!(pipeline.latest_trace(), Err(SynthError::EmptyTrace)));
        let flat = pipeline.pump_once().unwrap().unwrap();
        assert!(flat.is_flat_line());
        let beat = pipeline.pump_once().unwrap().unwrap();
        assert_eq!(beat.len(), 291);
        assert_eq!(pipeline.latest_trace().unwrap(), &beat);
        assert_eq!(pipeline.latest_parameters().unwrap().heart_rate, 90.0);
        assert!(pipeline.pump_once().unwrap().is_none());
    }
    #[test]
    fn failed_request_keeps_previous_trace() {
        let source = ManualSource::new([ClinicalParameters::new(80.0, 170.0, 95.0, 0.0, 400.0)]);
        let mut pipeline = SynthesisPipeline::new(
            source,
            WaveformSynthesizer::new(FallbackMode::Explicit { has_input: true }),
            600.0,
            150.0,
        );
        let good = pipeline.pump_once().unwrap().unwrap();
        let bad = ClinicalParameters::new(0.0, 170.0, 95.0, 0.0, 400.0);
        assert!(matches!(
            pipeline.submit(bad),
            Err(SynthError::InvalidParameter { field: "heart_rate", .. })
        ));
        assert_eq!(pipeline.latest_trace().unwrap(), &good);
    }
    #[test]
    fn canvas_changes_apply_to_next_request() {
        let params = ClinicalParameters::new(80.0, 170.0, 95.0, 0.0, 400.0);
        let mut pipeline = SynthesisPipeline::new(
            ManualSource::new([]),
            WaveformSynthesizer::default(),
            100.0,
            50.0,
        );
        pipeline.set_canvas(200.0, 50.0);
        let trace = pipeline.submit(params).unwrap();
        assert_eq!(trace.canvas(), (200.0, 50.0));
        assert_eq!(trace.end_x(), 580.0);
        pipeline.set_canvas(0.0, 50.0);
        assert!(matches!(
            pipeline.submit(params),
            Err(SynthError::InvalidCanvas { .. })
        ));
    }
}
