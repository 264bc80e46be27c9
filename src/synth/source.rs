use std::collections::VecDeque;
use log::debug;
use rand::Rng;
use crate::synth::SynthError;
use crate::types::ClinicalParameters;
/// Something that hands out parameter sets on demand: a form, a request queue, a generator.
pub trait ParameterSource {
    fn next_parameters(&mut self) -> Result<Option<ClinicalParameters>, SynthError>;
}
/// In-memory source useful for tests and deterministic playback.
pub struct ManualSource {
    queue: VecDeque<ClinicalParameters>,
}
impl ManualSource {
    pub fn new(requests: impl IntoIterator<Item = ClinicalParameters>) -> Self {
        Self {
            queue: requests.into_iter().collect(),
        }
    }
    pub fn push(&mut self, params: ClinicalParameters) {
        self.queue.push_back(params);
    }
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}
impl ParameterSource for ManualSource {
    fn next_parameters(&mut self) -> Result<Option<ClinicalParameters>, SynthError> {
        Ok(self.queue.pop_front())
    }
}
/// Endless source of "fill example values" parameter sets.
pub struct ExampleSource<R: Rng> {
    rng: R,
}
impl<R: Rng> ExampleSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}
impl<R: Rng> ParameterSource for ExampleSource<R> {
    fn next_parameters(&mut self) -> Result<Option<ClinicalParameters>, SynthError> {
        let params = ClinicalParameters::example(&mut self.rng);
        debug!("example parameters: {params:?}");
        Ok(Some(params))
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    #[test]
    fn manual_source_drains_in_order() {
        let first = ClinicalParameters::new(61.0, 150.0, 85.0, 0.0, 390.0);
        let second = ClinicalParameters::new(110.0, 130.0, 100.0, 0.3, 420.0);
        let mut source = ManualSource::new([first]);
        source.push(second);
        assert_eq!(source.remaining(), 2);
        assert_eq!(source.next_parameters().unwrap(), Some(first));
        assert_eq!(source.next_parameters().unwrap(), Some(second));
        assert_eq!(source.next_parameters().unwrap(), None);
    }
    #[test]
    fn example_source_is_reproducible_with_a_seed() {
        let mut a = ExampleSource::new(StdRng::seed_from_u64(3));
        let mut b = ExampleSource::new(StdRng::seed_from_u64(3));
        for _ in 0..5 {
            assert_eq!(a.next_parameters().unwrap(), b.next_parameters().unwrap());
        }
    }
}
