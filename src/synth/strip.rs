//! Multi-cycle "strip chart" simulation.
//!
//! Unlike the beat synthesizer this works in real time units: one cycle lasts
//! `60 / heart_rate` seconds sampled at `sample_rate_hz`, and each deflection
//! is a Gaussian bump placed at an index derived from the PR, QRS and QTc
//! intervals. Rhythm class scales the whole cycle, T-wave morphology sets the
//! T amplitude and the electrical axis shifts the baseline.
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::synth::error::SynthError;
use crate::types::{ClinicalParameters, Rhythm, TWave};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StripConfig {
    pub sample_rate_hz: f32,
    pub cycles: usize,
}

impl Default for StripConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 1000.0,
            cycles: 3,
        }
    }
}

/// One Gaussian deflection: signed amplitude and width in seconds.
#[derive(Clone, Copy, Debug)]
struct Wave {
    amplitude: f64,
    sigma: f64,
}

const P_WAVE: Wave = Wave { amplitude: 0.1, sigma: 0.015 };
const Q_WAVE: Wave = Wave { amplitude: -0.15, sigma: 0.004 };
const R_WAVE: Wave = Wave { amplitude: 1.0, sigma: 0.01 };
const S_WAVE: Wave = Wave { amplitude: -0.2, sigma: 0.004 };
const T_SIGMA: f64 = 0.04;
/// Q and S sit this many samples either side of the R peak.
const QS_OFFSET: i64 = 5;
const AXIS_GAIN: f64 = 0.2;
/// Upper bound on samples in one strip, across all cycles.
pub const MAX_STRIP_SAMPLES: usize = 10_000_000;

/// Sampled multi-cycle ECG in arbitrary amplitude units.
#[derive(Clone, Debug)]
pub struct StripChart {
    pub sample_rate_hz: f32,
    pub cycle_seconds: f64,
    pub cycles: usize,
    pub time_s: Array1<f64>,
    pub amplitude: Array1<f64>,
}

impl StripChart {
    pub fn simulate(params: &ClinicalParameters, config: &StripConfig) -> Result<Self, SynthError> {
        if !(config.sample_rate_hz.is_finite() && config.sample_rate_hz > 0.0) {
            return Err(SynthError::InvalidParameter {
                field: "sample_rate_hz",
                value: config.sample_rate_hz,
            });
        }
        if config.cycles == 0 {
            return Err(SynthError::InvalidParameter {
                field: "cycles",
                value: 0.0,
            });
        }
        let heart_rate = positive("heart_rate", params.heart_rate)?;
        let fs = f64::from(config.sample_rate_hz);
        let cycle_seconds = 60.0 / heart_rate;
        let per_cycle = fs * cycle_seconds;
        if !per_cycle.is_finite() || per_cycle >= MAX_STRIP_SAMPLES as f64 {
            return Err(SynthError::InvalidParameter {
                field: "sample_rate_hz",
                value: config.sample_rate_hz,
            });
        }
        let samples_per_cycle = per_cycle as usize;
        if samples_per_cycle == 0 {
            return Err(SynthError::InvalidParameter {
                field: "heart_rate",
                value: params.heart_rate,
            });
        }
        let t = Array1::linspace(0.0, cycle_seconds, samples_per_cycle);
        let beat = one_cycle(&t, params, fs)?;
        let total = samples_per_cycle
            .checked_mul(config.cycles)
            .filter(|&n| n <= MAX_STRIP_SAMPLES)
            .ok_or(SynthError::InvalidParameter {
                field: "cycles",
                value: config.cycles as f32,
            })?;
        let amplitude = Array1::from_iter((0..total).map(|i| beat[i % samples_per_cycle]));
        let time_s = Array1::linspace(0.0, cycle_seconds * config.cycles as f64, total);
        Ok(Self {
            sample_rate_hz: config.sample_rate_hz,
            cycle_seconds,
            cycles: config.cycles,
            time_s,
            amplitude,
        })
    }

    pub fn len(&self) -> usize {
        self.amplitude.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amplitude.is_empty()
    }

    pub fn duration_seconds(&self) -> f64 {
        self.cycle_seconds * self.cycles as f64
    }

    /// `(time, amplitude)` pairs in sample order.
    pub fn samples(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.time_s.iter().copied().zip(self.amplitude.iter().copied())
    }
}

fn one_cycle(t: &Array1<f64>, params: &ClinicalParameters, fs: f64) -> Result<Array1<f64>, SynthError> {
    let pr = finite("pr_interval", params.pr_interval)?;
    let qrs = finite("qrs_duration", params.qrs_duration)?;
    let qt = finite("qtc_interval", params.qtc_interval)?;
    let axis = finite("electrical_axis", params.electrical_axis)?;

    // Truncation toward zero matches how the sample indices were always derived.
    let index = |seconds: f64| (seconds * fs) as i64;
    let p_start = index(0.1);
    let p_peak = p_start.saturating_add(index(0.04));
    let qrs_start = p_start.saturating_add(index(pr / 1000.0));
    let qrs_peak = qrs_start.saturating_add(index(qrs / 2000.0));
    let t_peak = qrs_start.saturating_add(index(qt / 1000.0));

    let last = t.len() as i64 - 1;
    let time_at = |i: i64| t[i.clamp(0, last) as usize];
    let t_wave = Wave {
        amplitude: t_wave_amplitude(params.t_wave),
        sigma: T_SIGMA,
    };

    let mut ecg = Array1::<f64>::zeros(t.len());
    for (center, wave) in [
        (p_peak, P_WAVE),
        (qrs_peak.saturating_sub(QS_OFFSET), Q_WAVE),
        (qrs_peak, R_WAVE),
        (qrs_peak.saturating_add(QS_OFFSET), S_WAVE),
        (t_peak, t_wave),
    ] {
        let mu = time_at(center);
        let two_var = 2.0 * wave.sigma * wave.sigma;
        ecg.zip_mut_with(t, |acc, &x| {
            *acc += wave.amplitude * (-(x - mu).powi(2) / two_var).exp();
        });
    }
    let offset = axis.to_radians().sin() * AXIS_GAIN;
    let gain = rhythm_gain(params.rhythm);
    Ok(ecg.mapv(|v| v * gain + offset))
}

fn rhythm_gain(rhythm: Rhythm) -> f64 {
    match rhythm {
        Rhythm::Tachycardia => 0.9,
        Rhythm::Bradycardia => 1.2,
        Rhythm::Sinus | Rhythm::AtrialFibrillation => 1.0,
    }
}

fn t_wave_amplitude(t_wave: TWave) -> f64 {
    match t_wave {
        TWave::Normal | TWave::Peaked => 0.3,
        TWave::Inverted => -0.3,
        TWave::Flattened => 0.1,
    }
}

fn finite(field: &'static str, value: f32) -> Result<f64, SynthError> {
    if value.is_finite() {
        Ok(f64::from(value))
    } else {
        Err(SynthError::InvalidParameter { field, value })
    }
}

fn positive(field: &'static str, value: f32) -> Result<f64, SynthError> {
    if value.is_finite() && value > 0.0 {
        Ok(f64::from(value))
    } else {
        Err(SynthError::InvalidParameter { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sixty_bpm() -> ClinicalParameters {
        ClinicalParameters::new(60.0, 180.0, 100.0, 0.0, 400.0)
    }

    fn argmax(values: &Array1<f64>) -> usize {
        values
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |best, (i, &v)| if v > best.1 { (i, v) } else { best })
            .0
    }

    #[test]
    fn tiles_whole_cycles() {
        let strip = StripChart::simulate(&sixty_bpm(), &StripConfig::default()).unwrap();
        assert_eq!(strip.len(), 3000);
        assert_eq!(strip.time_s.len(), 3000);
        assert_eq!(strip.time_s[0], 0.0);
        assert!((strip.time_s[2999] - 3.0).abs() < 1e-9);
        assert_eq!(strip.amplitude[10], strip.amplitude[1010]);
        assert_eq!(strip.amplitude[330], strip.amplitude[2330]);
        assert!((strip.duration_seconds() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn r_peak_follows_pr_and_qrs() {
        let strip = StripChart::simulate(
            &sixty_bpm(),
            &StripConfig {
                cycles: 1,
                ..StripConfig::default()
            },
        )
        .unwrap();
        // p_start 100 + pr 180 + qrs/2 50
        let peak = argmax(&strip.amplitude);
        assert!((327..=333).contains(&peak), "peak at {peak}");
        assert!(strip.amplitude[peak] > 0.5);
    }

    #[test]
    fn t_wave_morphology_sets_t_amplitude() {
        let config = StripConfig {
            cycles: 1,
            ..StripConfig::default()
        };
        // qrs_start 280 + qtc 400
        let t_peak = 680;
        let at_t = |t_wave: TWave| {
            StripChart::simulate(&sixty_bpm().with_t_wave(t_wave), &config)
                .unwrap()
                .amplitude[t_peak]
        };
        assert!((at_t(TWave::Normal) - 0.3).abs() < 1e-3);
        assert!((at_t(TWave::Peaked) - 0.3).abs() < 1e-3);
        assert!((at_t(TWave::Inverted) + 0.3).abs() < 1e-3);
        assert!((at_t(TWave::Flattened) - 0.1).abs() < 1e-3);
    }

    #[test]
    fn rhythm_scales_and_axis_offsets() {
        let config = StripConfig::default();
        let sinus = StripChart::simulate(&sixty_bpm(), &config).unwrap();
        let brady = StripChart::simulate(&sixty_bpm().with_rhythm(Rhythm::Bradycardia), &config)
            .unwrap();
        let tachy = StripChart::simulate(&sixty_bpm().with_rhythm(Rhythm::Tachycardia), &config)
            .unwrap();
        let peak = argmax(&sinus.amplitude);
        assert!((brady.amplitude[peak] - 1.2 * sinus.amplitude[peak]).abs() < 1e-9);
        assert!((tachy.amplitude[peak] - 0.9 * sinus.amplitude[peak]).abs() < 1e-9);

        let tilted = StripChart::simulate(&sixty_bpm().with_axis(90.0), &config).unwrap();
        assert!((tilted.amplitude[0] - 0.2).abs() < 1e-6);
        assert!((tilted.amplitude[peak] - sinus.amplitude[peak] - 0.2).abs() < 1e-9);
    }

    #[test]
    fn peak_indices_past_the_cycle_are_clamped() {
        let long_qt = ClinicalParameters {
            qtc_interval: 5000.0,
            ..sixty_bpm()
        };
        let strip = StripChart::simulate(&long_qt, &StripConfig::default()).unwrap();
        assert!(strip.amplitude.iter().all(|v| v.is_finite()));
        let absurd = ClinicalParameters {
            pr_interval: 1.0e30,
            qrs_duration: -1.0e30,
            ..sixty_bpm()
        };
        let clamped = StripChart::simulate(&absurd, &StripConfig::default()).unwrap();
        assert!(clamped.amplitude.iter().all(|v| v.is_finite()));
        let last = strip.amplitude[999];
        assert!((last - 0.3).abs() < 1e-3);
    }

    #[test]
    fn oversized_strips_are_rejected() {
        let huge_rate = StripConfig {
            sample_rate_hz: 1.0e20,
            cycles: 3,
        };
        assert!(matches!(
            StripChart::simulate(&sixty_bpm(), &huge_rate),
            Err(SynthError::InvalidParameter { field: "sample_rate_hz", .. })
        ));
        let endless = StripConfig {
            cycles: usize::MAX,
            ..StripConfig::default()
        };
        assert!(matches!(
            StripChart::simulate(&sixty_bpm(), &endless),
            Err(SynthError::InvalidParameter { field: "cycles", .. })
        ));
        let just_over = StripConfig {
            cycles: MAX_STRIP_SAMPLES / 1000 + 1,
            ..StripConfig::default()
        };
        assert!(StripChart::simulate(&sixty_bpm(), &just_over).is_err());
    }

    #[test]
    fn rejects_unusable_inputs() {
        let config = StripConfig::default();
        let zero_hr = ClinicalParameters {
            heart_rate: 0.0,
            ..sixty_bpm()
        };
        assert!(matches!(
            StripChart::simulate(&zero_hr, &config),
            Err(SynthError::InvalidParameter { field: "heart_rate", .. })
        ));
        let absurd_hr = ClinicalParameters {
            heart_rate: 100_000.0,
            ..sixty_bpm()
        };
        assert!(StripChart::simulate(&absurd_hr, &config).is_err());
        let no_cycles = StripConfig { cycles: 0, ..config };
        assert!(matches!(
            StripChart::simulate(&sixty_bpm(), &no_cycles),
            Err(SynthError::InvalidParameter { field: "cycles", .. })
        ));
        let nan_axis = sixty_bpm().with_axis(f32::NAN);
        assert!(matches!(
            StripChart::simulate(&nan_axis, &config),
            Err(SynthError::InvalidParameter { field: "electrical_axis", .. })
        ));
    }
}
