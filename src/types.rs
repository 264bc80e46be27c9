// src/types.rs
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::synth::SynthError;

// 心律分类
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rhythm {
    #[default]
    Sinus,
    Bradycardia,
    Tachycardia,
    #[serde(rename = "Atrial Fibrillation")]
    AtrialFibrillation,
}

impl Rhythm {
    pub const ALL: [Rhythm; 4] = [
        Rhythm::Sinus,
        Rhythm::Bradycardia,
        Rhythm::Tachycardia,
        Rhythm::AtrialFibrillation,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Rhythm::Sinus => "Sinus",
            Rhythm::Bradycardia => "Bradycardia",
            Rhythm::Tachycardia => "Tachycardia",
            Rhythm::AtrialFibrillation => "Atrial Fibrillation",
        }
    }
}

impl fmt::Display for Rhythm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Rhythm {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Rhythm::ALL
            .iter()
            .copied()
            .find(|r| r.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SynthError::UnknownCategory {
                kind: "rhythm",
                value: s.to_owned(),
            })
    }
}

// T 波形态
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TWave {
    #[default]
    Normal,
    Inverted,
    Peaked,
    Flattened,
}

impl TWave {
    pub const ALL: [TWave; 4] = [TWave::Normal, TWave::Inverted, TWave::Peaked, TWave::Flattened];

    pub fn label(&self) -> &'static str {
        match self {
            TWave::Normal => "Normal",
            TWave::Inverted => "Inverted",
            TWave::Peaked => "Peaked",
            TWave::Flattened => "Flattened",
        }
    }
}

impl fmt::Display for TWave {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TWave {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        TWave::ALL
            .iter()
            .copied()
            .find(|t| t.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SynthError::UnknownCategory {
                kind: "t_wave",
                value: s.to_owned(),
            })
    }
}

/// One set of clinical ECG measurements, as entered on the form.
///
/// Serialized names follow the JSON payload the web frontend posts, so a
/// saved request body can be loaded directly.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClinicalParameters {
    /// Beats per minute.
    #[serde(rename = "Heart_Rate", alias = "heart_rate")]
    pub heart_rate: f32,
    /// Milliseconds.
    #[serde(rename = "PR_Interval", alias = "pr_interval")]
    pub pr_interval: f32,
    /// Milliseconds.
    #[serde(rename = "QRS_Duration", alias = "qrs_duration")]
    pub qrs_duration: f32,
    /// Normalized amplitude. Accepted but not read by the beat synthesizer.
    #[serde(rename = "ST_Segment", alias = "st_segment")]
    pub st_segment: f32,
    /// Milliseconds.
    #[serde(rename = "QTc_Interval", alias = "qtc_interval")]
    pub qtc_interval: f32,
    /// Degrees.
    #[serde(rename = "Electrical_Axis", alias = "electrical_axis", default)]
    pub electrical_axis: f32,
    #[serde(rename = "Rhythm", alias = "rhythm", default)]
    pub rhythm: Rhythm,
    #[serde(rename = "T_Wave", alias = "t_wave", default)]
    pub t_wave: TWave,
}

impl ClinicalParameters {
    /// "Nothing entered yet" values. The legacy fallback compares against these exactly.
    pub const SENTINEL_HEART_RATE: f32 = 75.0;
    pub const SENTINEL_PR_INTERVAL: f32 = 160.0;
    pub const SENTINEL_QRS_DURATION: f32 = 90.0;
    pub const SENTINEL_QTC_INTERVAL: f32 = 380.0;

    pub fn new(
        heart_rate: f32,
        pr_interval: f32,
        qrs_duration: f32,
        st_segment: f32,
        qtc_interval: f32,
    ) -> Self {
        Self {
            heart_rate,
            pr_interval,
            qrs_duration,
            st_segment,
            qtc_interval,
            electrical_axis: 0.0,
            rhythm: Rhythm::default(),
            t_wave: TWave::default(),
        }
    }

    pub fn with_axis(mut self, electrical_axis: f32) -> Self {
        self.electrical_axis = electrical_axis;
        self
    }

    pub fn with_rhythm(mut self, rhythm: Rhythm) -> Self {
        self.rhythm = rhythm;
        self
    }

    pub fn with_t_wave(mut self, t_wave: TWave) -> Self {
        self.t_wave = t_wave;
        self
    }

    /// True when the four timing fields hold the sentinel values bit-for-bit.
    #[allow(clippy::float_cmp)]
    pub fn is_sentinel(&self) -> bool {
        self.heart_rate == Self::SENTINEL_HEART_RATE
            && self.pr_interval == Self::SENTINEL_PR_INTERVAL
            && self.qrs_duration == Self::SENTINEL_QRS_DURATION
            && self.qtc_interval == Self::SENTINEL_QTC_INTERVAL
    }

    /// Random but plausible values, rounded the way the form displays them.
    pub fn example<R: Rng>(rng: &mut R) -> Self {
        let heart_rate = round_to(60.0 + rng.gen::<f32>() * 60.0, 1);
        let pr_interval = round_to(120.0 + rng.gen::<f32>() * 80.0, 1);
        let qrs_duration = round_to(80.0 + rng.gen::<f32>() * 40.0, 1);
        let st_segment = round_to(-1.0 + rng.gen::<f32>() * 3.0, 2);
        let qtc_interval = round_to(360.0 + rng.gen::<f32>() * 100.0, 1);
        let electrical_axis = round_to(-30.0 + rng.gen::<f32>() * 150.0, 1);
        let rhythm = *Rhythm::ALL.choose(rng).unwrap_or(&Rhythm::Sinus);
        let t_wave = *TWave::ALL.choose(rng).unwrap_or(&TWave::Normal);
        Self {
            heart_rate,
            pr_interval,
            qrs_duration,
            st_segment,
            qtc_interval,
            electrical_axis,
            rhythm,
            t_wave,
        }
    }

    /// Build from named text fields. All eight fields must be present.
    ///
    /// Names match case-insensitively, so `Heart_Rate` and `heart_rate` both work.
    pub fn from_fields(fields: &[(&str, &str)]) -> Result<Self, SynthError> {
        let lookup = |name: &'static str| field_text(fields, name);
        Ok(Self {
            heart_rate: parse_field("heart_rate", lookup("heart_rate")?)?,
            pr_interval: parse_field("pr_interval", lookup("pr_interval")?)?,
            qrs_duration: parse_field("qrs_duration", lookup("qrs_duration")?)?,
            st_segment: parse_field("st_segment", lookup("st_segment")?)?,
            qtc_interval: parse_field("qtc_interval", lookup("qtc_interval")?)?,
            electrical_axis: parse_field("electrical_axis", lookup("electrical_axis")?)?,
            rhythm: lookup("rhythm")?.parse()?,
            t_wave: lookup("t_wave")?.parse()?,
        })
    }

    /// Build from form fields the way the "generate" button does: any field
    /// that is missing, empty or unparsable keeps its [`Default`] value.
    ///
    /// An untouched form therefore yields the sentinel set (a flat line under
    /// the legacy fallback), and editing any single timing field yields a beat.
    pub fn from_form(fields: &[(&str, &str)]) -> Self {
        let defaults = Self::default();
        let number = |name: &'static str, fallback: f32| {
            field_text(fields, name)
                .and_then(|text| parse_field(name, text))
                .unwrap_or(fallback)
        };
        Self {
            heart_rate: number("heart_rate", defaults.heart_rate),
            pr_interval: number("pr_interval", defaults.pr_interval),
            qrs_duration: number("qrs_duration", defaults.qrs_duration),
            st_segment: number("st_segment", defaults.st_segment),
            qtc_interval: number("qtc_interval", defaults.qtc_interval),
            electrical_axis: number("electrical_axis", defaults.electrical_axis),
            rhythm: field_text(fields, "rhythm")
                .and_then(str::parse)
                .unwrap_or(defaults.rhythm),
            t_wave: field_text(fields, "t_wave")
                .and_then(str::parse)
                .unwrap_or(defaults.t_wave),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, SynthError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SynthError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

impl Default for ClinicalParameters {
    fn default() -> Self {
        Self::new(
            Self::SENTINEL_HEART_RATE,
            Self::SENTINEL_PR_INTERVAL,
            Self::SENTINEL_QRS_DURATION,
            1.0,
            Self::SENTINEL_QTC_INTERVAL,
        )
    }
}

/// Parse one numeric form field. Accepts `,` as the decimal separator.
pub fn parse_field(field: &'static str, text: &str) -> Result<f32, SynthError> {
    let cleaned = text.trim().replace(',', ".");
    match cleaned.parse::<f32>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(SynthError::UnparsableField {
            field,
            input: text.to_owned(),
        }),
    }
}

fn field_text<'a>(fields: &[(&str, &'a str)], name: &'static str) -> Result<&'a str, SynthError> {
    fields
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| *value)
        .ok_or(SynthError::UnparsableField {
            field: name,
            input: String::new(),
        })
}

fn round_to(value: f32, decimals: i32) -> f32 {
    let scale = 10f32.powi(decimals);
    (value * scale).round() / scale
}
