// src/main.rs
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use ecg_twin::synth::{render_strip_png, render_trace_png, StripChart};
use ecg_twin::{AppConfig, ClinicalParameters, FallbackMode, WaveformSynthesizer};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Parser)]
#[command(name = "ecg-twin")]
#[command(about = "Synthesize and draw ECG beats from clinical parameters", long_about = None)]
struct Cli {
    /// JSON config file (canvas, fallback mode, plot style, strip settings)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the synthesized beat as JSON
    Trace {
        #[command(flatten)]
        params: ParamArgs,
    },

    /// Draw the synthesized beat to a PNG file
    Render {
        #[command(flatten)]
        params: ParamArgs,

        /// Output image path
        #[arg(short, long, default_value = "ecg_beat.png")]
        out: PathBuf,
    },

    /// Draw a multi-cycle strip chart to a PNG file
    Strip {
        #[command(flatten)]
        params: ParamArgs,

        /// Number of cycles (overrides config)
        #[arg(long)]
        cycles: Option<usize>,

        /// Output image path
        #[arg(short, long, default_value = "ecg_strip.png")]
        out: PathBuf,
    },

    /// Print a random example parameter set as JSON
    Example {
        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Args, Debug)]
struct ParamArgs {
    /// Parameter file in the form payload shape (Heart_Rate, PR_Interval, ...)
    #[arg(long, value_name = "FILE")]
    params: Option<PathBuf>,

    /// Heart rate (bpm)
    #[arg(long)]
    hr: Option<f32>,

    /// PR interval (ms)
    #[arg(long)]
    pr: Option<f32>,

    /// QRS duration (ms)
    #[arg(long)]
    qrs: Option<f32>,

    /// ST segment (normalized)
    #[arg(long, allow_hyphen_values = true)]
    st: Option<f32>,

    /// QTc interval (ms)
    #[arg(long)]
    qtc: Option<f32>,

    /// Electrical axis (degrees)
    #[arg(long, allow_hyphen_values = true)]
    axis: Option<f32>,

    /// Sinus, Bradycardia, Tachycardia or "Atrial Fibrillation"
    #[arg(long)]
    rhythm: Option<String>,

    /// Normal, Inverted, Peaked or Flattened
    #[arg(long = "t-wave")]
    t_wave: Option<String>,

    /// Draw the flat line only when no parameters are given at all
    #[arg(long)]
    explicit: bool,

    /// Canvas width (overrides config)
    #[arg(long)]
    width: Option<f32>,

    /// Canvas height (overrides config)
    #[arg(long)]
    height: Option<f32>,
}

impl ParamArgs {
    fn has_input(&self) -> bool {
        self.params.is_some()
            || [self.hr, self.pr, self.qrs, self.st, self.qtc, self.axis]
                .iter()
                .any(Option::is_some)
            || self.rhythm.is_some()
            || self.t_wave.is_some()
    }

    fn resolve(&self) -> Result<ClinicalParameters> {
        let mut p = match &self.params {
            Some(path) => ClinicalParameters::from_json_file(path)
                .with_context(|| format!("loading parameters from {}", path.display()))?,
            None => ClinicalParameters::default(),
        };
        let overrides = [
            (self.hr, &mut p.heart_rate),
            (self.pr, &mut p.pr_interval),
            (self.qrs, &mut p.qrs_duration),
            (self.st, &mut p.st_segment),
            (self.qtc, &mut p.qtc_interval),
            (self.axis, &mut p.electrical_axis),
        ];
        for (value, field) in overrides {
            if let Some(v) = value {
                *field = v;
            }
        }
        if let Some(rhythm) = &self.rhythm {
            p.rhythm = rhythm.parse()?;
        }
        if let Some(t_wave) = &self.t_wave {
            p.t_wave = t_wave.parse()?;
        }
        Ok(p)
    }

    fn synthesizer(&self, config: &AppConfig) -> WaveformSynthesizer {
        if self.explicit {
            WaveformSynthesizer::new(FallbackMode::Explicit {
                has_input: self.has_input(),
            })
        } else {
            config.synthesizer()
        }
    }

    fn canvas(&self, config: &AppConfig) -> (f32, f32) {
        (
            self.width.unwrap_or(config.canvas.width),
            self.height.unwrap_or(config.canvas.height),
        )
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => AppConfig::from_json_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => AppConfig::default(),
    };

    match cli.command {
        Commands::Trace { params } => {
            let (width, height) = params.canvas(&config);
            let trace = params
                .synthesizer(&config)
                .synthesize(&params.resolve()?, width, height)?;
            println!("{}", serde_json::to_string_pretty(&trace)?);
        }
        Commands::Render { params, out } => {
            let (width, height) = params.canvas(&config);
            let trace = params
                .synthesizer(&config)
                .synthesize(&params.resolve()?, width, height)?;
            let png = render_trace_png(&trace, &config.plot)?;
            fs::write(&out, png).with_context(|| format!("writing {}", out.display()))?;
            info!("wrote {}", out.display());
        }
        Commands::Strip {
            params,
            cycles,
            out,
        } => {
            let mut strip_config = config.strip;
            if let Some(cycles) = cycles {
                strip_config.cycles = cycles;
            }
            let strip = StripChart::simulate(&params.resolve()?, &strip_config)?;
            let png = render_strip_png(&strip, &config.strip_style())?;
            fs::write(&out, png).with_context(|| format!("writing {}", out.display()))?;
            info!("wrote {}", out.display());
        }
        Commands::Example { seed } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let params = ClinicalParameters::example(&mut rng);
            println!("{}", serde_json::to_string_pretty(&params)?);
        }
    }
    Ok(())
}
