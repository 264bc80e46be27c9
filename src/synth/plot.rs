use std::io::Cursor;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use log::info;
use plotters::prelude::LineSeries;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use crate::synth::error::SynthError;
use crate::synth::strip::StripChart;
use crate::synth::trace::Trace;
const ORANGE: RGBColor = RGBColor(255, 165, 0);
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    pub background: (u8, u8, u8),
    pub stroke: (u8, u8, u8),
    pub stroke_width: u32,
    /// Caption, axis labels and mesh. Needs a system font.
    pub labels: bool,
}
impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 300,
            background: (255, 255, 255),
            stroke: (0, 0, 0),
            stroke_width: 3,
            labels: true,
        }
    }
}
impl PlotStyle {
    /// Orange-on-white strip chart look.
    pub fn strip() -> Self {
        Self {
            stroke: (ORANGE.0, ORANGE.1, ORANGE.2),
            stroke_width: 2,
            ..Self::default()
        }
    }
    fn background_color(&self) -> RGBColor {
        RGBColor(self.background.0, self.background.1, self.background.2)
    }
    fn stroke_color(&self) -> RGBColor {
        RGBColor(self.stroke.0, self.stroke.1, self.stroke.2)
    }
    /// Byte length of the RGB buffer for this image size.
    fn buffer_len(&self) -> Result<usize, SynthError> {
        if self.width == 0 || self.height == 0 {
            return Err(SynthError::Plot(format!(
                "image size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|n| n.checked_mul(3))
            .filter(|&n| n <= isize::MAX as usize)
            .ok_or_else(|| {
                SynthError::Plot(format!(
                    "image size {}x{} overflows the pixel buffer",
                    self.width, self.height
                ))
            })
    }
}
/// Draw a synthesized beat as a polyline.
///
/// The image spans the whole beat even where it runs past the canvas width,
/// and keeps the canvas orientation (larger `y` is lower in the image).
pub fn render_trace_png(trace: &Trace, style: &PlotStyle) -> Result<Vec<u8>, SynthError> {
    let buffer_len = style.buffer_len()?;
    if trace.len() < 2 {
        return Err(SynthError::Plot("trace needs at least two points".into()));
    }
    let (canvas_width, canvas_height) = trace.canvas();
    let x_max = trace.end_x().max(canvas_width);
    let stroke = style.stroke_color();
    let mut buffer = vec![0u8; buffer_len];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background_color())?;
        let mut builder = ChartBuilder::on(&root);
        builder.margin(10);
        if style.labels {
            builder
                .caption("ECG Beat", ("sans-serif", 20).into_font().color(&BLACK))
                .set_label_area_size(LabelAreaPosition::Left, 45)
                .set_label_area_size(LabelAreaPosition::Bottom, 40);
        }
        let mut chart = builder.build_cartesian_2d(0f32..x_max, 0f32..canvas_height)?;
        if style.labels {
            chart
                .configure_mesh()
                .light_line_style(&BLACK.mix(0.05))
                .draw()?;
        }
        // Chart y points up, canvas y points down.
        let series = trace
            .points()
            .iter()
            .map(|p| (p.x, canvas_height - p.y));
        chart.draw_series(LineSeries::new(
            series,
            stroke.stroke_width(style.stroke_width),
        ))?;
        root.present()?;
    }
    info!(
        "rendered {}-point trace to {}x{} png",
        trace.len(),
        style.width,
        style.height
    );
    encode_png(&buffer, style.width, style.height)
}
/// Draw a strip chart the way the clinical image endpoint always has.
pub fn render_strip_png(strip: &StripChart, style: &PlotStyle) -> Result<Vec<u8>, SynthError> {
    let buffer_len = style.buffer_len()?;
    if strip.is_empty() {
        return Err(SynthError::Plot("strip chart has no samples".into()));
    }
    let stroke = style.stroke_color();
    let mut buffer = vec![0u8; buffer_len];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background_color())?;
        let y_min = strip.amplitude.iter().copied().fold(0.0f64, f64::min);
        let y_max = strip.amplitude.iter().copied().fold(0.0f64, f64::max);
        let pad = ((y_max - y_min) * 0.05).max(1e-3);
        let mut builder = ChartBuilder::on(&root);
        builder.margin(10);
        if style.labels {
            builder
                .caption("Simulated ECG", ("sans-serif", 20).into_font().color(&BLACK))
                .set_label_area_size(LabelAreaPosition::Left, 55)
                .set_label_area_size(LabelAreaPosition::Bottom, 40);
        }
        let mut chart = builder
            .build_cartesian_2d(0f64..strip.duration_seconds(), (y_min - pad)..(y_max + pad))?;
        if style.labels {
            chart
                .configure_mesh()
                .x_desc("Time (s)")
                .y_desc("Amplitude (a.u.)")
                .light_line_style(&BLACK.mix(0.1))
                .draw()?;
        }
        chart.draw_series(LineSeries::new(
            strip.samples(),
            stroke.stroke_width(style.stroke_width),
        ))?;
        root.present()?;
    }
    info!(
        "rendered {}-cycle strip ({} samples) to {}x{} png",
        strip.cycles,
        strip.len(),
        style.width,
        style.height
    );
    encode_png(&buffer, style.width, style.height)
}
fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, SynthError> {
    let image = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| SynthError::Plot("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}
