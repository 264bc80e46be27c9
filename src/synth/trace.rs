use std::ops::Range;

use serde::Serialize;

/// The five deflections of one simulated beat, in emission order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Segment {
    P,
    Q,
    R,
    S,
    T,
}

impl Segment {
    pub const ALL: [Segment; 5] = [Segment::P, Segment::Q, Segment::R, Segment::S, Segment::T];

    /// Number of samples the segment advances the trace by.
    pub fn sample_count(&self) -> usize {
        match self {
            Segment::P | Segment::T => 100,
            Segment::Q | Segment::R | Segment::S => 30,
        }
    }
}

/// Sum of all segment lengths.
pub const BEAT_SAMPLES: usize = 290;

/// One sample in canvas coordinates. `y` grows downward from the top edge.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct WaveformPoint {
    pub x: f32,
    pub y: f32,
}

impl WaveformPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Where a segment lives inside [`Trace::points`].
///
/// Neighbouring spans share their boundary point, so `range.end - 1` of one
/// span equals `range.start` of the next.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SegmentSpan {
    pub segment: Segment,
    pub range: Range<usize>,
}

/// Immutable result of one synthesis call.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Trace {
    canvas: (f32, f32),
    points: Vec<WaveformPoint>,
    spans: Vec<SegmentSpan>,
}

impl Trace {
    pub(crate) fn flat_line(width: f32, height: f32) -> Self {
        let baseline = height / 2.0;
        Self {
            canvas: (width, height),
            points: vec![
                WaveformPoint::new(0.0, baseline),
                WaveformPoint::new(width, baseline),
            ],
            spans: Vec::new(),
        }
    }

    pub(crate) fn from_parts(
        canvas: (f32, f32),
        points: Vec<WaveformPoint>,
        spans: Vec<SegmentSpan>,
    ) -> Self {
        Self {
            canvas,
            points,
            spans,
        }
    }

    /// Canvas `(width, height)` the trace was laid out for.
    pub fn canvas(&self) -> (f32, f32) {
        self.canvas
    }

    pub fn points(&self) -> &[WaveformPoint] {
        &self.points
    }

    pub fn into_points(self) -> Vec<WaveformPoint> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn spans(&self) -> &[SegmentSpan] {
        &self.spans
    }

    /// The "nothing to draw yet" placeholder has no segments.
    pub fn is_flat_line(&self) -> bool {
        self.spans.is_empty()
    }

    /// Points of one segment, including the boundary point shared with the previous one.
    pub fn segment(&self, segment: Segment) -> Option<&[WaveformPoint]> {
        self.spans
            .iter()
            .find(|span| span.segment == segment)
            .map(|span| &self.points[span.range.clone()])
    }

    pub fn end_x(&self) -> f32 {
        self.points.last().map(|p| p.x).unwrap_or(0.0)
    }

    /// Consecutive point pairs in emission order; a renderer draws one straight line per pair.
    pub fn line_segments(&self) -> impl Iterator<Item = (WaveformPoint, WaveformPoint)> + '_ {
        self.points.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_lengths_add_up_to_a_beat() {
        let total: usize = Segment::ALL.iter().map(|s| s.sample_count()).sum();
        assert_eq!(total, BEAT_SAMPLES);
    }

    #[test]
    fn flat_line_has_one_line_segment() {
        let trace = Trace::flat_line(640.0, 240.0);
        assert!(trace.is_flat_line());
        assert_eq!(trace.segment(Segment::R), None);
        let lines: Vec<_> = trace.line_segments().collect();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, WaveformPoint::new(0.0, 120.0));
        assert_eq!(lines[0].1, WaveformPoint::new(640.0, 120.0));
        assert_eq!(trace.end_x(), 640.0);
    }
}
