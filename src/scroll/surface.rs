use crate::waveform::Point;

use super::viewport::Viewport;

/// Drawing backend for the trace.
///
/// Each frame the engine calls [`TraceSurface::begin`], then
/// [`TraceSurface::polyline`] once per contiguous run of drawn points, then
/// [`TraceSurface::marker`] if there is a write head to show.
pub trait TraceSurface {
    fn begin(&mut self, _viewport: &Viewport) {
        // Default: nothing to clear
    }

    /// Connect the points in order.
    fn polyline(&mut self, points: &[Point]);

    /// Position of the write head.
    fn marker(&mut self, at: Point);
}

/// Surface that keeps the last frame in memory.
#[derive(Debug, Clone, Default)]
pub struct FrameRecord {
    pub polylines: Vec<Vec<Point>>,
    pub marker: Option<Point>,
}

impl FrameRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn point_count(&self) -> usize {
        self.polylines.iter().map(Vec::len).sum()
    }
}

impl TraceSurface for FrameRecord {
    fn begin(&mut self, _viewport: &Viewport) {
        self.polylines.clear();
        self.marker = None;
    }

    fn polyline(&mut self, points: &[Point]) {
        self.polylines.push(points.to_vec());
    }

    fn marker(&mut self, at: Point) {
        self.marker = Some(at);
    }
}
