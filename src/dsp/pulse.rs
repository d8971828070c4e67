/*
Raised-Cosine Pulses
====================

Every deflection in the trace (P, Q, R, S and T) is one raised-cosine pulse:
a single period of a cosine, flipped and lifted so it starts and ends on the
baseline.

Vocabulary
----------

  start       Absolute time the pulse window opens (t0).

  breadth     Width of the window in time units (b). A breadth of zero
              disables the pulse: it contributes nothing anywhere.

  height      Signed peak value reached at the middle of the window (h).
              Negative heights give downward deflections (Q and S).


The Shape
---------

  value
    h ┤        ╭──╮
      │      ╭─╯  ╰─╮
      │    ╭─╯      ╰─╮
    0 ┼────╯          ╰──────→ t
          t0   t0+b/2   t0+b

    value(t) = (h / 2) * (1 - cos(2π (t - t0) / b))     for t0 <= t <= t0 + b
    value(t) = 0                                         otherwise

At both edges the cosine term is 1, so the value is exactly 0. The slope is
also 0 there, which is what lets a pulse join the flat baseline without a
visible corner.


Windows and Priority
--------------------

A sample is assigned to at most one pulse. The candidate windows are checked
in the fixed order P, Q, R, S, T and the first window containing the sample
wins, even if its value happens to be 0 at that sample. With a correct beat
layout the windows never overlap, so the order only matters for degenerate
layouts. Windows are half-open, [start, start + breadth), so two abutting
pulses never both claim the shared boundary sample.
*/

use std::f64::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which deflection of the beat a pulse belongs to.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PulseKind {
    P,
    Q,
    R,
    S,
    T,
}

impl PulseKind {
    /// Matching priority, earliest checked first.
    pub const PRIORITY: [PulseKind; 5] = [
        PulseKind::P,
        PulseKind::Q,
        PulseKind::R,
        PulseKind::S,
        PulseKind::T,
    ];
}

/// Value of a raised-cosine pulse at time `t`.
#[inline]
pub fn raised_cosine(t: f64, height: f64, breadth: f64, start: f64) -> f64 {
    if breadth == 0.0 || t < start || t > start + breadth {
        return 0.0;
    }
    (height / 2.0) * (1.0 - (TAU * (t - start) / breadth).cos())
}

/// One placed pulse: an absolute window plus the height it peaks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseWindow {
    pub kind: PulseKind,
    pub start: f64,
    pub breadth: f64,
    pub height: f64,
}

impl PulseWindow {
    pub fn new(kind: PulseKind, start: f64, breadth: f64, height: f64) -> Self {
        Self {
            kind,
            start,
            breadth,
            height,
        }
    }

    #[inline]
    pub fn end(&self) -> f64 {
        self.start + self.breadth
    }

    /// Disabled (zero-breadth) pulses never contain a sample.
    #[inline]
    pub fn contains(&self, t: f64) -> bool {
        self.breadth > 0.0 && t >= self.start && t < self.end()
    }

    #[inline]
    pub fn value_at(&self, t: f64) -> f64 {
        raised_cosine(t, self.height, self.breadth, self.start)
    }
}

/// Ordered set of pulse windows for one beat.
///
/// Windows are kept grouped by kind in P, Q, R, S, T order and by start time
/// within a kind, so a linear scan with early exit implements the priority
/// rule.
#[derive(Debug, Clone, Default)]
pub struct PulseTrain {
    windows: Vec<PulseWindow>,
}

impl PulseTrain {
    pub fn new() -> Self {
        Self {
            windows: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            windows: Vec::with_capacity(capacity),
        }
    }

    /// Add a window. Callers push in priority order.
    pub fn push(&mut self, window: PulseWindow) {
        debug_assert!(
            self.windows
                .last()
                .map_or(true, |last| priority(last.kind) <= priority(window.kind)),
            "pulse windows must be pushed in P, Q, R, S, T order"
        );
        self.windows.push(window);
    }

    pub fn windows(&self) -> &[PulseWindow] {
        &self.windows
    }

    /// First window (in priority order) containing `t`.
    pub fn matching(&self, t: f64) -> Option<&PulseWindow> {
        self.windows.iter().find(|w| w.contains(t))
    }

    /// Amplitude at `t`: the first matching pulse's value, or 0 on the baseline.
    pub fn amplitude(&self, t: f64) -> f64 {
        self.matching(t).map_or(0.0, |w| w.value_at(t))
    }

    /// Number of enabled windows of the given kind.
    pub fn count(&self, kind: PulseKind) -> usize {
        self.windows
            .iter()
            .filter(|w| w.kind == kind && w.breadth > 0.0)
            .count()
    }
}

fn priority(kind: PulseKind) -> usize {
    PulseKind::PRIORITY
        .iter()
        .position(|k| *k == kind)
        .unwrap_or(usize::MAX)
}
