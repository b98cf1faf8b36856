//! Pure measurements behind the grinding and scraping actions.
//!
//! - Rotation: wrap-aware angular deltas folded into a 360° carry buffer.
//! - Scraping: mean perpendicular distance of a sampled path from its chord.

/// Planar sample in caller-defined units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

impl From<[f32; 2]> for Point {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

/// One full turn in degrees.
pub const FULL_TURN_DEG: f32 = 360.0;

/// Lines shorter than this are treated as a single point.
pub const MIN_LINE_LENGTH: f32 = 0.001;

/// Signed shortest angular difference `current - previous`, in (-180, 180].
#[inline]
pub fn delta_angle(previous_deg: f32, current_deg: f32) -> f32 {
    let d = (current_deg - previous_deg).rem_euclid(FULL_TURN_DEG);
    if d > 180.0 { d - FULL_TURN_DEG } else { d }
}

/// Carry buffer that turns a stream of angular movement into completed rotations.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RotationAccumulator {
    carry_deg: f32,
}

impl RotationAccumulator {
    /// Degrees accumulated towards the next full rotation, in [0, 360).
    pub fn carry(&self) -> f32 {
        self.carry_deg
    }

    /// Add the absolute shortest-path movement from `previous_deg` to `current_deg`.
    /// Returns the number of full rotations completed by this movement.
    pub fn accumulate(&mut self, previous_deg: f32, current_deg: f32) -> u32 {
        let delta = delta_angle(previous_deg, current_deg).abs();
        if !delta.is_finite() {
            return 0;
        }
        self.carry_deg += delta;
        let mut completed = 0;
        while self.carry_deg >= FULL_TURN_DEG {
            self.carry_deg -= FULL_TURN_DEG;
            completed += 1;
        }
        completed
    }
}

/// Average perpendicular deviation of `path` from the infinite line `start -> end`.
///
/// Returns 0 for fewer than two samples or when `start` and `end` coincide.
pub fn line_deviation(start: Point, end: Point, path: &[Point]) -> f32 {
    if path.len() < 2 {
        return 0.0;
    }
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let len = dx.hypot(dy);
    if !(len >= MIN_LINE_LENGTH) {
        return 0.0;
    }
    let total: f32 = path
        .iter()
        .map(|p| ((p.x - start.x) * dy - (p.y - start.y) * dx).abs() / len)
        .sum();
    total / path.len() as f32
}
