//! Catmull-Rom curve through a waypoint sequence.
//!
//! The curve passes through every waypoint. Its parameter is normalized by arc
//! length, so equal steps of `t` cover equal distances along the curve.

use crate::error::NavError;
use glam::Vec3;

/// Arc-length samples per segment
const SAMPLES_PER_SEGMENT: usize = 32;

/// One cubic piece between two waypoints
#[derive(Clone, Debug)]
struct Segment {
    // Polynomial coefficients: p(u) = a + b*u + c*u^2 + d*u^3
    a: Vec3,
    b: Vec3,
    c: Vec3,
    d: Vec3,
    /// Distance along the whole curve where this segment begins
    start_distance: f32,
    /// Cumulative length at u = i / SAMPLES_PER_SEGMENT, relative to the segment
    lengths: Vec<f32>,
}

impl Segment {
    fn new(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, start_distance: f32) -> Self {
        let mut segment = Segment {
            a: p1,
            b: (p2 - p0) * 0.5,
            c: (p0 * 2.0 - p1 * 5.0 + p2 * 4.0 - p3) * 0.5,
            d: (-p0 + p1 * 3.0 - p2 * 3.0 + p3) * 0.5,
            start_distance,
            lengths: Vec::with_capacity(SAMPLES_PER_SEGMENT + 1),
        };

        let mut total = 0.0;
        let mut previous = segment.point(0.0);
        segment.lengths.push(0.0);
        for i in 1..=SAMPLES_PER_SEGMENT {
            let point = segment.point(i as f32 / SAMPLES_PER_SEGMENT as f32);
            total += previous.distance(point);
            segment.lengths.push(total);
            previous = point;
        }
        segment
    }

    fn point(&self, u: f32) -> Vec3 {
        self.a + (self.b + (self.c + self.d * u) * u) * u
    }

    fn derivative(&self, u: f32) -> Vec3 {
        self.b + (self.c * 2.0 + self.d * (3.0 * u)) * u
    }

    fn length(&self) -> f32 {
        self.lengths[SAMPLES_PER_SEGMENT]
    }

    /// Local parameter at a distance from the segment start
    fn parameter_at(&self, distance: f32) -> f32 {
        if distance <= 0.0 {
            return 0.0;
        }
        if distance >= self.length() {
            return 1.0;
        }

        let index = self.lengths.partition_point(|&l| l < distance).max(1);
        let before = self.lengths[index - 1];
        let after = self.lengths[index];
        let span = after - before;
        let fraction = if span > 0.0 {
            (distance - before) / span
        } else {
            0.0
        };
        (index as f32 - 1.0 + fraction) / SAMPLES_PER_SEGMENT as f32
    }
}

/// Interpolating curve over t in [0, 1]
#[derive(Clone, Debug)]
pub struct CatmullRomCurve {
    points: Vec<Vec3>,
    segments: Vec<Segment>,
    length: f32,
}

impl CatmullRomCurve {
    /// Build the curve through `points`, in order. End tangents come from
    /// reflected phantom points, so two waypoints give a straight line.
    pub fn new(points: &[Vec3]) -> Result<Self, NavError> {
        if points.len() < 2 {
            return Err(NavError::DegenerateCurveInput {
                count: points.len(),
            });
        }

        let last = points.len() - 1;
        let before_first = points[0] * 2.0 - points[1];
        let after_last = points[last] * 2.0 - points[last - 1];
        let control = |i: isize| -> Vec3 {
            if i < 0 {
                before_first
            } else if i as usize > last {
                after_last
            } else {
                points[i as usize]
            }
        };

        let mut segments = Vec::with_capacity(last);
        let mut length = 0.0;
        for i in 0..last as isize {
            let segment = Segment::new(
                control(i - 1),
                control(i),
                control(i + 1),
                control(i + 2),
                length,
            );
            length += segment.length();
            segments.push(segment);
        }

        log::debug!(
            "[curve] {} waypoints, {} segments, length {:.3}",
            points.len(),
            segments.len(),
            length
        );

        Ok(CatmullRomCurve {
            points: points.to_vec(),
            segments,
            length,
        })
    }

    /// Total arc length
    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Position at `t`, clamped to [0, 1]
    pub fn evaluate(&self, t: f32) -> Vec3 {
        if t <= 0.0 {
            return self.points[0];
        }
        if t >= 1.0 {
            return self.points[self.points.len() - 1];
        }
        let (segment, u) = self.locate(t);
        segment.point(u)
    }

    /// Unit direction of travel at `t`
    pub fn tangent(&self, t: f32) -> Vec3 {
        let (segment, u) = self.locate(t.clamp(0.0, 1.0));
        segment.derivative(u).normalize_or_zero()
    }

    /// Unit normal lying in the ground plane, to the left of travel
    pub fn normal(&self, t: f32) -> Vec3 {
        Vec3::Y.cross(self.tangent(t)).normalize_or_zero()
    }

    /// Parameter at which the curve passes through waypoint `index`
    pub fn knot_parameter(&self, index: usize) -> Option<f32> {
        if index >= self.points.len() {
            return None;
        }
        if self.length <= 0.0 {
            return Some(0.0);
        }
        let distance = match self.segments.get(index) {
            Some(segment) => segment.start_distance,
            None => self.length,
        };
        Some(distance / self.length)
    }

    /// Segment and local parameter for a global `t`
    fn locate(&self, t: f32) -> (&Segment, f32) {
        let distance = t * self.length;
        let index = self
            .segments
            .partition_point(|s| s.start_distance + s.length() < distance)
            .min(self.segments.len() - 1);
        let segment = &self.segments[index];
        (segment, segment.parameter_at(distance - segment.start_distance))
    }
}
