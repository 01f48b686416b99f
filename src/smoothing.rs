//! Path smoothing by string pulling.
//!
//! A dense cell path is culled down to the waypoints needed to keep clearance
//! from every obstacle. The scan runs in both directions and the shorter
//! result wins, since a single scan is sensitive to which end it starts from
//! near obstacle corners.

use glam::Vec3;

/// Sampling distance along a segment for clearance checks
pub const DEFAULT_STEP_SIZE: f32 = 0.5;

/// Clearance-based path smoother over a snapshot of obstacle centers
#[derive(Clone, Debug)]
pub struct PathSmoother<'a> {
    obstacles: &'a [Vec3],
    radius_squared: f32,
    step_size: f32,
}

impl<'a> PathSmoother<'a> {
    /// Obstacles are circles of `obstacle_radius`; the agent is a circle of
    /// `agent_radius`. A segment is clear when no obstacle center comes within
    /// the sum of both.
    pub fn new(obstacles: &'a [Vec3], agent_radius: f32, obstacle_radius: f32) -> Self {
        let radius = agent_radius + obstacle_radius;
        Self {
            obstacles,
            radius_squared: radius * radius,
            step_size: DEFAULT_STEP_SIZE,
        }
    }

    pub fn with_step_size(mut self, step_size: f32) -> Self {
        if step_size > 0.0 {
            self.step_size = step_size;
        }
        self
    }

    /// Check the interior samples of `start -> end` against every obstacle.
    ///
    /// Distances are measured in the ground plane. Endpoints are not sampled.
    pub fn is_walkable(&self, start: Vec3, end: Vec3) -> bool {
        let direction = end - start;
        let steps = (direction.length() / self.step_size).floor() as usize;

        for step in 1..steps {
            let position = start + direction * (step as f32 / steps as f32);
            let blocked = self.obstacles.iter().any(|obstacle| {
                let dx = position.x - obstacle.x;
                let dz = position.z - obstacle.z;
                dx * dx + dz * dz < self.radius_squared
            });
            if blocked {
                return false;
            }
        }

        true
    }

    /// Smooth in both scan directions and keep the shorter result
    pub fn smooth(&self, path: &[Vec3]) -> Vec<Vec3> {
        let front_to_back = self.cull(path);

        let reversed: Vec<Vec3> = path.iter().rev().copied().collect();
        let mut back_to_front = self.cull(&reversed);
        back_to_front.reverse();

        let forward_length = path_length(&front_to_back);
        let backward_length = path_length(&back_to_front);
        log::debug!(
            "[smooth] {} points -> forward {} ({:.3}), backward {} ({:.3})",
            path.len(),
            front_to_back.len(),
            forward_length,
            back_to_front.len(),
            backward_length
        );

        if forward_length < backward_length {
            front_to_back
        } else {
            back_to_front
        }
    }

    /// Single forward string-pulling scan
    pub fn cull(&self, path: &[Vec3]) -> Vec<Vec3> {
        if path.len() <= 2 {
            return path.to_vec();
        }

        let mut result = vec![path[0]];
        let mut current = path[0];
        let mut intermediate = path[1];

        for &next in &path[2..] {
            if !self.is_walkable(current, next) {
                result.push(intermediate);
                current = intermediate;
            }
            intermediate = next;
        }

        result.push(path[path.len() - 1]);
        result
    }
}

/// Smooth a path against obstacle centers with the default step size
pub fn smooth_path(
    path: &[Vec3],
    obstacles: &[Vec3],
    agent_radius: f32,
    obstacle_radius: f32,
) -> Vec<Vec3> {
    PathSmoother::new(obstacles, agent_radius, obstacle_radius).smooth(path)
}

/// Sum of segment lengths
pub fn path_length(path: &[Vec3]) -> f32 {
    path.windows(2).map(|pair| pair[0].distance(pair[1])).sum()
}
