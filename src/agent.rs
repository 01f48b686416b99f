use crate::coords::{to_cell, to_position};
use crate::curve::CatmullRomCurve;
use crate::error::NavError;
use crate::event_log::{EventLog, NavEvent};
use crate::grid::{Grid, ObstacleSource};
use crate::pathfinding::{find_path_with_limit, format_path, DEFAULT_MAX_EXPANSIONS};
use crate::smoothing::{path_length, PathSmoother, DEFAULT_STEP_SIZE};
use glam::Vec3;

/// Waypoints closer than this count as the same spot
const ARRIVAL_EPSILON: f32 = 1e-4;

/// Receives the agent's position once per tick while it moves
pub trait PositionSink {
    fn publish(&mut self, position: Vec3);
}

impl<F: FnMut(Vec3)> PositionSink for F {
    fn publish(&mut self, position: Vec3) {
        (*self)(position)
    }
}

/// Movement and clearance settings for an agent
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// Ground speed in world units per second
    pub speed: f32,
    pub radius: f32,
    pub obstacle_radius: f32,
    pub smoothing: bool,
    pub step_size: f32,
    pub max_expansions: usize,
    pub record_events: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            speed: 2.5,
            radius: 0.5,
            obstacle_radius: std::f32::consts::FRAC_1_SQRT_2,
            smoothing: true,
            step_size: DEFAULT_STEP_SIZE,
            max_expansions: DEFAULT_MAX_EXPANSIONS,
            record_events: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AgentState {
    Idle,
    Following,
}

/// An in-flight walk along a curve
#[derive(Clone, Debug)]
pub struct FollowState {
    curve: CatmullRomCurve,
    /// Progress along the curve, 0 at the start and 1 at the end
    weight: f32,
    speed: f32,
}

impl FollowState {
    pub fn new(curve: CatmullRomCurve, speed: f32) -> Self {
        FollowState {
            curve,
            weight: 0.0,
            speed,
        }
    }

    pub fn curve(&self) -> &CatmullRomCurve {
        &self.curve
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// Advance by one frame. Returns the new position and whether the end was reached.
    pub fn advance(&mut self, delta_time: f32) -> (Vec3, bool) {
        let length = self.curve.length();
        if length <= ARRIVAL_EPSILON {
            self.weight = 1.0;
        } else {
            self.weight += delta_time * self.speed / length;
        }

        let finished = self.weight >= 1.0;
        (self.curve.evaluate(self.weight.min(1.0)), finished)
    }
}

/// Obstacles as the agent saw them at setup
#[derive(Clone, Debug)]
struct ObstacleSnapshot {
    grid: Grid,
    centers: Vec<Vec3>,
}

impl ObstacleSnapshot {
    fn capture<S: ObstacleSource + ?Sized>(source: &S) -> Self {
        ObstacleSnapshot {
            grid: Grid::from_source(source),
            centers: source.obstacle_centers(),
        }
    }
}

/// An agent that walks to requested positions around fixed obstacles
#[derive(Debug)]
pub struct Agent {
    position: Vec3,
    config: AgentConfig,
    obstacles: ObstacleSnapshot,
    follow: Option<FollowState>,
    events: Option<EventLog>,
}

impl Agent {
    /// Create an idle agent at `position`, taking a snapshot of the obstacles
    pub fn new<S: ObstacleSource + ?Sized>(position: Vec3, config: AgentConfig, obstacles: &S) -> Self {
        let events = config.record_events.then(EventLog::new);
        Agent {
            position,
            config,
            obstacles: ObstacleSnapshot::capture(obstacles),
            follow: None,
            events,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn state(&self) -> AgentState {
        if self.follow.is_some() {
            AgentState::Following
        } else {
            AgentState::Idle
        }
    }

    pub fn follow(&self) -> Option<&FollowState> {
        self.follow.as_ref()
    }

    pub fn events(&self) -> Option<&EventLog> {
        self.events.as_ref()
    }

    /// Obstacle grid used for searches
    pub fn grid(&self) -> &Grid {
        &self.obstacles.grid
    }

    /// Replace the obstacle snapshot. Takes effect on the next move request.
    pub fn set_obstacles<S: ObstacleSource + ?Sized>(&mut self, obstacles: &S) {
        self.obstacles = ObstacleSnapshot::capture(obstacles);
    }

    /// Plan a walk to `target` and start following it.
    ///
    /// Any walk in progress is dropped first, so on failure the agent is left
    /// idle where it stands.
    pub fn move_to_position(&mut self, target: Vec3) -> Result<(), NavError> {
        if self.follow.take().is_some() {
            log::debug!("[agent] follow superseded at {:?}", self.position);
            self.record(NavEvent::FollowSuperseded { at: self.position });
        }
        self.record(NavEvent::MoveRequested {
            from: self.position,
            target,
        });

        let start = to_cell(self.position);
        let goal = to_cell(target);
        let cells = match find_path_with_limit(start, goal, &self.obstacles.grid, self.config.max_expansions) {
            Ok(cells) => cells,
            Err(err) => {
                log::warn!("Failed to find a path to the destination: {}", err);
                self.record(NavEvent::PathNotFound { start, goal });
                return Err(err);
            }
        };
        log::debug!("[agent] path {}", format_path(&cells));

        let mut waypoints: Vec<Vec3> = cells.iter().copied().map(to_position).collect();
        // Walk from where the agent actually is, not from its cell center
        waypoints[0] = self.position;
        if waypoints.len() == 1 {
            waypoints.push(to_position(goal));
        }

        if self.config.smoothing {
            waypoints = PathSmoother::new(
                &self.obstacles.centers,
                self.config.radius,
                self.config.obstacle_radius,
            )
            .with_step_size(self.config.step_size)
            .smooth(&waypoints);
        }

        if path_length(&waypoints) <= ARRIVAL_EPSILON {
            log::debug!("[agent] already at {}", goal);
            return Ok(());
        }

        let curve = CatmullRomCurve::new(&waypoints)?;
        self.record(NavEvent::PathFound {
            cells: cells.len(),
            waypoints: waypoints.len(),
            length: curve.length(),
        });
        self.follow = Some(FollowState::new(curve, self.config.speed));
        Ok(())
    }

    /// Drop the current walk, if any, leaving the agent where it is
    pub fn stop(&mut self) {
        self.follow = None;
    }

    /// Advance one frame and publish the new position. Call once per frame.
    pub fn update<P: PositionSink + ?Sized>(&mut self, delta_time: f32, sink: &mut P) -> AgentState {
        let Some(follow) = self.follow.as_mut() else {
            return AgentState::Idle;
        };

        let (position, finished) = follow.advance(delta_time);
        self.position = position;
        sink.publish(position);

        if finished {
            self.follow = None;
            log::info!("[agent] arrived at {:?}", position);
            self.record(NavEvent::FollowCompleted { at: position });
        }

        self.state()
    }

    fn record(&mut self, event: NavEvent) {
        if let Some(events) = self.events.as_mut() {
            events.log(event);
        }
    }
}
