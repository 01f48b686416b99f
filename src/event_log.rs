use crate::coords::Cell;
use crate::error::NavError;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;

/// Things that happen to an agent while it navigates
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum NavEvent {
    /// A move was requested from `from` towards `target`
    MoveRequested { from: Vec3, target: Vec3 },
    /// A path was found and turned into a curve
    PathFound {
        cells: usize,
        waypoints: usize,
        length: f32,
    },
    /// No path between the two cells
    PathNotFound { start: Cell, goal: Cell },
    /// An unfinished follow was dropped for a new request
    FollowSuperseded { at: Vec3 },
    /// The agent arrived at the end of its curve
    FollowCompleted { at: Vec3 },
}

/// Logged event with timestamp
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggedEvent {
    /// Milliseconds since start
    pub timestamp_ms: u64,
    pub event: NavEvent,
}

/// Event recorder
#[derive(Debug)]
pub struct EventLog {
    start_time: Instant,
    events: Vec<LoggedEvent>,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLog {
    pub fn new() -> Self {
        EventLog {
            start_time: Instant::now(),
            events: Vec::new(),
        }
    }

    /// Record an event with the current timestamp
    pub fn log(&mut self, event: NavEvent) {
        let timestamp_ms = self.start_time.elapsed().as_millis() as u64;
        self.events.push(LoggedEvent {
            timestamp_ms,
            event,
        });
    }

    /// Get all logged events
    pub fn events(&self) -> &[LoggedEvent] {
        &self.events
    }

    pub fn last(&self) -> Option<&NavEvent> {
        self.events.last().map(|logged| &logged.event)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Save log to JSON file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), NavError> {
        let json = serde_json::to_string_pretty(&self.events)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Get summary statistics
    pub fn summary(&self) -> String {
        let mut requests = 0;
        let mut found = 0;
        let mut failed = 0;
        let mut superseded = 0;
        let mut completed = 0;
        let mut planned_length = 0.0;

        for logged in &self.events {
            match &logged.event {
                NavEvent::MoveRequested { .. } => requests += 1,
                NavEvent::PathFound { length, .. } => {
                    found += 1;
                    planned_length += length;
                }
                NavEvent::PathNotFound { .. } => failed += 1,
                NavEvent::FollowSuperseded { .. } => superseded += 1,
                NavEvent::FollowCompleted { .. } => completed += 1,
            }
        }

        let duration = self.events.last().map_or(0, |last| last.timestamp_ms);

        format!(
            "Session Duration: {}ms\n\
             Move Requests: {} ({} found, {} not found)\n\
             Follows: {} completed, {} superseded\n\
             Planned Distance: {:.2}",
            duration, requests, found, failed, completed, superseded, planned_length
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let mut log = EventLog::new();
        log.log(NavEvent::MoveRequested {
            from: Vec3::ZERO,
            target: Vec3::X,
        });
        log.log(NavEvent::PathFound {
            cells: 2,
            waypoints: 2,
            length: 1.5,
        });
        log.log(NavEvent::PathNotFound {
            start: Cell::new(0, 0),
            goal: Cell::new(3, 3),
        });

        let summary = log.summary();
        assert!(summary.contains("Move Requests: 1 (1 found, 1 not found)"));
        assert!(summary.contains("Planned Distance: 1.50"));
        assert_eq!(
            log.last(),
            Some(&NavEvent::PathNotFound {
                start: Cell::new(0, 0),
                goal: Cell::new(3, 3),
            })
        );
    }

    #[test]
    fn test_save_to_file() {
        let mut log = EventLog::new();
        log.log(NavEvent::FollowCompleted {
            at: Vec3::new(1.0, 0.5, 2.0),
        });

        let path = std::env::temp_dir().join(format!("gridwalk_events_{}.json", std::process::id()));
        log.save_to_file(&path).unwrap();

        let json = std::fs::read_to_string(&path).unwrap();
        let restored: Vec<LoggedEvent> = serde_json::from_str(&json).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(restored.len(), 1);
        assert_eq!(restored[0].event, log.events()[0].event);
    }
}
