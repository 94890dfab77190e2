#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic waypoint following for enemies.
//!
//! Paths are authored, never searched. [`WaypointPath::advance`] is a pure
//! function of its inputs so replays and unit tests need no world state.

use arkadien_core::{PathError, Vec3};

/// Ordered, immutable sequence of at least two waypoints.
#[derive(Clone, Debug, PartialEq)]
pub struct WaypointPath {
    waypoints: Vec<Vec3>,
}

/// Result of advancing an entity along a path for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathStep {
    /// Position after the step.
    pub position: Vec3,
    /// Index of the waypoint the entity heads for after the step.
    pub waypoint_index: usize,
    /// Whether the entity passed the last waypoint.
    pub reached_end: bool,
}

impl WaypointPath {
    /// Creates a path from its waypoints in walking order.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::TooShort`] when fewer than two waypoints are given.
    pub fn new(waypoints: Vec<Vec3>) -> Result<Self, PathError> {
        if waypoints.len() < 2 {
            return Err(PathError::TooShort {
                len: waypoints.len(),
            });
        }
        Ok(Self { waypoints })
    }

    /// Waypoints in walking order.
    #[must_use]
    pub fn waypoints(&self) -> &[Vec3] {
        &self.waypoints
    }

    /// Number of waypoints.
    #[must_use]
    pub fn waypoint_count(&self) -> usize {
        self.waypoints.len()
    }

    /// Waypoint at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::InvalidWaypointIndex`] when `index` is past the end.
    pub fn waypoint(&self, index: usize) -> Result<Vec3, PathError> {
        self.waypoints
            .get(index)
            .copied()
            .ok_or(PathError::InvalidWaypointIndex {
                index,
                len: self.waypoints.len(),
            })
    }

    /// First waypoint, where enemies spawn.
    #[must_use]
    pub fn start(&self) -> Vec3 {
        self.waypoints[0]
    }

    /// Last waypoint, where enemies leave play.
    #[must_use]
    pub fn end(&self) -> Vec3 {
        self.waypoints[self.waypoints.len() - 1]
    }

    /// Moves `position` up to `speed` units toward `waypoints[waypoint_index]`.
    ///
    /// When the waypoint lies within `speed` the entity snaps onto it and the
    /// index increments. An index already past the end returns the input
    /// position unchanged with `reached_end` set.
    #[must_use]
    pub fn advance(&self, position: Vec3, waypoint_index: usize, speed: f32) -> PathStep {
        let Ok(target) = self.waypoint(waypoint_index) else {
            return PathStep {
                position,
                waypoint_index,
                reached_end: true,
            };
        };

        let speed = speed.max(0.0);
        let offset = target - position;
        let distance = offset.length();

        if distance <= speed {
            let next_index = waypoint_index + 1;
            return PathStep {
                position: target,
                waypoint_index: next_index,
                reached_end: next_index >= self.waypoints.len(),
            };
        }

        PathStep {
            position: position + offset / distance * speed,
            waypoint_index,
            reached_end: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_path() -> WaypointPath {
        WaypointPath::new(vec![Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)]).expect("valid path")
    }

    #[test]
    fn rejects_paths_without_an_end() {
        assert_eq!(
            WaypointPath::new(vec![Vec3::ZERO]),
            Err(PathError::TooShort { len: 1 })
        );
    }

    #[test]
    fn moves_speed_units_toward_waypoint() {
        let path = straight_path();
        let step = path.advance(Vec3::ZERO, 1, 0.5);
        assert_eq!(step.position, Vec3::new(0.5, 0.0, 0.0));
        assert_eq!(step.waypoint_index, 1);
        assert!(!step.reached_end);
    }

    #[test]
    fn snaps_onto_waypoint_within_reach() {
        let path = straight_path();
        let step = path.advance(Vec3::new(9.8, 0.0, 0.0), 1, 0.5);
        assert_eq!(step.position, Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(step.waypoint_index, 2);
        assert!(step.reached_end);
    }

    #[test]
    fn index_past_end_is_a_completed_no_op() {
        let path = straight_path();
        let position = Vec3::new(3.0, 1.0, 2.0);
        let step = path.advance(position, 7, 1.0);
        assert_eq!(step.position, position);
        assert_eq!(step.waypoint_index, 7);
        assert!(step.reached_end);
    }

    #[test]
    fn invalid_index_is_reported() {
        assert_eq!(
            straight_path().waypoint(2),
            Err(PathError::InvalidWaypointIndex { index: 2, len: 2 })
        );
    }
}
