use arkadien_core::Vec3;
use arkadien_system_movement::WaypointPath;
use proptest::prelude::*;

fn waypoint() -> impl Strategy<Value = Vec3> {
    (-20.0_f32..20.0, -2.0_f32..2.0, -20.0_f32..20.0).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

fn walk(path: &WaypointPath, speed: f32, max_steps: usize) -> Option<(Vec3, usize)> {
    let mut position = path.start();
    let mut index = 0;
    for step_count in 1..=max_steps {
        let step = path.advance(position, index, speed);
        assert!(step.waypoint_index >= index, "waypoint index went backwards");
        position = step.position;
        index = step.waypoint_index;
        if step.reached_end {
            return Some((position, step_count));
        }
    }
    None
}

proptest! {
    #[test]
    fn walking_terminates_exactly_on_last_waypoint(
        waypoints in prop::collection::vec(waypoint(), 2..8),
        speed in 0.01_f32..5.0,
    ) {
        let path = WaypointPath::new(waypoints).expect("at least two waypoints");
        let length: f32 = path
            .waypoints()
            .windows(2)
            .map(|pair| pair[0].distance(pair[1]))
            .sum();
        let bound = (length / speed).ceil() as usize + 2 * path.waypoint_count() + 2;

        let outcome = walk(&path, speed, bound);
        prop_assert!(outcome.is_some(), "path did not complete within {} steps", bound);
        let (position, _) = outcome.expect("checked above");
        prop_assert_eq!(position, path.end());
    }
}

#[test]
fn authored_winding_path_completes_at_schattenwesen_speed() {
    let path = WaypointPath::new(vec![
        Vec3::new(-15.0, 0.0, -10.0),
        Vec3::new(-10.0, 0.0, -10.0),
        Vec3::new(-10.0, 0.0, -5.0),
        Vec3::new(-5.0, 0.0, -5.0),
        Vec3::new(-5.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 5.0),
        Vec3::new(5.0, 0.0, 5.0),
        Vec3::new(5.0, 0.0, 10.0),
        Vec3::new(10.0, 0.0, 10.0),
        Vec3::new(15.0, 0.0, 10.0),
    ])
    .expect("valid path");

    let (position, steps) = walk(&path, 0.08, 10_000).expect("path completes");
    assert_eq!(position, Vec3::new(15.0, 0.0, 10.0));
    // 50 units of path at 0.08 units per tick, plus rounding at each corner.
    assert!((625..=640).contains(&steps), "unexpected step count {steps}");
}
