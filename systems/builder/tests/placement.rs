use arkadien_core::{Command, Event, GamePhase, PlacementError, TowerKind, Vec3};
use arkadien_system_builder::{Builder, BuilderInput};
use arkadien_system_movement::WaypointPath;
use arkadien_world::{self as world, query, World, WorldOptions};

fn playing_world() -> World {
    let path = WaypointPath::new(vec![Vec3::new(-10.0, 0.0, 0.0), Vec3::new(10.0, 0.0, 0.0)])
        .expect("valid path");
    let mut world = World::new(path, WorldOptions::default());
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SetPhase {
            phase: GamePhase::Playing,
        },
        &mut events,
    );
    world
}

fn drive(world: &mut World, builder: &mut Builder, input: BuilderInput) -> Vec<Event> {
    let mut commands = Vec::new();
    let view: &World = world;
    builder.handle(
        &[],
        input,
        |position| query::tower_at(view, position),
        &mut commands,
    );
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

#[test]
fn preview_agrees_with_placement_outcome() {
    let mut world = playing_world();
    let mut builder = Builder::new();
    builder.select(TowerKind::WaterWind);
    let spot = Vec3::new(5.0, 0.0, 5.0);

    let preview = builder
        .preview(spot, |kind, position| query::placement_check(&world, kind, position))
        .expect("kind selected");
    assert!(preview.placeable());

    let events = drive(
        &mut world,
        &mut builder,
        BuilderInput {
            confirm_at: Some(spot),
            ..BuilderInput::default()
        },
    );
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::TowerPlaced { kind: TowerKind::WaterWind, .. })));

    let preview = builder
        .preview(spot, |kind, position| query::placement_check(&world, kind, position))
        .expect("kind selected");
    assert_eq!(preview.outcome, Err(PlacementError::CellOccupied));
}

#[test]
fn selling_through_builder_refunds_and_frees_cell() {
    let mut world = playing_world();
    let mut builder = Builder::new();
    builder.select(TowerKind::Fire);
    let spot = Vec3::new(-5.0, 0.0, 5.0);

    let _ = drive(
        &mut world,
        &mut builder,
        BuilderInput {
            confirm_at: Some(spot),
            ..BuilderInput::default()
        },
    );
    assert_eq!(query::gold(&world), 50);

    let events = drive(
        &mut world,
        &mut builder,
        BuilderInput {
            sell_at: Some(spot),
            ..BuilderInput::default()
        },
    );
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::TowerSold { refund: 110, .. })));
    assert_eq!(query::gold(&world), 160);
    assert_eq!(query::tower_at(&world, spot), None);
}
