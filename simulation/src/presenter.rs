//! Lifecycle hooks for renderers.

use std::collections::BTreeSet;

use arkadien_core::{EnemyId, Event, ProjectileId, TowerId, Vec3};

/// Handle of any entity that has a visual representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Entity {
    /// A live enemy.
    Enemy(EnemyId),
    /// A placed tower.
    Tower(TowerId),
    /// A projectile in flight.
    Projectile(ProjectileId),
}

/// Receives entity lifecycle transitions.
pub trait EntityPresenter {
    /// Called once when `entity` enters play at `position`.
    fn create_visual(&mut self, entity: Entity, position: Vec3);

    /// Called once when `entity` leaves play.
    fn remove_visual(&mut self, entity: Entity);
}

/// Translates world events into presenter calls.
///
/// Tracks which entities have a visual so a world reset removes each of them
/// exactly once.
#[derive(Debug, Default)]
pub struct Presentation {
    live: BTreeSet<Entity>,
}

impl Presentation {
    /// Creates a presentation with no visuals.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entities that currently have a visual.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Forwards the lifecycle transitions contained in `events`.
    pub fn observe<P>(&mut self, events: &[Event], presenter: &mut P)
    where
        P: EntityPresenter + ?Sized,
    {
        for event in events {
            match *event {
                Event::EnemySpawned {
                    enemy, position, ..
                } => self.create(Entity::Enemy(enemy), position, presenter),
                Event::EnemyKilled { enemy, .. } | Event::EnemyReachedEnd { enemy, .. } => {
                    self.remove(Entity::Enemy(enemy), presenter);
                }
                Event::TowerPlaced {
                    tower, position, ..
                } => self.create(Entity::Tower(tower), position, presenter),
                Event::TowerSold { tower, .. } => self.remove(Entity::Tower(tower), presenter),
                Event::ProjectileLaunched {
                    projectile,
                    position,
                    ..
                } => self.create(Entity::Projectile(projectile), position, presenter),
                Event::ProjectileHit { projectile, .. } | Event::ProjectileExpired { projectile } => {
                    self.remove(Entity::Projectile(projectile), presenter);
                }
                Event::WorldReset => {
                    for entity in std::mem::take(&mut self.live) {
                        presenter.remove_visual(entity);
                    }
                }
                _ => {}
            }
        }
    }

    fn create<P>(&mut self, entity: Entity, position: Vec3, presenter: &mut P)
    where
        P: EntityPresenter + ?Sized,
    {
        if self.live.insert(entity) {
            presenter.create_visual(entity, position);
        }
    }

    fn remove<P>(&mut self, entity: Entity, presenter: &mut P)
    where
        P: EntityPresenter + ?Sized,
    {
        if self.live.remove(&entity) {
            presenter.remove_visual(entity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arkadien_core::{CellCoord, EnemyKind, TowerKind};

    #[derive(Default)]
    struct Recorder {
        calls: Vec<(bool, Entity)>,
    }

    impl EntityPresenter for Recorder {
        fn create_visual(&mut self, entity: Entity, _position: Vec3) {
            self.calls.push((true, entity));
        }

        fn remove_visual(&mut self, entity: Entity) {
            self.calls.push((false, entity));
        }
    }

    #[test]
    fn each_transition_is_reported_once() {
        let enemy = EnemyId::new(0, 0);
        let mut presentation = Presentation::new();
        let mut recorder = Recorder::default();
        let spawned = Event::EnemySpawned {
            enemy,
            kind: EnemyKind::Daemon,
            wave: 1,
            position: Vec3::ZERO,
        };
        let killed = Event::EnemyKilled {
            enemy,
            kind: EnemyKind::Daemon,
            gold_reward: 20,
            score_reward: 25,
        };
        presentation.observe(&[spawned.clone(), spawned, killed.clone(), killed], &mut recorder);
        assert_eq!(
            recorder.calls,
            vec![(true, Entity::Enemy(enemy)), (false, Entity::Enemy(enemy))]
        );
    }

    #[test]
    fn reset_removes_every_visual() {
        let mut presentation = Presentation::new();
        let mut recorder = Recorder::default();
        let tower = TowerId::new(0);
        let projectile = ProjectileId::new(3);
        presentation.observe(
            &[
                Event::TowerPlaced {
                    tower,
                    kind: TowerKind::Fire,
                    cell: CellCoord::new(1, 1),
                    position: Vec3::ONE,
                },
                Event::ProjectileLaunched {
                    projectile,
                    tower,
                    target: EnemyId::new(0, 0),
                    position: Vec3::ONE,
                },
                Event::WorldReset,
            ],
            &mut recorder,
        );
        assert_eq!(presentation.live_count(), 0);
        assert_eq!(
            &recorder.calls[2..],
            &[
                (false, Entity::Tower(tower)),
                (false, Entity::Projectile(projectile)),
            ]
        );
    }
}
