//! Homing projectiles fired by ranged towers.

use arkadien_core::{EnemyId, ProjectileId, SlowAura, TowerId, Vec3};

/// Result of moving a projectile for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Flight {
    /// The target left play, the projectile vanishes without effect.
    Lost,
    /// The projectile reached the target this tick.
    Impact,
    /// The projectile is still travelling.
    InFlight,
}

#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) id: ProjectileId,
    pub(crate) tower: TowerId,
    pub(crate) target: EnemyId,
    pub(crate) position: Vec3,
    pub(crate) damage: u32,
    pub(crate) speed: f32,
    pub(crate) on_hit: Option<SlowAura>,
}

impl Projectile {
    /// Homes in on the target's current position, or reports the target lost
    /// when `target_position` is `None`.
    pub(crate) fn fly(&mut self, target_position: Option<Vec3>) -> Flight {
        let Some(target_position) = target_position else {
            return Flight::Lost;
        };

        let offset = target_position - self.position;
        let distance = offset.length();
        if distance <= self.speed {
            self.position = target_position;
            return Flight::Impact;
        }

        self.position += offset / distance * self.speed;
        Flight::InFlight
    }
}

/// Active projectiles in launch order.
#[derive(Debug, Default)]
pub(crate) struct ProjectileSet {
    active: Vec<Projectile>,
    next_id: u32,
}

impl ProjectileSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn launch(
        &mut self,
        tower: TowerId,
        target: EnemyId,
        position: Vec3,
        damage: u32,
        speed: f32,
        on_hit: Option<SlowAura>,
    ) -> ProjectileId {
        let id = ProjectileId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.active.push(Projectile {
            id,
            tower,
            target,
            position,
            damage,
            speed,
            on_hit,
        });
        id
    }

    /// Hands every active projectile to the caller, who returns the ones
    /// still in flight through [`ProjectileSet::restore`].
    pub(crate) fn take(&mut self) -> Vec<Projectile> {
        std::mem::take(&mut self.active)
    }

    pub(crate) fn restore(&mut self, survivors: Vec<Projectile>) {
        self.active = survivors;
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.active.iter()
    }

    pub(crate) fn clear(&mut self) {
        self.active.clear();
        self.next_id = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projectile(speed: f32) -> Projectile {
        Projectile {
            id: ProjectileId::new(0),
            tower: TowerId::new(0),
            target: EnemyId::new(0, 0),
            position: Vec3::ZERO,
            damage: 10,
            speed,
            on_hit: None,
        }
    }

    #[test]
    fn moves_speed_units_toward_target() {
        let mut shot = projectile(0.5);
        assert_eq!(shot.fly(Some(Vec3::new(2.0, 0.0, 0.0))), Flight::InFlight);
        assert_eq!(shot.position, Vec3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn impact_when_target_within_one_step() {
        let mut shot = projectile(0.5);
        let target = Vec3::new(0.0, 0.25, 0.25);
        assert_eq!(shot.fly(Some(target)), Flight::Impact);
        assert_eq!(shot.position, target);
    }

    #[test]
    fn missing_target_is_lost() {
        let mut shot = projectile(0.5);
        assert_eq!(shot.fly(None), Flight::Lost);
        assert_eq!(shot.position, Vec3::ZERO);
    }

    #[test]
    fn identifiers_increase_in_launch_order() {
        let mut set = ProjectileSet::new();
        let first = set.launch(TowerId::new(0), EnemyId::new(0, 0), Vec3::ZERO, 1, 0.5, None);
        let second = set.launch(TowerId::new(0), EnemyId::new(1, 0), Vec3::ZERO, 1, 0.5, None);
        assert!(first < second);
        assert_eq!(set.take().len(), 2);
        assert_eq!(set.iter().count(), 0);
    }
}
