//! Authored wave catalog.

use arkadien_core::{EnemyKind, SpawnGroup, WaveDefinition};

/// The ten authored waves in play order.
#[must_use]
pub fn authored_waves() -> Vec<WaveDefinition> {
    use EnemyKind::{Daemon, Gefallene, Huellen, Schattenwesen, Untote, Verderbte};

    vec![
        WaveDefinition::new(vec![SpawnGroup::new(Schattenwesen, 5, 1000)]),
        WaveDefinition::new(vec![SpawnGroup::new(Schattenwesen, 8, 800)]),
        WaveDefinition::new(vec![
            SpawnGroup::new(Schattenwesen, 5, 1000),
            SpawnGroup::new(Daemon, 3, 1500),
        ]),
        WaveDefinition::new(vec![SpawnGroup::new(Verderbte, 6, 1000)]),
        WaveDefinition::new(vec![
            SpawnGroup::new(Schattenwesen, 10, 600),
            SpawnGroup::new(Daemon, 4, 1200),
        ]),
        WaveDefinition::new(vec![
            SpawnGroup::new(Gefallene, 5, 1000),
            SpawnGroup::new(Verderbte, 5, 1000),
        ]),
        WaveDefinition::new(vec![SpawnGroup::new(Huellen, 8, 800)]),
        WaveDefinition::new(vec![
            SpawnGroup::new(Daemon, 6, 1000),
            SpawnGroup::new(Gefallene, 6, 1000),
        ]),
        WaveDefinition::new(vec![SpawnGroup::new(Untote, 10, 700)]),
        // Final wave.
        WaveDefinition::new(vec![
            SpawnGroup::new(Schattenwesen, 10, 500),
            SpawnGroup::new(Daemon, 5, 800),
            SpawnGroup::new(Verderbte, 5, 800),
            SpawnGroup::new(Gefallene, 5, 800),
            SpawnGroup::new(Huellen, 5, 800),
            SpawnGroup::new(Untote, 5, 800),
        ]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_ten_waves_and_every_kind_appears() {
        let waves = authored_waves();
        assert_eq!(waves.len(), 10);
        for kind in EnemyKind::ALL {
            assert!(waves
                .iter()
                .flat_map(|wave| wave.groups())
                .any(|group| group.kind == kind));
        }
        assert_eq!(waves[9].enemy_count(), 35);
    }
}
