use log::debug;

use crate::{
    error::GameError,
    ids::StructureId,
    platform::TransientRegistry,
    scene_host::SceneHost,
    structure::StructureRegistry,
};

/// Counts entities down and evicts them once their time is up.
#[derive(Debug, Clone, Copy)]
pub struct LifecycleClock {
    decay_rate: f32,
}

#[derive(Debug, Default, PartialEq)]
pub struct Evictions {
    pub structures: Vec<StructureId>,
    pub platforms: usize,
}

impl LifecycleClock {
    pub fn new(decay_rate: f32) -> Result<Self, GameError> {
        if decay_rate > 0.0 {
            Ok(Self { decay_rate })
        } else {
            Err(GameError::InvalidConfiguration(
                "ttl decay rate must be positive",
            ))
        }
    }

    /// Untriggered structures keep their time; triggered ones and all platforms lose
    /// `decay_rate * delta_time`.
    pub fn tick(
        &self,
        delta_time: f32,
        structures: &mut StructureRegistry,
        platforms: &mut TransientRegistry,
        host: &mut impl SceneHost,
    ) -> Evictions {
        let decay = self.decay_rate * delta_time;

        let expired = structures.age(decay);
        for &id in &expired {
            // Ids come straight from the registry, so removal cannot miss.
            if let Err(err) = structures.remove(id, host) {
                debug!("eviction skipped: {err}");
            }
        }

        platforms.age(decay);
        let platforms = platforms.remove_expired(host);

        Evictions {
            structures: expired,
            platforms,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::vec3;
    use rand::rngs::mock::StepRng;

    use super::*;
    use crate::{scene_host::testing::RecordingHost, settings::SpawnSettings};

    #[test]
    fn rejects_non_positive_rate() {
        assert!(LifecycleClock::new(0.0).is_err());
        assert!(LifecycleClock::new(-1.0).is_err());
    }

    #[test]
    fn untriggered_structures_never_decay() {
        let mut host = RecordingHost::new();
        let mut structures = StructureRegistry::new();
        let mut platforms = TransientRegistry::new();
        let home = structures.spawn_home(&mut host, &SpawnSettings::default());
        let clock = LifecycleClock::new(1.0).unwrap();

        for _ in 0..1000 {
            clock.tick(0.5, &mut structures, &mut platforms, &mut host);
        }
        assert_eq!(structures.get(home).unwrap().time_to_live(), 5.0);
    }

    #[test]
    fn triggered_structure_is_evicted_exactly_once() {
        let mut host = RecordingHost::new();
        let spawn = SpawnSettings::default();
        let mut structures = StructureRegistry::new();
        let mut platforms = TransientRegistry::new();
        let home = structures.spawn_home(&mut host, &spawn);
        let mut rng = StepRng::new(0, 0);
        structures.trigger(home, &mut host, &mut rng, &spawn).unwrap();
        let home_handle = structures.get(home).unwrap().handle();

        let clock = LifecycleClock::new(2.0).unwrap();
        // 5 - 2 * 0.5 * n reaches zero on the fifth tick.
        for tick in 1..=4 {
            let evictions = clock.tick(0.5, &mut structures, &mut platforms, &mut host);
            assert!(evictions.structures.is_empty(), "tick {tick}");
            let remaining = structures.get(home).unwrap().time_to_live();
            assert!((remaining - (5.0 - tick as f32)).abs() < 1e-5);
        }

        let evictions = clock.tick(0.5, &mut structures, &mut platforms, &mut host);
        assert_eq!(evictions.structures, vec![home]);
        assert!(structures.get(home).is_err());

        clock.tick(0.5, &mut structures, &mut platforms, &mut host);
        let detached = host.detached.iter().filter(|&&h| h == home_handle).count();
        assert_eq!(detached, 1);
    }

    #[test]
    fn platforms_decay_without_a_trigger() {
        let mut host = RecordingHost::new();
        let mut structures = StructureRegistry::new();
        let mut platforms = TransientRegistry::new();
        let clock = LifecycleClock::new(1.0).unwrap();
        let ttl = 1.0;
        platforms.spawn_platform(&mut host, vec3(0.0, 0.0, 10.0), vec3(10.0, 10.0, 0.5), ttl);

        let mut elapsed = 0.0;
        while platforms.len() == 1 {
            let evictions = clock.tick(0.25, &mut structures, &mut platforms, &mut host);
            elapsed += 0.25;
            if evictions.platforms == 1 {
                assert!((elapsed - ttl).abs() < 1e-5);
            }
        }
        assert_eq!(host.detached.len(), 1);
    }
}
