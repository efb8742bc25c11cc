use std::ops::RangeInclusive;

use glam::{vec2, vec3, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Tuning for one run. Immutable once a [`Game`](crate::Game) has been built from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub speed: f32,
    pub sprint_multiplier: f32,
    pub gravity: f32,
    pub jump_speed: f32,
    /// Added to the drift force once per frame.
    pub drift_growth_rate: f32,
    /// Time-to-live lost per second by decaying entities.
    pub ttl_decay_rate: f32,
    pub player_spawn: Vec3,
    pub starting_hit_points: u32,
    pub starting_platform_charges: u32,
    pub starting_feather_falls: u32,
    pub rng_seed: Option<u64>,
    pub spawn: SpawnSettings,
    pub damage: DamageSettings,
    pub powerups: PowerupSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnSettings {
    pub home_position: Vec2,
    pub home_extent: Vec3,
    pub structure_ttl: f32,
    pub neighbor_attempts: RangeInclusive<u32>,
    pub gap: RangeInclusive<u32>,
    pub footprint_side: RangeInclusive<u32>,
    /// Heights are drawn as a number of floors times `floor_height`.
    pub floors: RangeInclusive<u32>,
    pub floor_height: f32,
    pub platform_extent: Vec3,
    pub platform_ttl: f32,
    /// Vertical offset of a new platform relative to the player.
    pub platform_drop: f32,
    pub powerup_extent: Vec3,
    /// Gap between a roof and the underside of its powerup.
    pub powerup_hover: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageSettings {
    pub score_per_structure: u32,
    pub fall_threshold: f32,
    pub tier_height: f32,
    pub damage_per_tier: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerupSettings {
    pub platform_charges: u32,
    pub feather_falls: u32,
    pub heal_amount: u32,
}

impl Settings {
    pub fn sprint_speed(&self) -> f32 {
        self.speed * self.sprint_multiplier
    }

    pub fn validate(&self) -> Result<(), GameError> {
        check(self.ttl_decay_rate > 0.0, "ttl decay rate must be positive")?;
        check(self.speed > 0.0, "speed must be positive")?;
        check(self.sprint_multiplier >= 1.0, "sprint multiplier must be at least 1")?;
        check(self.gravity > 0.0, "gravity must be positive")?;
        check(self.jump_speed >= 0.0, "jump speed must not be negative")?;
        check(self.drift_growth_rate >= 0.0, "drift growth rate must not be negative")?;
        check(
            (1..=100).contains(&self.starting_hit_points),
            "starting hit points must be within 1..=100",
        )?;
        self.spawn.validate()?;
        check(self.damage.tier_height > 0.0, "fall tier height must be positive")?;
        check(self.damage.fall_threshold >= 0.0, "fall threshold must not be negative")
    }
}

impl SpawnSettings {
    fn validate(&self) -> Result<(), GameError> {
        check(positive(self.home_extent), "home extent must be positive")?;
        check(positive(self.platform_extent), "platform extent must be positive")?;
        check(positive(self.powerup_extent), "powerup extent must be positive")?;
        check(self.structure_ttl > 0.0, "structure ttl must be positive")?;
        check(self.platform_ttl > 0.0, "platform ttl must be positive")?;
        check(self.floor_height > 0.0, "floor height must be positive")?;
        check(
            !self.neighbor_attempts.is_empty() && *self.neighbor_attempts.start() >= 1,
            "neighbor attempts must be a non-empty range starting at 1 or more",
        )?;
        check(!self.gap.is_empty(), "gap range is empty")?;
        check(
            !self.footprint_side.is_empty() && *self.footprint_side.start() > 0,
            "footprint sides must be a non-empty positive range",
        )?;
        check(
            !self.floors.is_empty() && *self.floors.start() > 0,
            "floor counts must be a non-empty positive range",
        )
    }
}

fn positive(extent: Vec3) -> bool {
    extent.cmpgt(Vec3::ZERO).all()
}

fn check(ok: bool, reason: &'static str) -> Result<(), GameError> {
    if ok {
        Ok(())
    } else {
        Err(GameError::InvalidConfiguration(reason))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            speed: 20.0,
            sprint_multiplier: 2.0,
            gravity: 2.0 * 9.81,
            jump_speed: 10.0,
            drift_growth_rate: 0.0,
            ttl_decay_rate: 1.0,
            player_spawn: vec3(0.0, 0.0, 35.0),
            starting_hit_points: 100,
            starting_platform_charges: 10,
            starting_feather_falls: 2,
            rng_seed: None,
            spawn: SpawnSettings::default(),
            damage: DamageSettings::default(),
            powerups: PowerupSettings::default(),
        }
    }
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Self {
            home_position: vec2(0.0, 0.0),
            home_extent: vec3(20.0, 20.0, 30.0),
            structure_ttl: 5.0,
            neighbor_attempts: 3..=7,
            gap: 5..=10,
            footprint_side: 5..=12,
            floors: 1..=4,
            floor_height: 10.0,
            platform_extent: vec3(10.0, 10.0, 0.5),
            platform_ttl: 3.0,
            platform_drop: -1.0,
            powerup_extent: Vec3::ONE,
            powerup_hover: 0.5,
        }
    }
}

impl Default for DamageSettings {
    fn default() -> Self {
        Self {
            score_per_structure: 10,
            fall_threshold: 0.0,
            tier_height: 10.0,
            damage_per_tier: 20,
        }
    }
}

impl Default for PowerupSettings {
    fn default() -> Self {
        Self {
            platform_charges: 5,
            feather_falls: 1,
            heal_amount: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_decay_rate() {
        let settings = Settings {
            ttl_decay_rate: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(GameError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn rejects_negative_extent() {
        let mut settings = Settings::default();
        settings.spawn.platform_extent = vec3(10.0, -1.0, 0.5);
        assert!(settings.validate().is_err());
    }

    #[test]
    #[allow(clippy::reversed_empty_ranges)]
    fn rejects_empty_ranges() {
        let mut settings = Settings::default();
        settings.spawn.gap = 10..=5;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.spawn.neighbor_attempts = 0..=3;
        assert!(settings.validate().is_err());
    }
}
