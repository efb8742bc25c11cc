//! Turns the player's contacts into gameplay.
//!
//! Reactions are edge-triggered: a body only counts on the frame it starts
//! touching the player, so standing on a roof scores once rather than every
//! frame.

use std::collections::HashSet;

use log::{debug, info, warn};
use rand::Rng;

use crate::{
    ids::StructureId,
    run_state::RunState,
    scene_host::{Handle, SceneHost},
    settings::{DamageSettings, Settings},
    structure::{PowerupKind, StructureRegistry},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Structure(StructureId),
    Ground,
    Powerup,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    StructureHit {
        id: StructureId,
        newly_triggered: bool,
        damage: u32,
        absorbed: bool,
    },
    GroundHit,
    PowerupCollected(PowerupKind),
}

#[derive(Debug)]
pub struct ContactResolver {
    ground: Handle,
    touching: HashSet<Handle>,
    settings: Settings,
}

impl ContactResolver {
    pub fn new(ground: Handle, settings: Settings) -> Self {
        Self {
            ground,
            touching: HashSet::new(),
            settings,
        }
    }

    pub fn classify(&self, handle: Handle, structures: &StructureRegistry) -> Role {
        if handle == self.ground {
            Role::Ground
        } else if let Some(id) = structures.structure_at(handle) {
            Role::Structure(id)
        } else if structures.powerup_at(handle).is_some() {
            Role::Powerup
        } else {
            Role::Other
        }
    }

    /// Applies the reactions for every contact that began since the last call.
    pub fn resolve(
        &mut self,
        contacts: &[(Handle, Handle)],
        structures: &mut StructureRegistry,
        run: &mut RunState,
        host: &mut impl SceneHost,
        rng: &mut impl Rng,
    ) -> Vec<Reaction> {
        let player = host.player();
        let mut touching = HashSet::with_capacity(contacts.len());
        let mut reactions = Vec::new();

        for &(a, b) in contacts {
            let other = if a == player { b } else { a };
            if !touching.insert(other) || self.touching.contains(&other) {
                continue;
            }

            let reaction = match self.classify(other, structures) {
                Role::Structure(id) => self.hit_structure(id, structures, run, host, rng),
                Role::Ground => {
                    info!("player hit the ground");
                    run.kill();
                    Some(Reaction::GroundHit)
                }
                Role::Powerup => self.hit_powerup(other, structures, run, host),
                Role::Other => None,
            };
            reactions.extend(reaction);
        }

        self.touching = touching;
        reactions
    }

    fn hit_structure(
        &self,
        id: StructureId,
        structures: &mut StructureRegistry,
        run: &mut RunState,
        host: &mut impl SceneHost,
        rng: &mut impl Rng,
    ) -> Option<Reaction> {
        let newly_triggered = match structures.trigger(id, host, rng, &self.settings.spawn) {
            Ok(newly_triggered) => newly_triggered,
            Err(err) => {
                warn!("ignoring contact: {err}");
                return None;
            }
        };
        let height = structures.get(id).ok()?.height();

        run.add_score(self.settings.damage.score_per_structure);

        let damage = fall_damage(run.last_safe_ground_height(), height, &self.settings.damage);
        let absorbed = damage > 0 && run.take_feather_fall();
        if damage > 0 && !absorbed {
            run.damage(damage);
        }
        debug!("hit structure {id}: fall damage {damage}, absorbed {absorbed}");

        Some(Reaction::StructureHit {
            id,
            newly_triggered,
            damage,
            absorbed,
        })
    }

    fn hit_powerup(
        &self,
        handle: Handle,
        structures: &mut StructureRegistry,
        run: &mut RunState,
        host: &mut impl SceneHost,
    ) -> Option<Reaction> {
        let kind = structures.collect_powerup(handle, host)?;
        let powerups = &self.settings.powerups;
        match kind {
            PowerupKind::PlatformCharge => run.add_platform_charges(powerups.platform_charges),
            PowerupKind::FeatherFall => run.add_feather_falls(powerups.feather_falls),
            PowerupKind::Heal => run.heal(powerups.heal_amount),
        }
        Some(Reaction::PowerupCollected(kind))
    }
}

/// Damage for dropping from `last_safe_height` onto a roof at `roof_height`.
pub fn fall_damage(last_safe_height: f32, roof_height: f32, damage: &DamageSettings) -> u32 {
    let fall = last_safe_height - roof_height;
    if fall <= damage.fall_threshold {
        return 0;
    }
    let tiers = (fall / damage.tier_height).floor().max(0.0) as u32;
    tiers.saturating_mul(damage.damage_per_tier)
}
