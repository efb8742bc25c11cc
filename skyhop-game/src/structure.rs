//! Skyscrapers and the procedural layout that grows around them.

use std::collections::{BTreeMap, HashMap};

use glam::{vec2, Vec2, Vec3};
use log::debug;
use rand::Rng;

use crate::{
    error::GameError,
    footprint::Footprint,
    ids::{IdAllocator, StructureId},
    scene_host::{attach_static_box, Handle, SceneHost},
    settings::SpawnSettings,
};

/// Host tag naming the kind of a powerup body.
pub const POWERUP_TAG: &str = "powerup";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerupKind {
    PlatformCharge,
    FeatherFall,
    Heal,
}

impl PowerupKind {
    pub const ALL: [Self; 3] = [Self::PlatformCharge, Self::FeatherFall, Self::Heal];

    pub fn name(self) -> &'static str {
        match self {
            Self::PlatformCharge => "PLATFORM_CHARGE",
            Self::FeatherFall => "FEATHER_FALL",
            Self::Heal => "HEAL",
        }
    }

    /// Uniform over "no powerup" and every kind.
    fn roll(rng: &mut impl Rng) -> Option<Self> {
        let roll = rng.gen_range(0..=Self::ALL.len());
        Self::ALL.get(roll).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Powerup {
    pub kind: PowerupKind,
    pub handle: Handle,
}

#[derive(Debug, Clone)]
pub struct Structure {
    id: StructureId,
    handle: Handle,
    position: Vec2,
    extent: Vec3,
    time_to_live: f32,
    triggered: bool,
    powerup: Option<Powerup>,
}

impl Structure {
    pub fn id(&self) -> StructureId {
        self.id
    }

    pub fn handle(&self) -> Handle {
        self.handle
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Width, depth and height.
    pub fn extent(&self) -> Vec3 {
        self.extent
    }

    pub fn height(&self) -> f32 {
        self.extent.z
    }

    pub fn footprint(&self) -> Footprint {
        Footprint::centered(self.position, self.extent.truncate())
    }

    pub fn time_to_live(&self) -> f32 {
        self.time_to_live
    }

    pub fn triggered(&self) -> bool {
        self.triggered
    }

    pub fn powerup(&self) -> Option<Powerup> {
        self.powerup
    }
}

/// Owns every live structure and the handle lookups used to classify contacts.
#[derive(Debug, Default)]
pub struct StructureRegistry {
    ids: IdAllocator,
    structures: BTreeMap<StructureId, Structure>,
    by_handle: HashMap<Handle, StructureId>,
    powerups: HashMap<Handle, (PowerupKind, StructureId)>,
}

impl StructureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Structure> {
        self.structures.values()
    }

    pub fn get(&self, id: StructureId) -> Result<&Structure, GameError> {
        self.structures
            .get(&id)
            .ok_or(GameError::StaleReference(id))
    }

    pub fn structure_at(&self, handle: Handle) -> Option<StructureId> {
        self.by_handle.get(&handle).copied()
    }

    pub fn powerup_at(&self, handle: Handle) -> Option<PowerupKind> {
        self.powerups.get(&handle).map(|&(kind, _)| kind)
    }

    /// The untriggered origin structure the player starts on.
    pub fn spawn_home(&mut self, host: &mut impl SceneHost, spawn: &SpawnSettings) -> StructureId {
        self.insert(host, spawn, spawn.home_position, spawn.home_extent, None)
    }

    /// Marks a structure as triggered, spawning its neighbours the first time.
    ///
    /// Returns whether this call did the triggering.
    pub fn trigger(
        &mut self,
        id: StructureId,
        host: &mut impl SceneHost,
        rng: &mut impl Rng,
        spawn: &SpawnSettings,
    ) -> Result<bool, GameError> {
        let structure = self
            .structures
            .get_mut(&id)
            .ok_or(GameError::StaleReference(id))?;
        if structure.triggered {
            return Ok(false);
        }
        structure.triggered = true;
        debug!("structure {id} triggered");

        self.spawn_neighbors(id, host, rng, spawn)?;
        Ok(true)
    }

    /// Tries a random number of candidates around `id`, keeping those that overlap nothing.
    ///
    /// Accepted candidates join the registry immediately, so later attempts in the same
    /// batch are checked against them too. Rejected attempts are simply skipped.
    pub fn spawn_neighbors(
        &mut self,
        id: StructureId,
        host: &mut impl SceneHost,
        rng: &mut impl Rng,
        spawn: &SpawnSettings,
    ) -> Result<Vec<StructureId>, GameError> {
        let source = self.get(id)?.footprint();
        let attempts = rng.gen_range(spawn.neighbor_attempts.clone());

        let mut spawned = Vec::new();
        for _ in 0..attempts {
            let gap = vec2(
                rng.gen_range(spawn.gap.clone()) as f32,
                rng.gen_range(spawn.gap.clone()) as f32,
            );
            let size = vec2(
                rng.gen_range(spawn.footprint_side.clone()) as f32,
                rng.gen_range(spawn.footprint_side.clone()) as f32,
            );
            let height = rng.gen_range(spawn.floors.clone()) as f32 * spawn.floor_height;
            let side = vec2(sign(rng.gen_bool(0.5)), sign(rng.gen_bool(0.5)));

            let offset = (source.size() + size) * 0.5 + gap;
            let candidate = Footprint::centered(source.center() + side * offset, size);
            if self.overlaps_any(&candidate) {
                debug!("neighbour of {id} at {} rejected", candidate.center());
                continue;
            }

            let powerup = PowerupKind::roll(rng);
            let extent = size.extend(height);
            spawned.push(self.insert(host, spawn, candidate.center(), extent, powerup));
        }

        debug!(
            "structure {id} spawned {} of {attempts} neighbours",
            spawned.len()
        );
        Ok(spawned)
    }

    pub fn overlaps_any(&self, footprint: &Footprint) -> bool {
        self.structures
            .values()
            .any(|other| other.footprint().overlaps(footprint))
    }

    /// Deletes a structure and detaches every body it owns.
    pub fn remove(
        &mut self,
        id: StructureId,
        host: &mut impl SceneHost,
    ) -> Result<Structure, GameError> {
        let structure = self
            .structures
            .remove(&id)
            .ok_or(GameError::StaleReference(id))?;

        self.by_handle.remove(&structure.handle);
        host.detach(structure.handle);
        if let Some(powerup) = structure.powerup {
            self.powerups.remove(&powerup.handle);
            host.detach(powerup.handle);
        }

        debug!("structure {id} removed");
        Ok(structure)
    }

    /// Takes the powerup body at `handle` out of the world.
    pub fn collect_powerup(
        &mut self,
        handle: Handle,
        host: &mut impl SceneHost,
    ) -> Option<PowerupKind> {
        let (kind, owner) = self.powerups.remove(&handle)?;
        if let Some(structure) = self.structures.get_mut(&owner) {
            structure.powerup = None;
        }
        host.detach(handle);

        debug!("collected {} from structure {owner}", kind.name());
        Some(kind)
    }

    /// Counts down every triggered structure and returns those that ran out.
    pub(crate) fn age(&mut self, amount: f32) -> Vec<StructureId> {
        self.structures
            .values_mut()
            .filter(|s| s.triggered)
            .filter_map(|s| {
                s.time_to_live -= amount;
                (s.time_to_live <= 0.0).then_some(s.id)
            })
            .collect()
    }

    /// Places a structure carrying a chosen powerup, bypassing the random roll.
    #[cfg(test)]
    pub(crate) fn spawn_with_powerup(
        &mut self,
        host: &mut impl SceneHost,
        spawn: &SpawnSettings,
        position: Vec2,
        kind: PowerupKind,
    ) -> StructureId {
        self.insert(host, spawn, position, spawn.home_extent, Some(kind))
    }

    fn insert(
        &mut self,
        host: &mut impl SceneHost,
        spawn: &SpawnSettings,
        position: Vec2,
        extent: Vec3,
        powerup_kind: Option<PowerupKind>,
    ) -> StructureId {
        let id = self.ids.allocate();
        let handle = attach_static_box(host, position.extend(extent.z * 0.5), extent);

        let powerup = powerup_kind.map(|kind| {
            let size = spawn.powerup_extent;
            let center = position.extend(extent.z + spawn.powerup_hover + size.z * 0.5);
            let handle = attach_static_box(host, center, size);
            host.set_tag(handle, POWERUP_TAG, kind.name());
            self.powerups.insert(handle, (kind, id));
            Powerup { kind, handle }
        });

        self.by_handle.insert(handle, id);
        self.structures.insert(
            id,
            Structure {
                id,
                handle,
                position,
                extent,
                time_to_live: spawn.structure_ttl,
                triggered: false,
                powerup,
            },
        );
        debug!("structure {id} at {position} with extent {extent}, powerup {powerup_kind:?}");
        id
    }
}

fn sign(positive: bool) -> f32 {
    if positive {
        1.0
    } else {
        -1.0
    }
}
