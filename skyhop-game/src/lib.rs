use std::fmt;

use glam::Vec3;
use log::info;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    contact::{ContactResolver, Reaction},
    error::GameError,
    ids::StructureId,
    lifecycle::{Evictions, LifecycleClock},
    platform::TransientRegistry,
    player::{walk_velocity, FrameInput, JumpLatch, JumpOutcome},
    run_state::RunState,
    scene_host::{Handle, SceneHost, Shape},
    settings::Settings,
    structure::StructureRegistry,
};

pub mod contact;
pub mod error;
pub mod footprint;
pub mod ids;
pub mod lifecycle;
pub mod platform;
pub mod player;
pub mod run_state;
pub mod scene_host;
pub mod settings;
pub mod structure;

/// One play session: the world layout, the player's run and the frame loop driving them.
pub struct Game<R: Rng = StdRng> {
    settings: Settings,
    run: RunState,
    structures: StructureRegistry,
    platforms: TransientRegistry,
    clock: LifecycleClock,
    contacts: ContactResolver,
    jump_latch: JumpLatch,
    ground: Handle,
    home: StructureId,
    rng: R,
}

/// What happened during one call to [`Game::update`].
#[derive(Debug)]
pub struct FrameReport {
    pub delta_time: f32,
    pub jump: JumpOutcome,
    pub evictions: Evictions,
    pub reactions: Vec<Reaction>,
}

impl Game<StdRng> {
    pub fn new(settings: Settings, host: &mut impl SceneHost) -> Result<Self, GameError> {
        let rng = match settings.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(settings, host, rng)
    }
}

impl<R: Rng> Game<R> {
    /// Validates `settings` before touching the host, then lays out the ground and home structure.
    pub fn with_rng(
        settings: Settings,
        host: &mut impl SceneHost,
        rng: R,
    ) -> Result<Self, GameError> {
        settings.validate()?;
        let clock = LifecycleClock::new(settings.ttl_decay_rate)?;

        let ground = host.attach_body(Shape::Plane, Vec3::ZERO, Vec3::ZERO, 0.0);
        let mut structures = StructureRegistry::new();
        let home = structures.spawn_home(host, &settings.spawn);
        info!("run started on structure {home}");

        Ok(Self {
            run: RunState::new(&settings),
            contacts: ContactResolver::new(ground, settings.clone()),
            settings,
            structures,
            platforms: TransientRegistry::new(),
            clock,
            jump_latch: JumpLatch::default(),
            ground,
            home,
            rng,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn run(&self) -> &RunState {
        &self.run
    }

    pub fn structures(&self) -> &StructureRegistry {
        &self.structures
    }

    pub fn platforms(&self) -> &TransientRegistry {
        &self.platforms
    }

    pub fn ground(&self) -> Handle {
        self.ground
    }

    pub fn home(&self) -> StructureId {
        self.home
    }

    pub fn is_over(&self) -> bool {
        self.run.is_over()
    }

    pub fn hud(&self, host: &impl SceneHost) -> Hud {
        Hud {
            score: self.run.score(),
            position: host.player_position(),
            platform_charges: self.run.platform_charges(),
            feather_falls: self.run.feather_falls(),
            hit_points: self.run.hit_points(),
        }
    }

    /// Advances the session by one frame.
    pub fn update(&mut self, host: &mut impl SceneHost, input: &FrameInput) -> FrameReport {
        let delta_time = host.tick();
        let was_over = self.run.is_over();

        let velocity = walk_velocity(
            input,
            host.player_heading(),
            self.run.forward_drift_force(),
            &self.settings,
        );
        host.set_player_movement(velocity);
        let jump = self.jump(host, input.jump);

        let evictions = self.clock.tick(
            delta_time,
            &mut self.structures,
            &mut self.platforms,
            host,
        );
        self.run.grow_drift(self.settings.drift_growth_rate);

        host.step_physics(delta_time);
        let contacts = host.query_contacts(host.player());
        let reactions = self.contacts.resolve(
            &contacts,
            &mut self.structures,
            &mut self.run,
            host,
            &mut self.rng,
        );

        if host.player_on_ground() {
            self.run.record_ground_height(host.player_position().z);
        }

        if !was_over && self.run.is_over() {
            info!("run over with score {}", self.run.score());
        }

        FrameReport {
            delta_time,
            jump,
            evictions,
            reactions,
        }
    }

    fn jump(&mut self, host: &mut impl SceneHost, jump_down: bool) -> JumpOutcome {
        if !self.jump_latch.press(jump_down) {
            return JumpOutcome::None;
        }

        if host.player_on_ground() {
            host.player_jump();
            JumpOutcome::Jumped
        } else if self.run.take_platform_charge() {
            let spawn = &self.settings.spawn;
            let position = host.player_position() + Vec3::Z * spawn.platform_drop;
            self.platforms
                .spawn_platform(host, position, spawn.platform_extent, spawn.platform_ttl);
            JumpOutcome::PlatformSpawned
        } else {
            JumpOutcome::Refused
        }
    }
}

/// The numbers shown on screen during a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hud {
    pub score: u32,
    pub position: Vec3,
    pub platform_charges: u32,
    pub feather_falls: u32,
    pub hit_points: u32,
}

impl fmt::Display for Hud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.position.round();
        writeln!(f, "SCORE: {}", self.score)?;
        writeln!(f, "COORDS: {} {} {}", p.x, p.y, p.z)?;
        writeln!(f, "PLATFORMS: {}", self.platform_charges)?;
        writeln!(f, "FEATHER FALLS: {}", self.feather_falls)?;
        write!(f, "HP: {}", self.hit_points)
    }
}
