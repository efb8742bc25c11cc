//! A windowless scene host with just enough physics to play a run.
//!
//! Every body is static and axis-aligned. The player is a box that walks,
//! falls, lands on roofs and gets pushed back by walls.

use std::collections::{BTreeMap, HashMap};

use glam::{vec3, Vec3};
use log::trace;

use skyhop_game::{
    scene_host::{Handle, SceneHost, Shape},
    settings::Settings,
};

use crate::{bounding_box::BoundingBox, clock::Clock};

const MAX_DELTA_TIME: f32 = 0.03;
const CONTACT_SKIN: f32 = 0.05;
const PLAYER_EXTENT: Vec3 = vec3(1.5, 1.5, 2.0);

#[derive(Debug)]
enum Body {
    Box(BoundingBox),
    Plane(f32),
}

#[derive(Debug, Default)]
struct Character {
    position: Vec3,
    velocity: Vec3,
    walk_velocity: Vec3,
    heading: f32,
    on_ground: bool,
}

impl Character {
    fn bounds(&self) -> BoundingBox {
        BoundingBox::around(self.position, PLAYER_EXTENT)
    }
}

pub struct HeadlessHost<C: Clock> {
    clock: C,
    last_frame: C::Instant,
    gravity: f32,
    jump_speed: f32,
    next_handle: u64,
    bodies: BTreeMap<Handle, Body>,
    visuals: HashMap<Handle, String>,
    tags: HashMap<(Handle, String), String>,
    player: Handle,
    character: Character,
}

impl<C: Clock> HeadlessHost<C> {
    pub fn new(settings: &Settings, clock: C) -> Self {
        Self {
            last_frame: clock.now(),
            clock,
            gravity: settings.gravity,
            jump_speed: settings.jump_speed,
            next_handle: 1,
            bodies: BTreeMap::new(),
            visuals: HashMap::new(),
            tags: HashMap::new(),
            player: Handle(0),
            character: Character {
                position: settings.player_spawn,
                ..Default::default()
            },
        }
    }

    pub fn player_velocity(&self) -> Vec3 {
        self.character.velocity
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn boxes(&self) -> impl Iterator<Item = &BoundingBox> {
        self.bodies.values().filter_map(|body| match body {
            Body::Box(bounds) => Some(bounds),
            Body::Plane(_) => None,
        })
    }

    fn step(&mut self, delta_time: f32) {
        let c = &mut self.character;
        c.velocity.x = c.walk_velocity.x;
        c.velocity.y = c.walk_velocity.y;
        c.velocity.z -= self.gravity * delta_time;

        self.move_vertically(self.character.velocity.z * delta_time);
        let horizontal = self.character.velocity * delta_time;
        self.move_horizontally(vec3(horizontal.x, horizontal.y, 0.0));
    }

    fn move_vertically(&mut self, dz: f32) {
        let half_height = PLAYER_EXTENT.z * 0.5;
        let moved = self.character.bounds() + Vec3::Z * dz;

        let mut landed = None;
        let mut bumped = None;
        for body in self.bodies.values() {
            match body {
                Body::Box(bounds) if bounds.intersects(&moved) => {
                    if dz <= 0.0 {
                        landed = Some(landed.map_or(bounds.max.z, |z: f32| z.max(bounds.max.z)));
                    } else {
                        bumped = Some(bounds.min.z);
                    }
                }
                Body::Plane(height) if moved.min.z < *height => {
                    landed = Some(landed.map_or(*height, |z: f32| z.max(*height)));
                }
                _ => {}
            }
        }

        let c = &mut self.character;
        c.on_ground = false;
        if let Some(top) = landed {
            c.position.z = top + half_height;
            c.velocity.z = 0.0;
            c.on_ground = true;
        } else if let Some(bottom) = bumped {
            c.position.z = bottom - half_height;
            c.velocity.z = 0.0;
        } else {
            c.position.z += dz;
        }
    }

    /// Moves along x then y, stopping flush against the first box in the way.
    fn move_horizontally(&mut self, offset: Vec3) {
        for axis in 0..2 {
            let distance = offset[axis];
            if distance == 0.0 {
                continue;
            }

            let start = self.character.position[axis];
            let half = PLAYER_EXTENT[axis] * 0.5;
            let mut step = Vec3::ZERO;
            step[axis] = distance;
            let moved = self.character.bounds() + step;

            let mut target = start + distance;
            for bounds in self.boxes().filter(|bounds| bounds.intersects(&moved)) {
                target = if distance > 0.0 {
                    target.min(bounds.min[axis] - half).max(start)
                } else {
                    target.max(bounds.max[axis] + half).min(start)
                };
            }
            if target != start + distance {
                trace!("player blocked at {}", self.character.position);
            }
            self.character.position[axis] = target;
        }
    }
}

impl<C: Clock> SceneHost for HeadlessHost<C> {
    fn attach_body(&mut self, shape: Shape, position: Vec3, extent: Vec3, _mass: f32) -> Handle {
        let handle = Handle(self.next_handle);
        self.next_handle += 1;
        let body = match shape {
            Shape::Box => Body::Box(BoundingBox::around(position, extent)),
            Shape::Plane => Body::Plane(position.z),
        };
        self.bodies.insert(handle, body);
        handle
    }

    fn detach(&mut self, handle: Handle) {
        self.bodies.remove(&handle);
        self.visuals.remove(&handle);
        self.tags.retain(|(h, _), _| *h != handle);
    }

    fn attach_visual(&mut self, handle: Handle, model: &str, _scale: Vec3, _offset: Vec3) {
        self.visuals.insert(handle, model.to_owned());
    }

    fn set_tag(&mut self, handle: Handle, key: &str, value: &str) {
        self.tags.insert((handle, key.to_owned()), value.to_owned());
    }

    fn tag(&self, handle: Handle, key: &str) -> Option<String> {
        self.tags.get(&(handle, key.to_owned())).cloned()
    }

    fn tick(&mut self) -> f32 {
        let now = self.clock.now();
        let delta_time = self.clock.seconds_elapsed(self.last_frame, now);
        self.last_frame = now;
        delta_time
    }

    fn step_physics(&mut self, delta_time: f32) {
        let mut remaining = delta_time;
        while remaining > 0.0 {
            let step = remaining.min(MAX_DELTA_TIME);
            self.step(step);
            remaining -= step;
        }
    }

    fn query_contacts(&self, body: Handle) -> Vec<(Handle, Handle)> {
        if body != self.player {
            return Vec::new();
        }
        let reach = self.character.bounds().grow(CONTACT_SKIN);
        self.bodies
            .iter()
            .filter(|(_, other)| match other {
                Body::Box(bounds) => bounds.intersects(&reach),
                Body::Plane(height) => reach.min.z <= *height,
            })
            .map(|(&handle, _)| (self.player, handle))
            .collect()
    }

    fn player(&self) -> Handle {
        self.player
    }

    fn player_position(&self) -> Vec3 {
        self.character.position
    }

    fn player_heading(&self) -> f32 {
        self.character.heading
    }

    fn player_on_ground(&self) -> bool {
        self.character.on_ground
    }

    fn set_player_movement(&mut self, velocity: Vec3) {
        self.character.walk_velocity = velocity;
    }

    fn player_jump(&mut self) {
        if self.character.on_ground {
            self.character.velocity.z = self.jump_speed;
            self.character.on_ground = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedStep;

    fn host() -> HeadlessHost<FixedStep> {
        let settings = Settings {
            player_spawn: vec3(0.0, 0.0, 12.0),
            ..Default::default()
        };
        HeadlessHost::new(&settings, FixedStep::new(0.02))
    }

    fn settle(host: &mut HeadlessHost<FixedStep>) {
        for _ in 0..200 {
            let dt = host.tick();
            host.step_physics(dt);
        }
    }

    #[test]
    fn lands_on_a_roof_and_reports_contact() {
        let mut host = host();
        let ground = host.attach_body(Shape::Plane, Vec3::ZERO, Vec3::ZERO, 0.0);
        let roof = host.attach_body(Shape::Box, vec3(0.0, 0.0, 5.0), vec3(8.0, 8.0, 10.0), 0.0);

        settle(&mut host);

        assert!(host.player_on_ground());
        assert!((host.player_position().z - 11.0).abs() < 1e-4);
        let contacts = host.query_contacts(host.player());
        assert_eq!(contacts, vec![(host.player(), roof)]);
        assert!(!contacts.iter().any(|&(_, other)| other == ground));
    }

    #[test]
    fn falls_to_the_ground_plane() {
        let mut host = host();
        let ground = host.attach_body(Shape::Plane, Vec3::ZERO, Vec3::ZERO, 0.0);

        settle(&mut host);

        assert!(host.player_on_ground());
        assert_eq!(host.query_contacts(host.player()), vec![(host.player(), ground)]);
    }

    #[test]
    fn walls_block_walking() {
        let mut host = host();
        host.attach_body(Shape::Plane, Vec3::ZERO, Vec3::ZERO, 0.0);
        host.attach_body(Shape::Box, vec3(0.0, 5.0, 5.0), vec3(10.0, 2.0, 10.0), 0.0);
        settle(&mut host);

        host.set_player_movement(vec3(0.0, 10.0, 0.0));
        settle(&mut host);

        assert!(host.player_position().y < 4.0);
        assert!((host.player_position().y - 3.25).abs() < 1e-4);
    }

    #[test]
    fn walking_into_a_small_box_touches_it() {
        let mut host = host();
        host.attach_body(Shape::Plane, Vec3::ZERO, Vec3::ZERO, 0.0);
        let crate_ = host.attach_body(Shape::Box, vec3(0.0, 6.0, 0.5), Vec3::ONE, 0.0);
        settle(&mut host);

        host.set_player_movement(vec3(0.0, 20.0, 0.0));
        for _ in 0..120 {
            let dt = host.tick();
            host.step_physics(dt);
        }

        assert!((host.player_position().y - 4.75).abs() < 1e-4);
        assert!(host
            .query_contacts(host.player())
            .contains(&(host.player(), crate_)));
    }

    #[test]
    fn blocked_axis_does_not_stop_the_other() {
        let mut host = host();
        host.attach_body(Shape::Plane, Vec3::ZERO, Vec3::ZERO, 0.0);
        host.attach_body(Shape::Box, vec3(0.0, 5.0, 5.0), vec3(100.0, 2.0, 10.0), 0.0);
        settle(&mut host);

        host.set_player_movement(vec3(5.0, 5.0, 0.0));
        settle(&mut host);

        assert!((host.player_position().y - 3.25).abs() < 1e-4);
        assert!(host.player_position().x > 10.0);
    }

    #[test]
    fn jumping_needs_the_ground() {
        let mut host = host();
        host.player_jump();
        assert_eq!(host.player_velocity().z, 0.0);

        host.attach_body(Shape::Plane, Vec3::ZERO, Vec3::ZERO, 0.0);
        settle(&mut host);
        host.player_jump();
        assert_eq!(host.player_velocity().z, 10.0);
        assert!(!host.player_on_ground());
    }

    #[test]
    fn jump_impulse_comes_from_the_settings_file() {
        let settings: Settings = toml::from_str("jump_speed = 12.5\ngravity = 9.81\n").unwrap();
        let mut host = HeadlessHost::new(&settings, FixedStep::new(0.02));
        host.attach_body(Shape::Plane, Vec3::ZERO, Vec3::ZERO, 0.0);
        settle(&mut host);

        host.player_jump();
        assert_eq!(host.player_velocity().z, 12.5);

        // Apex follows from speed and gravity alone: v^2 / 2g above the ground.
        let mut apex = host.player_position().z;
        for _ in 0..200 {
            let dt = host.tick();
            host.step_physics(dt);
            apex = apex.max(host.player_position().z);
        }
        let expected = 1.0 + 12.5 * 12.5 / (2.0 * 9.81);
        assert!((apex - expected).abs() < 0.2, "apex {apex}, expected {expected}");
    }

    #[test]
    fn detaching_forgets_the_body() {
        let mut host = host();
        let handle = host.attach_body(Shape::Box, Vec3::ZERO, Vec3::ONE, 0.0);
        host.attach_visual(handle, "box", Vec3::ONE, Vec3::ZERO);
        host.set_tag(handle, "powerup", "HEAL");
        assert_eq!(host.tag(handle, "powerup").as_deref(), Some("HEAL"));

        host.detach(handle);
        assert_eq!(host.body_count(), 0);
        assert_eq!(host.tag(handle, "powerup"), None);
    }
}
