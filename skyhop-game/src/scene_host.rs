//! The engine the game runs inside of.
//!
//! Physics, rendering and input all live behind [`SceneHost`]. The game only
//! creates and releases bodies, reads contacts and drives the player's
//! character controller through it. World space is Z-up.

use glam::Vec3;

/// Opaque reference to a physics body owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Handle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Axis-aligned box spanning the full extent passed to `attach_body`.
    Box,
    /// Infinite horizontal plane at the body's height. The extent is ignored.
    Plane,
}

pub const BOX_MODEL: &str = "box";

pub trait SceneHost {
    fn attach_body(&mut self, shape: Shape, position: Vec3, extent: Vec3, mass: f32) -> Handle;

    /// Releases both the physics body and any visual attached to it.
    fn detach(&mut self, handle: Handle);

    fn attach_visual(&mut self, handle: Handle, model: &str, scale: Vec3, offset: Vec3);

    fn set_tag(&mut self, handle: Handle, key: &str, value: &str);

    fn tag(&self, handle: Handle, key: &str) -> Option<String>;

    /// Seconds since the previous frame.
    fn tick(&mut self) -> f32;

    fn step_physics(&mut self, delta_time: f32);

    /// Every pair of bodies currently touching `body`.
    fn query_contacts(&self, body: Handle) -> Vec<(Handle, Handle)>;

    fn player(&self) -> Handle;

    fn player_position(&self) -> Vec3;

    /// Rotation of the player about the up axis, in radians.
    fn player_heading(&self) -> f32;

    fn player_on_ground(&self) -> bool;

    fn set_player_movement(&mut self, velocity: Vec3);

    fn player_jump(&mut self);
}

/// Attaches a static box with a box visual scaled to fit it.
pub(crate) fn attach_static_box(host: &mut impl SceneHost, center: Vec3, extent: Vec3) -> Handle {
    let handle = host.attach_body(Shape::Box, center, extent, 0.0);
    host.attach_visual(handle, BOX_MODEL, extent, -extent * 0.5);
    handle
}
