use glam::{vec3, Quat, Vec3};

use crate::settings::Settings;

/// Buttons held during one frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub sprint: bool,
}

impl FrameInput {
    /// Direction in the player's own frame, +Y being forward.
    pub fn local_direction(&self) -> Vec3 {
        let mut direction = Vec3::ZERO;
        if self.forward {
            direction.y += 1.0;
        }
        if self.backward {
            direction.y -= 1.0;
        }
        if self.left {
            direction.x -= 1.0;
        }
        if self.right {
            direction.x += 1.0;
        }
        direction
    }
}

/// Horizontal velocity the player asks for this frame.
///
/// The drift force is added to the forward axis before normalizing, so even
/// with no keys held the player keeps sliding forward once drift is non-zero.
pub fn walk_velocity(input: &FrameInput, heading: f32, drift: f32, settings: &Settings) -> Vec3 {
    let mut local = input.local_direction();
    local.y += drift;
    let local = local.normalize_or_zero();

    let world = Quat::from_rotation_z(heading) * local;
    let world = vec3(world.x, world.y, 0.0).normalize_or_zero();

    let speed = if input.sprint {
        settings.sprint_speed()
    } else {
        settings.speed
    };
    world * speed
}

/// Turns a held jump key into single presses.
#[derive(Debug, Default, Clone, Copy)]
pub struct JumpLatch {
    was_down: bool,
}

impl JumpLatch {
    pub fn press(&mut self, down: bool) -> bool {
        let pressed = down && !self.was_down;
        self.was_down = down;
        pressed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpOutcome {
    None,
    Jumped,
    PlatformSpawned,
    /// Airborne with no platform charges left.
    Refused,
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    fn assert_close(a: Vec3, b: Vec3) {
        assert!(a.abs_diff_eq(b, 1e-5), "{a} != {b}");
    }

    #[test]
    fn idle_without_drift() {
        let settings = Settings::default();
        let velocity = walk_velocity(&FrameInput::default(), 0.0, 0.0, &settings);
        assert_eq!(velocity, Vec3::ZERO);
    }

    #[test]
    fn drift_pushes_forward_in_the_facing_direction() {
        let settings = Settings::default();
        let velocity = walk_velocity(&FrameInput::default(), FRAC_PI_2, 0.3, &settings);
        assert_close(velocity, vec3(-20.0, 0.0, 0.0));
    }

    #[test]
    fn drift_bends_strafing() {
        let settings = Settings::default();
        let input = FrameInput {
            right: true,
            ..Default::default()
        };
        let velocity = walk_velocity(&input, 0.0, 1.0, &settings);
        let expected = vec3(1.0, 1.0, 0.0).normalize() * 20.0;
        assert_close(velocity, expected);
    }

    #[test]
    fn sprint_multiplies_speed() {
        let settings = Settings::default();
        let input = FrameInput {
            forward: true,
            sprint: true,
            ..Default::default()
        };
        assert_close(walk_velocity(&input, 0.0, 0.0, &settings), vec3(0.0, 40.0, 0.0));
    }

    #[test]
    fn holding_jump_presses_once() {
        let mut latch = JumpLatch::default();
        assert!(latch.press(true));
        assert!(!latch.press(true));
        assert!(!latch.press(false));
        assert!(latch.press(true));
    }
}
