//! Short-lived floors the player drops beneath themselves mid-air.

use glam::Vec3;
use log::debug;

use crate::scene_host::{attach_static_box, Handle, SceneHost};

#[derive(Debug, Clone, PartialEq)]
pub struct Platform {
    pub handle: Handle,
    pub position: Vec3,
    pub extent: Vec3,
    pub time_to_live: f32,
}

#[derive(Debug, Default)]
pub struct TransientRegistry {
    platforms: Vec<Platform>,
}

impl TransientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Platform> {
        self.platforms.iter()
    }

    pub fn spawn_platform(
        &mut self,
        host: &mut impl SceneHost,
        position: Vec3,
        extent: Vec3,
        time_to_live: f32,
    ) -> &Platform {
        let handle = attach_static_box(host, position, extent);
        debug!("platform {handle:?} at {position}");

        self.platforms.push(Platform {
            handle,
            position,
            extent,
            time_to_live,
        });
        &self.platforms[self.platforms.len() - 1]
    }

    pub(crate) fn age(&mut self, amount: f32) {
        for platform in &mut self.platforms {
            platform.time_to_live -= amount;
        }
    }

    /// Detaches and drops every platform whose time has run out, in spawn order.
    pub fn remove_expired(&mut self, host: &mut impl SceneHost) -> usize {
        let before = self.platforms.len();
        self.platforms.retain(|platform| {
            let alive = platform.time_to_live > 0.0;
            if !alive {
                host.detach(platform.handle);
                debug!("platform {:?} expired", platform.handle);
            }
            alive
        });
        before - self.platforms.len()
    }
}
