use crate::settings::Settings;

pub const MAX_HIT_POINTS: u32 = 100;

/// Score and resources of a single run.
///
/// Read access is public; only the game itself mutates a run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunState {
    score: u32,
    hit_points: u32,
    forward_drift_force: f32,
    platform_charges: u32,
    feather_falls: u32,
    last_safe_ground_height: f32,
}

impl RunState {
    pub fn new(settings: &Settings) -> Self {
        Self {
            score: 0,
            hit_points: settings.starting_hit_points.min(MAX_HIT_POINTS),
            forward_drift_force: 0.0,
            platform_charges: settings.starting_platform_charges,
            feather_falls: settings.starting_feather_falls,
            last_safe_ground_height: 0.0,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn hit_points(&self) -> u32 {
        self.hit_points
    }

    pub fn forward_drift_force(&self) -> f32 {
        self.forward_drift_force
    }

    pub fn platform_charges(&self) -> u32 {
        self.platform_charges
    }

    pub fn feather_falls(&self) -> u32 {
        self.feather_falls
    }

    pub fn last_safe_ground_height(&self) -> f32 {
        self.last_safe_ground_height
    }

    pub fn is_over(&self) -> bool {
        self.hit_points == 0
    }

    pub(crate) fn add_score(&mut self, amount: u32) {
        self.score = self.score.saturating_add(amount);
    }

    pub(crate) fn damage(&mut self, amount: u32) {
        self.hit_points = self.hit_points.saturating_sub(amount);
    }

    pub(crate) fn heal(&mut self, amount: u32) {
        self.hit_points = self.hit_points.saturating_add(amount).min(MAX_HIT_POINTS);
    }

    pub(crate) fn kill(&mut self) {
        self.hit_points = 0;
    }

    pub(crate) fn grow_drift(&mut self, rate: f32) {
        self.forward_drift_force += rate;
    }

    pub(crate) fn add_platform_charges(&mut self, amount: u32) {
        self.platform_charges = self.platform_charges.saturating_add(amount);
    }

    /// Returns false and changes nothing when no charge is left.
    pub(crate) fn take_platform_charge(&mut self) -> bool {
        take_one(&mut self.platform_charges)
    }

    pub(crate) fn add_feather_falls(&mut self, amount: u32) {
        self.feather_falls = self.feather_falls.saturating_add(amount);
    }

    pub(crate) fn take_feather_fall(&mut self) -> bool {
        take_one(&mut self.feather_falls)
    }

    pub(crate) fn record_ground_height(&mut self, height: f32) {
        self.last_safe_ground_height = height;
    }
}

fn take_one(count: &mut u32) -> bool {
    match count.checked_sub(1) {
        Some(rest) => {
            *count = rest;
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_from_settings() {
        let run = RunState::new(&Settings::default());
        assert_eq!(run.hit_points(), 100);
        assert_eq!(run.platform_charges(), 10);
        assert_eq!(run.feather_falls(), 2);
        assert_eq!(run.score(), 0);
        assert!(!run.is_over());
    }

    #[test]
    fn hit_points_stay_within_bounds() {
        let mut run = RunState::new(&Settings::default());
        run.damage(30);
        run.heal(50);
        assert_eq!(run.hit_points(), MAX_HIT_POINTS);
        run.damage(250);
        assert_eq!(run.hit_points(), 0);
        assert!(run.is_over());
    }

    #[test]
    fn huge_heals_cap_at_full_health() {
        let mut run = RunState::new(&Settings::default());
        run.damage(10);
        run.heal(u32::MAX);
        assert_eq!(run.hit_points(), MAX_HIT_POINTS);
    }

    #[test]
    fn charges_never_go_negative() {
        let mut run = RunState::new(&Settings {
            starting_feather_falls: 1,
            ..Default::default()
        });
        assert!(run.take_feather_fall());
        assert!(!run.take_feather_fall());
        assert_eq!(run.feather_falls(), 0);
    }
}
