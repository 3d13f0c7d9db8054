//! Volume control
//!
//! Linear 0.0-1.0 level as handed to the media element, with a mute flag that
//! preserves the level.

use encore_core::DEFAULT_VOLUME;

/// Volume controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume {
    /// Volume level (0.0-1.0)
    level: f32,

    /// Mute state (preserves volume level)
    muted: bool,
}

impl Volume {
    /// Create new volume controller
    ///
    /// # Arguments
    /// * `level` - Initial volume, clamped to 0.0-1.0
    pub fn new(level: f32) -> Self {
        Self {
            level: Self::clamp(level, DEFAULT_VOLUME),
            muted: false,
        }
    }

    /// Set volume level, clamped to 0.0-1.0
    ///
    /// A non-finite level leaves the current one untouched.
    pub fn set_level(&mut self, level: f32) {
        self.level = Self::clamp(level, self.level);
    }

    /// Adjust the level by a signed step
    pub fn nudge(&mut self, delta: f32) {
        self.set_level(self.level + delta);
    }

    /// Get current volume level
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Level as a rounded percentage for display (0 when muted)
    pub fn percent(&self) -> u8 {
        (self.effective() * 100.0).round() as u8
    }

    /// Mute audio (preserves volume level)
    pub fn mute(&mut self) {
        self.muted = true;
    }

    /// Unmute audio (restores previous volume)
    pub fn unmute(&mut self) {
        self.muted = false;
    }

    /// Set mute state
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Level actually audible: 0.0 when muted
    pub fn effective(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.level
        }
    }

    fn clamp(level: f32, fallback: f32) -> f32 {
        if level.is_finite() {
            level.clamp(0.0, 1.0)
        } else {
            fallback
        }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(DEFAULT_VOLUME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_volume() {
        let vol = Volume::new(0.8);
        assert_eq!(vol.level(), 0.8);
        assert!(!vol.is_muted());
    }

    #[test]
    fn set_volume_level_clamps() {
        let mut vol = Volume::new(0.5);

        vol.set_level(0.75);
        assert_eq!(vol.level(), 0.75);

        vol.set_level(1.5);
        assert_eq!(vol.level(), 1.0);

        vol.set_level(-0.2);
        assert_eq!(vol.level(), 0.0);

        vol.set_level(f32::NAN);
        assert_eq!(vol.level(), 0.0);
    }

    #[test]
    fn nudge_steps_and_clamps() {
        let mut vol = Volume::new(0.97);
        vol.nudge(0.05);
        assert_eq!(vol.level(), 1.0);

        let mut vol = Volume::new(0.5);
        vol.nudge(-0.05);
        assert!((vol.level() - 0.45).abs() < 1e-6);
    }

    #[test]
    fn mute_unmute() {
        let mut vol = Volume::new(0.8);

        vol.mute();
        assert!(vol.is_muted());
        assert_eq!(vol.level(), 0.8); // Level preserved
        assert_eq!(vol.effective(), 0.0);
        assert_eq!(vol.percent(), 0);

        vol.unmute();
        assert!(!vol.is_muted());
        assert_eq!(vol.effective(), 0.8);
        assert_eq!(vol.percent(), 80);
    }

    #[test]
    fn toggle_mute() {
        let mut vol = Volume::default();
        vol.toggle_mute();
        assert!(vol.is_muted());
        vol.toggle_mute();
        assert!(!vol.is_muted());
    }

    #[test]
    fn default_is_seventy_percent() {
        assert_eq!(Volume::default().percent(), 70);
    }
}
