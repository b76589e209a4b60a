//! Gameplay constants.
//!
//! Every value has a built-in default and can be overridden from an INI file.
//! All lengths are percentages of the play field; times are milliseconds.
//!
//! ```ini
//! [physics]
//! gravity = 1.2
//! jump = 20
//!
//! [speed]
//! base = 3
//! step = 0.2
//! every = 5
//!
//! [obstacles]
//! gap = 25
//! min_top = 10
//! max_top = 50
//! width = 10
//! spawn_ms = 1500
//! motion_ms = 20
//!
//! [display]
//! frame_ms = 16
//! ```

use anyhow::{Context, Result, anyhow, ensure};
use configparser::ini::Ini;
use log::info;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct Tuning {
    /// Downward increment applied to the character on every tick.
    pub gravity: f64,
    /// Upward offset applied by a jump.
    pub jump: f64,
    pub base_speed: f64,
    pub speed_step: f64,
    /// Speed grows by `speed_step` each time score reaches a multiple of this.
    pub speed_every: u32,
    pub gap: u32,
    /// Top heights are drawn from `min_top..max_top`.
    pub min_top: u32,
    pub max_top: u32,
    pub obstacle_width: f64,
    pub spawn_period: Duration,
    pub motion_period: Duration,
    pub frame_period: Duration,
    pub start_position: f64,
    pub ceiling: f64,
    pub floor: f64,
    /// Horizontal band occupied by the character.
    pub hit_left: f64,
    pub hit_right: f64,
    pub spawn_left: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 1.2,
            jump: 20.0,
            base_speed: 3.0,
            speed_step: 0.2,
            speed_every: 5,
            gap: 25,
            min_top: 10,
            max_top: 50,
            obstacle_width: 10.0,
            spawn_period: Duration::from_millis(1500),
            motion_period: Duration::from_millis(20),
            frame_period: Duration::from_millis(16),
            start_position: 50.0,
            ceiling: 0.0,
            floor: 95.0,
            hit_left: 15.0,
            hit_right: 25.0,
            spawn_left: 100.0,
        }
    }
}

impl Tuning {
    /// Load overrides from an INI file on top of the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let mut ini = Ini::new();
        ini.load(path)
            .map_err(|e| anyhow!(e))
            .with_context(|| format!("Failed to load config {}", path.display()))?;
        let tuning = Self::from_ini(&ini)?;
        info!("Loaded tuning from {}: {:?}", path.display(), tuning);
        Ok(tuning)
    }

    pub fn from_ini_str(text: &str) -> Result<Self> {
        let mut ini = Ini::new();
        ini.read(text.to_string()).map_err(|e| anyhow!(e))?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self> {
        let mut t = Self::default();

        let float = |section: &str, key: &str| -> Result<Option<f64>> {
            ini.getfloat(section, key)
                .map_err(|e| anyhow!("[{section}] {key}: {e}"))
        };
        let uint = |section: &str, key: &str| -> Result<Option<u64>> {
            ini.getuint(section, key)
                .map_err(|e| anyhow!("[{section}] {key}: {e}"))
        };
        let small = |section: &str, key: &str| -> Result<Option<u32>> {
            uint(section, key)?
                .map(u32::try_from)
                .transpose()
                .with_context(|| format!("[{section}] {key}: value out of range"))
        };

        if let Some(v) = float("physics", "gravity")? {
            t.gravity = v;
        }
        if let Some(v) = float("physics", "jump")? {
            t.jump = v;
        }
        if let Some(v) = float("speed", "base")? {
            t.base_speed = v;
        }
        if let Some(v) = float("speed", "step")? {
            t.speed_step = v;
        }
        if let Some(v) = small("speed", "every")? {
            t.speed_every = v;
        }
        if let Some(v) = small("obstacles", "gap")? {
            t.gap = v;
        }
        if let Some(v) = small("obstacles", "min_top")? {
            t.min_top = v;
        }
        if let Some(v) = small("obstacles", "max_top")? {
            t.max_top = v;
        }
        if let Some(v) = float("obstacles", "width")? {
            t.obstacle_width = v;
        }
        if let Some(v) = uint("obstacles", "spawn_ms")? {
            t.spawn_period = Duration::from_millis(v);
        }
        if let Some(v) = uint("obstacles", "motion_ms")? {
            t.motion_period = Duration::from_millis(v);
        }
        if let Some(v) = uint("display", "frame_ms")? {
            t.frame_period = Duration::from_millis(v);
        }

        t.validate()?;
        Ok(t)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, v) in [
            ("physics gravity", self.gravity),
            ("physics jump", self.jump),
            ("speed step", self.speed_step),
        ] {
            ensure!(v.is_finite() && v >= 0.0, "{name} must be a non-negative number");
        }
        ensure!(
            self.base_speed.is_finite() && self.base_speed > 0.0,
            "speed base must be positive"
        );
        ensure!(self.speed_every > 0, "speed every must be at least 1");
        ensure!(
            self.min_top < self.max_top,
            "obstacles min_top must be below max_top"
        );
        ensure!(
            self.max_top as u64 + self.gap as u64 <= 100,
            "obstacles max_top + gap must not exceed 100"
        );
        ensure!(
            self.obstacle_width.is_finite() && self.obstacle_width > 0.0,
            "obstacles width must be positive"
        );
        ensure!(
            !self.spawn_period.is_zero() && !self.motion_period.is_zero(),
            "timer periods must be non-zero"
        );
        Ok(())
    }

    /// Tilt in degrees shown while falling.
    pub fn fall_tilt(&self) -> f64 {
        ((self.gravity - 0.5) * 30.0).clamp(-30.0, 30.0)
    }

    /// Position past which an obstacle is fully off the left edge.
    pub fn exit_left(&self) -> f64 {
        -self.obstacle_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_keeps_defaults() {
        let t = Tuning::from_ini_str("").expect("empty config parses");
        assert_eq!(t, Tuning::default());
    }

    #[test]
    fn overrides_apply_per_key() {
        let t = Tuning::from_ini_str(
            "[physics]\ngravity = 0.8\n[obstacles]\ngap = 30\nspawn_ms = 900\n",
        )
        .expect("config parses");
        assert_eq!(t.gravity, 0.8);
        assert_eq!(t.gap, 30);
        assert_eq!(t.spawn_period, Duration::from_millis(900));
        assert_eq!(t.jump, 20.0);
        assert_eq!(t.base_speed, 3.0);
    }

    #[test]
    fn rejects_gap_that_cannot_fit() {
        let err = Tuning::from_ini_str("[obstacles]\ngap = 60\n").unwrap_err();
        assert!(err.to_string().contains("max_top + gap"));
    }

    #[test]
    fn rejects_integers_beyond_u32() {
        let err = Tuning::from_ini_str("[obstacles]\ngap = 4294967306\n").unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn huge_max_top_is_an_error_not_an_overflow() {
        let err = Tuning::from_ini_str("[obstacles]\nmax_top = 4294967295\n").unwrap_err();
        assert!(err.to_string().contains("max_top + gap"));
    }

    #[test]
    fn rejects_negative_or_non_finite_floats() {
        assert!(Tuning::from_ini_str("[physics]\ngravity = -1\n").is_err());
        assert!(Tuning::from_ini_str("[physics]\njump = inf\n").is_err());
        assert!(Tuning::from_ini_str("[obstacles]\nwidth = NaN\n").is_err());
        assert!(Tuning::from_ini_str("[obstacles]\nwidth = -5\n").is_err());
    }

    #[test]
    fn rejects_non_numeric_value() {
        assert!(Tuning::from_ini_str("[physics]\ngravity = heavy\n").is_err());
    }

    #[test]
    fn default_fall_tilt_is_clamped_formula() {
        let t = Tuning::default();
        assert!((t.fall_tilt() - 21.0).abs() < 1e-9);
        let steep = Tuning {
            gravity: 5.0,
            ..Tuning::default()
        };
        assert_eq!(steep.fall_tilt(), 30.0);
    }
}
