use serde::{Deserialize, Serialize};

/// Smallest shell count for which `i / (count - 1)` is defined.
pub const MIN_SHELL_COUNT: u32 = 2;

/// Lower bound the UI slider enforces.
pub const UI_MIN_SHELL_COUNT: u32 = 8;

/// Upper bound on shells per frame. Sizes the per-shell uniform buffer.
pub const MAX_SHELL_COUNT: u32 = 256;

/// Global parameters read once per frame by the shell renderer.
///
/// The UI overlay edits these live between frames. Numeric ranges are enforced
/// by the UI sliders and by [`ShellParams::validate`] for file-loaded values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellParams {
    /// Number of shells drawn per frame.
    pub shell_count: u32,
    /// Radius of the base sphere.
    pub planet_radius: f32,
    /// Outward displacement of the outermost shell, in world units.
    pub shell_thickness: f32,
    /// Strand frequency over the unit sphere.
    pub density: f32,
    /// Color at the root of a strand.
    pub base_color: [f32; 3],
    /// Color at the tip of a strand.
    pub tip_color: [f32; 3],
    /// Color of surface below sea level.
    pub water_color: [f32; 3],
    /// Base frequency of the terrain noise.
    pub terrain_frequency: f32,
    /// Number of fbm octaves for terrain.
    pub terrain_octaves: u32,
    /// Offset into the noise field; changing it yields a different planet.
    pub terrain_seed: f32,
    /// Terrain values below this are ocean and grow no strands.
    pub sea_level: f32,
    /// Amplitude of the time-driven sway applied to outer shells.
    pub wind_strength: f32,
}

impl Default for ShellParams {
    fn default() -> Self {
        Self {
            shell_count: 128,
            planet_radius: 1.0,
            shell_thickness: 0.12,
            density: 180.0,
            base_color: [0.16, 0.28, 0.10],
            tip_color: [0.62, 0.78, 0.35],
            water_color: [0.05, 0.18, 0.38],
            terrain_frequency: 2.0,
            terrain_octaves: 5,
            terrain_seed: 7.0,
            sea_level: 0.45,
            wind_strength: 0.02,
        }
    }
}

/// Normalized height of shell `index` out of `count`, in `[0, 1]`.
///
/// Requires `count >= 2`.
pub fn shell_height(index: u32, count: u32) -> f32 {
    debug_assert!(count >= MIN_SHELL_COUNT, "shell count {count} < 2");
    index as f32 / (count - 1) as f32
}

impl ShellParams {
    /// Clamp fields into the ranges the parameter panel can show.
    ///
    /// File-loaded values may be valid for the renderer but below the panel's
    /// slider minimum.
    pub fn clamp_to_ui_ranges(&mut self) {
        self.shell_count = self.shell_count.clamp(UI_MIN_SHELL_COUNT, MAX_SHELL_COUNT);
        self.terrain_octaves = self.terrain_octaves.clamp(1, 8);
        self.sea_level = self.sea_level.clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_are_in_ui_range() {
        let p = ShellParams::default();
        assert!(p.shell_count >= UI_MIN_SHELL_COUNT);
        assert!(p.shell_count <= MAX_SHELL_COUNT);
    }

    #[test]
    fn shell_height_spans_unit_interval() {
        assert_eq!(shell_height(0, 128), 0.0);
        assert_eq!(shell_height(127, 128), 1.0);
        assert!((shell_height(1, 128) - 1.0 / 127.0).abs() < 1e-7);
        assert_eq!(shell_height(1, 2), 1.0);
    }

    #[test]
    fn clamp_raises_small_shell_counts() {
        let mut p = ShellParams {
            shell_count: 1,
            terrain_octaves: 40,
            ..ShellParams::default()
        };
        p.clamp_to_ui_ranges();
        assert_eq!(p.shell_count, UI_MIN_SHELL_COUNT);
        assert_eq!(p.terrain_octaves, 8);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let p: ShellParams = serde_json::from_str(r#"{ "shell_count": 32 }"#).unwrap();
        assert_eq!(p.shell_count, 32);
        assert_eq!(p.density, ShellParams::default().density);
    }
}
