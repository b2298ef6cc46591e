//! Parameters for one terrain mesh generation.
//! The Godot node mirrors these defaults in its exported properties.

/// Smallest sampling scale a config may carry after validation.
pub const MIN_SCALE: f32 = 0.1;

#[derive(Clone, Debug, PartialEq)]
pub struct GenerationConfig {
    /// Grid cells along X.
    pub width: i32,
    /// Grid cells along Z.
    pub height: i32,
    /// Noise sampling frequency. Does not change vertex spacing.
    pub scale: f32,
    /// Vertical amplitude applied to the raw noise value.
    pub height_multiplier: f32,
    /// Shift of the sampling origin, as (x, z).
    pub noise_offset: [f32; 2],
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            scale: 1.0,
            height_multiplier: 2.0,
            noise_offset: [0.0, 0.0],
        }
    }
}

impl GenerationConfig {
    /// Clamp out-of-range values in place. Returns true if anything changed.
    pub fn validate(&mut self) -> bool {
        let mut changed = false;
        if self.width < 1 {
            self.width = 1;
            changed = true;
        }
        if self.height < 1 {
            self.height = 1;
            changed = true;
        }
        // `!(x > 0)` also catches NaN
        if !(self.scale > 0.0) {
            self.scale = MIN_SCALE;
            changed = true;
        }
        changed
    }

    pub fn validated(mut self) -> Self {
        self.validate();
        self
    }

    /// Cell counts along (x, z), never below 1.
    pub fn grid_cells(&self) -> (u32, u32) {
        (self.width.max(1) as u32, self.height.max(1) as u32)
    }
}
