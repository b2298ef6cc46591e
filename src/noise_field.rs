use noise::{Fbm, MultiFractal, NoiseFn, Perlin};
use rayon::prelude::*;

use crate::generation_config::GenerationConfig;

/// A pure 2D scalar field sampled to produce terrain heights.
///
/// Implementations must be deterministic: the same `(x, y)` always yields the
/// same value. `Sync` lets a whole grid be sampled in parallel.
pub trait NoiseSource: Sync {
    fn sample(&self, x: f32, y: f32) -> f32;
}

impl<F> NoiseSource for F
where
    F: Fn(f32, f32) -> f32 + Sync,
{
    fn sample(&self, x: f32, y: f32) -> f32 {
        self(x, y)
    }
}

enum PerlinKind {
    Single(Perlin),
    Fractal(Fbm<Perlin>),
}

/// Perlin noise remapped from [-1, 1] into [0, 1].
pub struct PerlinNoiseSource {
    kind: PerlinKind,
    seed: u32,
    octaves: usize,
}

impl PerlinNoiseSource {
    pub fn new(seed: u32) -> Self {
        Self {
            kind: PerlinKind::Single(Perlin::new(seed)),
            seed,
            octaves: 1,
        }
    }

    /// Fractal Perlin with `octaves` layers. Frequency stays at 1.0 so the
    /// config's `scale` remains the only sampling frequency.
    pub fn with_octaves(seed: u32, octaves: usize) -> Self {
        let octaves = octaves.max(1);
        if octaves == 1 {
            return Self::new(seed);
        }

        let fbm = Fbm::<Perlin>::new(seed)
            .set_octaves(octaves)
            .set_frequency(1.0)
            .set_lacunarity(2.0)
            .set_persistence(0.5);

        Self {
            kind: PerlinKind::Fractal(fbm),
            seed,
            octaves,
        }
    }

    pub fn get_seed(&self) -> u32 {
        self.seed
    }

    pub fn get_octaves(&self) -> usize {
        self.octaves
    }
}

impl Default for PerlinNoiseSource {
    fn default() -> Self {
        Self::new(0)
    }
}

impl NoiseSource for PerlinNoiseSource {
    fn sample(&self, x: f32, y: f32) -> f32 {
        let point = [x as f64, y as f64];
        let raw = match &self.kind {
            PerlinKind::Single(perlin) => perlin.get(point),
            PerlinKind::Fractal(fbm) => fbm.get(point),
        };
        (((raw + 1.0) * 0.5) as f32).clamp(0.0, 1.0)
    }
}

/// Height lookup over the integer grid of a single config.
pub struct NoiseHeightField<'a, N: NoiseSource + ?Sized> {
    noise: &'a N,
    scale: f32,
    height_multiplier: f32,
    offset: [f32; 2],
}

impl<'a, N: NoiseSource + ?Sized> NoiseHeightField<'a, N> {
    pub fn new(noise: &'a N, config: &GenerationConfig) -> Self {
        Self {
            noise,
            scale: config.scale,
            height_multiplier: config.height_multiplier,
            offset: config.noise_offset,
        }
    }

    /// Height at grid coordinate `(x, z)`: raw noise times the multiplier.
    pub fn height_at(&self, x: u32, z: u32) -> f32 {
        let sample_x = (x as f32 + self.offset[0]) * self.scale;
        let sample_z = (z as f32 + self.offset[1]) * self.scale;
        self.noise.sample(sample_x, sample_z) * self.height_multiplier
    }

    /// Heights for every grid point of a `width` x `height` cell grid, in
    /// row-major order (`z * (width + 1) + x`).
    pub fn sample_grid(&self, width: u32, height: u32) -> Vec<f32> {
        let row = width + 1;
        let count = row as usize * (height + 1) as usize;

        (0..count)
            .into_par_iter()
            .map(|i| {
                let x = i as u32 % row;
                let z = i as u32 / row;
                self.height_at(x, z)
            })
            .collect()
    }
}
