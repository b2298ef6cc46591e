//! Procedural terrain mesh from 2D Perlin noise.
//!
//! A `width` x `height` cell grid is lifted by a [`NoiseSource`], triangulated,
//! UV-projected and given smooth normals, then handed to a [`MeshSink`].
//! Build with the `godot` feature for the `PerlinTerrain` editor node.

pub mod debug_log;
pub mod generation_config;
pub mod mesh_builder;
pub mod mesh_sink;
pub mod noise_field;
pub mod terrain_generator;

#[cfg(feature = "godot")]
mod terrain;

pub use generation_config::{GenerationConfig, MIN_SCALE};
pub use mesh_builder::{recompute_normals, GeneratedMesh, GridMeshBuilder};
pub use mesh_sink::{CapturedMesh, MeshSink};
pub use noise_field::{NoiseHeightField, NoiseSource, PerlinNoiseSource};
pub use terrain_generator::{GeneratorState, TerrainGenerator};

#[cfg(feature = "godot")]
mod extension {
    use godot::prelude::*;

    struct PerlinTerrainExtension;

    #[gdextension]
    unsafe impl ExtensionLibrary for PerlinTerrainExtension {}
}
