//! Owns the generation config and republishes the terrain mesh.
//!
//! `initialize()` stands in for an on-start hook and `on_config_changed()` for
//! an on-edit hook. Every generation validates the stored config first, then
//! rebuilds and publishes the whole mesh.

use crate::debug_log::{compute_normal_stats, debug_log};
use crate::generation_config::GenerationConfig;
use crate::mesh_builder::{GeneratedMesh, GridMeshBuilder};
use crate::mesh_sink::MeshSink;
use crate::noise_field::NoiseSource;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeneratorState {
    /// No mesh generated yet.
    Idle,
    /// A mesh has been published.
    Ready,
}

pub struct TerrainGenerator<N: NoiseSource, S: MeshSink> {
    config: GenerationConfig,
    noise: N,
    sink: S,
    state: GeneratorState,
    mesh: Option<GeneratedMesh>,
    generation_count: u64,
}

impl<N: NoiseSource, S: MeshSink> TerrainGenerator<N, S> {
    pub fn new(config: GenerationConfig, noise: N, sink: S) -> Self {
        Self {
            config,
            noise,
            sink,
            state: GeneratorState::Idle,
            mesh: None,
            generation_count: 0,
        }
    }

    /// Generate the first mesh. Does nothing once the generator is Ready.
    pub fn initialize(&mut self) -> &GeneratedMesh {
        if self.state == GeneratorState::Idle {
            return self.generate();
        }
        // Ready always holds a mesh
        self.mesh.get_or_insert_with(GeneratedMesh::default)
    }

    /// Rebuild and republish with the current config.
    pub fn regenerate(&mut self) -> &GeneratedMesh {
        self.generate()
    }

    /// Replace the whole config, then regenerate.
    pub fn on_config_changed(&mut self, config: GenerationConfig) -> &GeneratedMesh {
        self.config = config;
        self.generate()
    }

    /// Edit config fields in place, then regenerate.
    pub fn edit_config<F>(&mut self, edit: F) -> &GeneratedMesh
    where
        F: FnOnce(&mut GenerationConfig),
    {
        edit(&mut self.config);
        self.generate()
    }

    /// Swap the noise source. Takes effect on the next generation.
    pub fn set_noise(&mut self, noise: N) {
        self.noise = noise;
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn state(&self) -> GeneratorState {
        self.state
    }

    /// The last published mesh, `None` while Idle.
    pub fn mesh(&self) -> Option<&GeneratedMesh> {
        self.mesh.as_ref()
    }

    pub fn generation_count(&self) -> u64 {
        self.generation_count
    }

    pub fn noise(&self) -> &N {
        &self.noise
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn generate(&mut self) -> &GeneratedMesh {
        let before = self.config.clone();
        if self.config.validate() {
            debug_log(&format!(
                "[generate] clamped config {:?} -> {:?}",
                before, self.config
            ));
        }

        let builder = GridMeshBuilder::from_config(&self.config);
        let mesh = builder.build(&self.noise, &self.config);

        self.generation_count += 1;
        debug_log(&format!(
            "[generate] #{} {}x{} cells: verts={}, indices={}",
            self.generation_count,
            builder.width(),
            builder.height(),
            mesh.vertex_count(),
            mesh.triangles.len()
        ));

        if cfg!(debug_assertions) {
            let stats = compute_normal_stats(&mesh.normals);
            if stats.degenerate_count > 0 {
                debug_log(&format!(
                    "[generate] normals: min_len={:.3}, max_len={:.3}, degenerate={}",
                    stats.min_len, stats.max_len, stats.degenerate_count
                ));
            }
        }

        self.sink.publish(&mesh);
        self.state = GeneratorState::Ready;
        self.mesh.insert(mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation_config::MIN_SCALE;
    use crate::mesh_sink::CapturedMesh;
    use crate::noise_field::PerlinNoiseSource;

    fn new_terrain(config: GenerationConfig) -> TerrainGenerator<PerlinNoiseSource, CapturedMesh> {
        TerrainGenerator::new(config, PerlinNoiseSource::new(42), CapturedMesh::new())
    }

    #[test]
    fn test_starts_idle_without_mesh() {
        let terrain = new_terrain(GenerationConfig::default());
        assert_eq!(terrain.state(), GeneratorState::Idle);
        assert!(terrain.mesh().is_none());
        assert_eq!(terrain.sink().publish_count(), 0);
    }

    #[test]
    fn test_initialize_publishes_once() {
        let mut terrain = new_terrain(GenerationConfig::default());

        let vertex_count = terrain.initialize().vertex_count();
        assert_eq!(vertex_count, 11 * 11);
        assert_eq!(terrain.state(), GeneratorState::Ready);

        terrain.initialize();
        assert_eq!(terrain.sink().publish_count(), 1, "Second initialize should not regenerate");
        assert_eq!(terrain.generation_count(), 1);
    }

    #[test]
    fn test_regenerate_always_publishes() {
        let mut terrain = new_terrain(GenerationConfig::default());
        terrain.regenerate();
        terrain.regenerate();
        assert_eq!(terrain.sink().publish_count(), 2);
        assert_eq!(terrain.state(), GeneratorState::Ready);
    }

    #[test]
    fn test_config_change_rebuilds_whole_mesh() {
        let mut terrain = new_terrain(GenerationConfig::default());
        terrain.initialize();

        let mesh = terrain.on_config_changed(GenerationConfig {
            width: 3,
            height: 2,
            ..GenerationConfig::default()
        });
        assert_eq!(mesh.vertices.len(), 4 * 3);
        assert_eq!(mesh.triangles.len(), 3 * 2 * 6);

        let published = terrain.sink().mesh().cloned();
        assert_eq!(published.as_ref(), terrain.mesh());
        assert_eq!(terrain.sink().publish_count(), 2);
    }

    #[test]
    fn test_config_change_while_idle_generates() {
        let mut terrain = new_terrain(GenerationConfig::default());
        terrain.edit_config(|cfg| cfg.height_multiplier = 5.0);
        assert_eq!(terrain.state(), GeneratorState::Ready);
        assert_eq!(terrain.config().height_multiplier, 5.0);
    }

    #[test]
    fn test_invalid_config_is_clamped_before_generation() {
        let mut terrain = new_terrain(GenerationConfig::default());
        let mesh = terrain
            .on_config_changed(GenerationConfig {
                width: 0,
                height: -3,
                scale: -1.0,
                ..GenerationConfig::default()
            })
            .clone();

        assert_eq!(terrain.config().width, 1);
        assert_eq!(terrain.config().height, 1);
        assert_eq!(terrain.config().scale, MIN_SCALE);

        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.triangles.len(), 6);
        assert!(mesh.uvs.iter().flatten().all(|c| c.is_finite()));
        assert_eq!(mesh.uvs[3], [1.0, 1.0]);
    }

    #[test]
    fn test_edit_cannot_bypass_validation() {
        let mut terrain = new_terrain(GenerationConfig::default());
        terrain.initialize();
        terrain.edit_config(|cfg| {
            cfg.width = -10;
            cfg.scale = 0.0;
        });
        assert_eq!(terrain.config().width, 1);
        assert_eq!(terrain.config().scale, MIN_SCALE);
        assert_eq!(terrain.mesh().map(|m| m.vertex_count()), Some(2 * 11));
    }

    #[test]
    fn test_same_config_gives_identical_mesh() {
        let config = GenerationConfig {
            width: 6,
            height: 4,
            scale: 0.27,
            height_multiplier: 3.0,
            noise_offset: [10.0, -4.5],
        };
        let mut a = new_terrain(config.clone());
        let mut b = new_terrain(config);
        assert_eq!(a.initialize(), b.initialize());
    }

    #[test]
    fn test_offset_changes_heights_only() {
        let mut terrain = new_terrain(GenerationConfig {
            scale: 0.37,
            ..GenerationConfig::default()
        });
        let before = terrain.initialize().clone();
        let after = terrain
            .edit_config(|cfg| cfg.noise_offset = [3.3, 7.7])
            .clone();

        assert_eq!(before.triangles, after.triangles);
        assert_eq!(before.uvs, after.uvs);
        assert_ne!(before.vertices, after.vertices);
    }

    #[test]
    fn test_set_noise_applies_on_next_generation() {
        let mut terrain = TerrainGenerator::new(
            GenerationConfig::default(),
            PerlinNoiseSource::new(1),
            CapturedMesh::new(),
        );
        let first = terrain.initialize().clone();
        terrain.set_noise(PerlinNoiseSource::with_octaves(1, 4));
        assert_eq!(terrain.noise().get_octaves(), 4);
        let second = terrain.regenerate().clone();
        assert_eq!(first.triangles, second.triangles);
        assert_eq!(first.vertices.len(), second.vertices.len());
    }

    #[test]
    fn test_borrowed_sink() {
        let mut sink = CapturedMesh::new();
        {
            let mut terrain = TerrainGenerator::new(
                GenerationConfig::default(),
                |_: f32, _: f32| 0.0f32,
                &mut sink,
            );
            terrain.initialize();
        }
        let mesh = sink.take().unwrap_or_default();
        assert!(mesh.vertices.iter().all(|v| v[1] == 0.0));
        assert_eq!(mesh.normals.len(), mesh.vertices.len());
    }
}
