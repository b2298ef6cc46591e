use godot::classes::mesh::PrimitiveType;
use godot::classes::rendering_server::ArrayType;
use godot::classes::{ArrayMesh, IMeshInstance3D, MeshInstance3D};
use godot::prelude::*;

use crate::debug_log::init_debug_log;
use crate::generation_config::GenerationConfig;
use crate::mesh_builder::GeneratedMesh;
use crate::mesh_sink::MeshSink;
use crate::noise_field::PerlinNoiseSource;
use crate::terrain_generator::TerrainGenerator;

type VariantArray = Array<Variant>;

/// Converts published meshes into a Godot `ArrayMesh`.
#[derive(Default)]
pub struct ArrayMeshSink {
    pending: Option<Gd<ArrayMesh>>,
}

impl ArrayMeshSink {
    pub fn take_mesh(&mut self) -> Option<Gd<ArrayMesh>> {
        self.pending.take()
    }
}

impl MeshSink for ArrayMeshSink {
    fn publish(&mut self, mesh: &GeneratedMesh) {
        let vertices: PackedVector3Array = mesh
            .vertices
            .iter()
            .map(|v| Vector3::new(v[0], v[1], v[2]))
            .collect();
        let normals: PackedVector3Array = mesh
            .normals
            .iter()
            .map(|n| Vector3::new(n[0], n[1], n[2]))
            .collect();
        let uvs: PackedVector2Array = mesh.uvs.iter().map(|uv| Vector2::new(uv[0], uv[1])).collect();

        // Godot treats clockwise triangles as front faces in its right-handed
        // space, so each triangle is emitted as (a, c, b).
        let indices: PackedInt32Array = mesh
            .triangles
            .chunks_exact(3)
            .flat_map(|t| [t[0] as i32, t[2] as i32, t[1] as i32])
            .collect();

        // Build the mesh arrays - need to fill all slots up to MAX
        let num_arrays = ArrayType::MAX.ord() as usize;
        let mut arrays: VariantArray = VariantArray::new();

        for i in 0..num_arrays {
            if i == ArrayType::VERTEX.ord() as usize {
                arrays.push(&vertices.to_variant());
            } else if i == ArrayType::NORMAL.ord() as usize {
                arrays.push(&normals.to_variant());
            } else if i == ArrayType::TEX_UV.ord() as usize {
                arrays.push(&uvs.to_variant());
            } else if i == ArrayType::INDEX.ord() as usize {
                arrays.push(&indices.to_variant());
            } else {
                arrays.push(&Variant::nil());
            }
        }

        let mut array_mesh = ArrayMesh::new_gd();
        array_mesh.add_surface_from_arrays(PrimitiveType::TRIANGLES, &arrays);
        self.pending = Some(array_mesh);
    }
}

/// Heightmapped grid mesh driven by Perlin noise.
/// Regenerates on ready and whenever an exported property is edited.
#[derive(GodotClass)]
#[class(base=MeshInstance3D, init, tool)]
pub struct PerlinTerrain {
    base: Base<MeshInstance3D>,

    /// Grid cells along X
    #[export]
    #[var(get, set = set_width)]
    #[init(val = 10)]
    width: i32,

    /// Grid cells along Z
    #[export]
    #[var(get, set = set_height)]
    #[init(val = 10)]
    height: i32,

    /// Noise sampling frequency
    #[export]
    #[var(get, set = set_scale)]
    #[init(val = 1.0)]
    scale: f32,

    #[export]
    #[var(get, set = set_height_multiplier)]
    #[init(val = 2.0)]
    height_multiplier: f32,

    #[export]
    #[var(get, set = set_noise_offset)]
    noise_offset: Vector2,

    #[export]
    #[var(get, set = set_seed)]
    seed: i64,

    /// 1 = plain Perlin, more = fractal layers
    #[export]
    #[var(get, set = set_octaves)]
    #[init(val = 1)]
    octaves: i32,

    /// Write generation details to perlin_terrain_debug.log
    #[export]
    #[init(val = false)]
    debug_logging: bool,

    generator: Option<TerrainGenerator<PerlinNoiseSource, ArrayMeshSink>>,
}

#[godot_api]
impl IMeshInstance3D for PerlinTerrain {
    fn ready(&mut self) {
        if self.debug_logging {
            init_debug_log();
        }

        let mut generator =
            TerrainGenerator::new(self.config(), self.noise_source(), ArrayMeshSink::default());
        generator.initialize();
        self.generator = Some(generator);
        self.sync_from_generator();
        self.apply_pending_mesh();

        godot_print!("PerlinTerrain ready! Grid: {}x{}", self.width, self.height);
    }
}

#[godot_api]
impl PerlinTerrain {
    /// Rebuild the mesh with the current properties
    #[func]
    fn regenerate(&mut self) {
        let Some(generator) = self.generator.as_mut() else {
            godot_warn!("PerlinTerrain: regenerate() called before ready - skipping");
            return;
        };
        generator.regenerate();
        self.apply_pending_mesh();
    }

    #[func]
    fn get_vertex_count(&self) -> i64 {
        self.generator
            .as_ref()
            .and_then(|g| g.mesh())
            .map_or(0, |m| m.vertex_count() as i64)
    }
}

impl PerlinTerrain {
    fn set_width(&mut self, value: i32) {
        self.width = value;
        self.on_config_changed();
    }

    fn set_height(&mut self, value: i32) {
        self.height = value;
        self.on_config_changed();
    }

    fn set_scale(&mut self, value: f32) {
        self.scale = value;
        self.on_config_changed();
    }

    fn set_height_multiplier(&mut self, value: f32) {
        self.height_multiplier = value;
        self.on_config_changed();
    }

    fn set_noise_offset(&mut self, value: Vector2) {
        self.noise_offset = value;
        self.on_config_changed();
    }

    fn set_seed(&mut self, value: i64) {
        self.seed = value;
        self.on_noise_changed();
    }

    fn set_octaves(&mut self, value: i32) {
        self.octaves = value.max(1);
        self.on_noise_changed();
    }

    fn config(&self) -> GenerationConfig {
        GenerationConfig {
            width: self.width,
            height: self.height,
            scale: self.scale,
            height_multiplier: self.height_multiplier,
            noise_offset: [self.noise_offset.x, self.noise_offset.y],
        }
    }

    fn noise_source(&self) -> PerlinNoiseSource {
        PerlinNoiseSource::with_octaves(self.seed as u32, self.octaves.max(1) as usize)
    }

    /// Property edits before `ready` are stored and picked up by `initialize`.
    fn on_config_changed(&mut self) {
        let config = self.config();
        let Some(generator) = self.generator.as_mut() else {
            return;
        };
        generator.on_config_changed(config);
        self.sync_from_generator();
        self.apply_pending_mesh();
    }

    fn on_noise_changed(&mut self) {
        let noise = self.noise_source();
        let Some(generator) = self.generator.as_mut() else {
            return;
        };
        generator.set_noise(noise);
        generator.regenerate();
        self.apply_pending_mesh();
    }

    /// Reflect clamped values back into the inspector.
    fn sync_from_generator(&mut self) {
        let Some(generator) = self.generator.as_ref() else {
            return;
        };
        let config = generator.config().clone();
        self.width = config.width;
        self.height = config.height;
        self.scale = config.scale;
    }

    fn apply_pending_mesh(&mut self) {
        let Some(mesh) = self
            .generator
            .as_mut()
            .and_then(|g| g.sink_mut().take_mesh())
        else {
            return;
        };
        self.base_mut().set_mesh(&mesh);
    }
}
