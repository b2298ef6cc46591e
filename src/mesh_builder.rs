use rayon::prelude::*;

use crate::generation_config::GenerationConfig;
use crate::noise_field::{NoiseHeightField, NoiseSource};

/// Epsilon for near-zero length checks (appropriate for f32 precision)
const NORMAL_EPSILON: f32 = 1e-6;

/// Complete output of one generation pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeneratedMesh {
    pub vertices: Vec<[f32; 3]>,
    pub triangles: Vec<u32>,
    pub uvs: Vec<[f32; 2]>,
    pub normals: Vec<[f32; 3]>,
}

impl GeneratedMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Builds a heightmapped grid surface of `width` x `height` cells.
///
/// Vertices sit on integer (x, z) coordinates, one unit apart. Every array the
/// builder emits agrees on [`GridMeshBuilder::index`].
pub struct GridMeshBuilder {
    width: u32,
    height: u32,
}

impl GridMeshBuilder {
    /// Cell counts below 1 are raised to 1 so UV projection never divides by zero.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn from_config(config: &GenerationConfig) -> Self {
        let (width, height) = config.grid_cells();
        Self::new(width, height)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn index(&self, x: u32, z: u32) -> u32 {
        z * (self.width + 1) + x
    }

    pub fn vertex_count(&self) -> usize {
        (self.width as usize + 1) * (self.height as usize + 1)
    }

    pub fn index_count(&self) -> usize {
        self.width as usize * self.height as usize * 6
    }

    /// Run all phases in order: vertices, triangles, uvs, normals.
    pub fn build<N: NoiseSource + ?Sized>(
        &self,
        noise: &N,
        config: &GenerationConfig,
    ) -> GeneratedMesh {
        let field = NoiseHeightField::new(noise, config);
        let vertices = self.generate_vertices(&field);
        let triangles = self.generate_triangles();
        let uvs = self.generate_uvs(&vertices);
        let normals = recompute_normals(&vertices, &triangles);

        GeneratedMesh {
            vertices,
            triangles,
            uvs,
            normals,
        }
    }

    pub fn generate_vertices<N: NoiseSource + ?Sized>(
        &self,
        field: &NoiseHeightField<'_, N>,
    ) -> Vec<[f32; 3]> {
        let row = self.width + 1;
        field
            .sample_grid(self.width, self.height)
            .into_iter()
            .enumerate()
            .map(|(i, y)| {
                let x = i as u32 % row;
                let z = i as u32 / row;
                [x as f32, y, z as f32]
            })
            .collect()
    }

    /// Two triangles per cell. Depends only on the grid dimensions.
    pub fn generate_triangles(&self) -> Vec<u32> {
        let mut triangles = Vec::with_capacity(self.index_count());
        let row = self.width + 1;

        for z in 0..self.height {
            for x in 0..self.width {
                let v = self.index(x, z);

                triangles.extend([v, v + row, v + 1]);
                triangles.extend([v + 1, v + row, v + row + 1]);
            }
        }

        triangles
    }

    /// Planar projection onto [0, 1] x [0, 1]; ignores vertex height.
    pub fn generate_uvs(&self, vertices: &[[f32; 3]]) -> Vec<[f32; 2]> {
        let width = self.width as f32;
        let height = self.height as f32;
        vertices
            .par_iter()
            .map(|v| [v[0] / width, v[2] / height])
            .collect()
    }
}

/// Smooth per-vertex normals from the triangle winding.
/// Face normals are accumulated unnormalized, so larger faces weigh more.
pub fn recompute_normals(vertices: &[[f32; 3]], triangles: &[u32]) -> Vec<[f32; 3]> {
    let mut accumulated = vec![[0.0f32; 3]; vertices.len()];

    for tri in triangles.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        if i0 >= vertices.len() || i1 >= vertices.len() || i2 >= vertices.len() {
            continue;
        }

        let v0 = vertices[i0];
        let v1 = vertices[i1];
        let v2 = vertices[i2];

        let edge1 = sub(v1, v0);
        let edge2 = sub(v2, v0);
        let face_normal = cross(edge1, edge2);

        for i in [i0, i1, i2] {
            accumulated[i][0] += face_normal[0];
            accumulated[i][1] += face_normal[1];
            accumulated[i][2] += face_normal[2];
        }
    }

    accumulated.into_iter().map(normalize).collect()
}

// Vector math helpers
fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len > NORMAL_EPSILON {
        [v[0] / len, v[1] / len, v[2] / len]
    } else {
        [0.0, 1.0, 0.0] // Default up vector for degenerate normals
    }
}
