use nalgebra::{Vector2, Vector3};
use std::f32::consts::{PI, TAU};
use std::fmt::Debug;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex3D {
    pub position: Vector3<f32>,
    pub uv: Vector2<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex3D {
    pub fn basic(position: Vector3<f32>, uv: Vector2<f32>, normal: Vector3<f32>) -> Self {
        Self {
            position,
            uv,
            normal,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MeshVertexData<T: Debug + Clone> {
    pub vertices: Vec<T>,
    pub indices: Option<Vec<u32>>,
}

#[derive(Debug, Clone)]
pub struct Mesh {
    pub data: Arc<MeshVertexData<Vertex3D>>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex3D>, indices: Option<Vec<u32>>) -> Self {
        Self {
            data: Arc::new(MeshVertexData { vertices, indices }),
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.data.vertices.len()
    }

    #[inline]
    pub fn indices_count(&self) -> usize {
        self.indices().map_or(0, <[u32]>::len)
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        if self.has_indices() {
            self.indices_count() / 3
        } else {
            self.vertex_count() / 3
        }
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex3D] {
        &self.data.vertices
    }

    #[inline]
    pub fn indices(&self) -> Option<&[u32]> {
        self.data.indices.as_deref()
    }

    #[inline]
    pub fn has_indices(&self) -> bool {
        self.data.indices.is_some()
    }

    /// Axis-aligned unit cube centered on the origin, one quad per face.
    pub fn unit_cube() -> Self {
        // (normal, tangent-u, tangent-v) per face
        const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
            ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
            ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
            ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
            ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        for (normal, tan_u, tan_v) in FACES {
            let n = Vector3::from(normal);
            let u = Vector3::from(tan_u);
            let v = Vector3::from(tan_v);
            let base = vertices.len() as u32;

            for (du, dv) in [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)] {
                let position = n * 0.5 + u * du + v * dv;
                let uv = Vector2::new(du + 0.5, 0.5 - dv);
                vertices.push(Vertex3D::basic(position, uv, n));
            }

            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self::new(vertices, Some(indices))
    }

    /// Unit-radius UV sphere.
    pub fn uv_sphere(stacks: u32, slices: u32) -> Self {
        let stacks = stacks.max(2);
        let slices = slices.max(3);

        let mut vertices = Vec::with_capacity(((stacks + 1) * (slices + 1)) as usize);
        for stack in 0..=stacks {
            let phi = PI * stack as f32 / stacks as f32;
            for slice in 0..=slices {
                let theta = TAU * slice as f32 / slices as f32;
                let normal = Vector3::new(
                    phi.sin() * theta.cos(),
                    phi.cos(),
                    phi.sin() * theta.sin(),
                );
                let uv = Vector2::new(
                    slice as f32 / slices as f32,
                    stack as f32 / stacks as f32,
                );
                vertices.push(Vertex3D::basic(normal, uv, normal));
            }
        }

        let ring = slices + 1;
        let mut indices = Vec::with_capacity((stacks * slices * 6) as usize);
        for stack in 0..stacks {
            for slice in 0..slices {
                let a = stack * ring + slice;
                let b = a + ring;
                indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
            }
        }

        Self::new(vertices, Some(indices))
    }

    /// Unit quad in the XY plane, facing +Z.
    pub fn unit_quad() -> Self {
        let normal = Vector3::new(0.0, 0.0, 1.0);
        let vertices = vec![
            Vertex3D::basic(Vector3::new(-0.5, -0.5, 0.0), Vector2::new(0.0, 1.0), normal),
            Vertex3D::basic(Vector3::new(0.5, -0.5, 0.0), Vector2::new(1.0, 1.0), normal),
            Vertex3D::basic(Vector3::new(0.5, 0.5, 0.0), Vector2::new(1.0, 0.0), normal),
            Vertex3D::basic(Vector3::new(-0.5, 0.5, 0.0), Vector2::new(0.0, 0.0), normal),
        ];
        Self::new(vertices, Some(vec![0, 1, 2, 0, 2, 3]))
    }
}
