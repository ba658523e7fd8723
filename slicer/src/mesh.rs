use crate::{
    transform::{Transform, TransformOp},
    Pos,
};

/// One face of a mesh. The normal is optional, mesh importers that carry
/// per-face normals keep them here.
#[derive(Clone, Copy, Debug)]
pub struct Triangle {
    pub vertices: [Pos; 3],
    pub normal: Option<Pos>,
}

impl Triangle {
    pub fn new(vertices: [Pos; 3]) -> Self {
        Self {
            vertices,
            normal: None,
        }
    }

    pub fn with_normal(vertices: [Pos; 3], normal: Pos) -> Self {
        Self {
            vertices,
            normal: Some(normal),
        }
    }

    /// The stored normal, or one computed from the vertex winding.
    pub fn normal(&self) -> Pos {
        self.normal.unwrap_or_else(|| {
            let edge1 = self.vertices[1] - self.vertices[0];
            let edge2 = self.vertices[2] - self.vertices[0];
            edge1.cross(&edge2).normalize()
        })
    }
}

/// A triangle soup with one attached transform. All geometric queries go
/// through the transform; the raw vertex data is never mutated.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    triangles: Vec<Triangle>,
    transform: Transform,
}

impl Mesh {
    /// Creates a new mesh with an identity transform.
    pub fn new(triangles: Vec<Triangle>) -> Self {
        Self {
            triangles,
            transform: Transform::identity(),
        }
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// Transforms a point by the mesh transform.
    pub fn transform_point(&self, pos: &Pos) -> Pos {
        self.transform.apply(pos)
    }

    /// Componentwise minimum and maximum of every transformed vertex, or
    /// `None` for a mesh with no triangles.
    pub fn bounds(&self) -> Option<(Pos, Pos)> {
        if self.triangles.is_empty() {
            return None;
        }

        let identity = self.transform.is_identity();
        let bounds = self
            .triangles
            .iter()
            .flat_map(|t| t.vertices.iter())
            .fold(
                (Pos::repeat(f32::MAX), Pos::repeat(f32::MIN)),
                |(min, max), vertex| {
                    let v = if identity {
                        *vertex
                    } else {
                        self.transform.apply(vertex)
                    };
                    (min.inf(&v), max.sup(&v))
                },
            );

        Some(bounds)
    }

    /// Z extent of the transformed mesh in mm, floored at zero.
    pub fn height(&self) -> f32 {
        self.bounds()
            .map(|(min, max)| (max.z - min.z).max(0.0))
            .unwrap_or(0.0)
    }

    /// Pushes a translation that centers the model on the XY origin and
    /// rests its lowest point on the build plate (Z = 0). Any rotation or
    /// scaling already applied is preserved.
    pub fn place_on_platform(&mut self) {
        let Some((min, max)) = self.bounds() else {
            return;
        };

        let center = (min + max) / 2.0;
        self.transform
            .push(TransformOp::Translate(Pos::new(-center.x, -center.y, -min.z)));
    }
}
