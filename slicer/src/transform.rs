use nalgebra::Matrix4;

use crate::Pos;

/// A single affine operation. Rotations are Euler angles in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransformOp {
    Translate(Pos),
    Rotate(Pos),
    Scale(Pos),
}

impl TransformOp {
    fn matrix(&self) -> Matrix4<f32> {
        match *self {
            TransformOp::Translate(offset) => Matrix4::new_translation(&offset),
            TransformOp::Rotate(angles) => {
                Matrix4::from_euler_angles(angles.x, angles.y, angles.z)
            }
            TransformOp::Scale(factors) => Matrix4::new_nonuniform_scaling(&factors),
        }
    }
}

/// An ordered list of affine operations, applied left-to-right: the first
/// pushed operation is the first applied to a point. The combined matrix is
/// cached and recomputed on every mutation, so reads are a single
/// matrix-vector product.
#[derive(Clone, Debug)]
pub struct Transform {
    ops: Vec<TransformOp>,
    matrix: Matrix4<f32>,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            ops: Vec::new(),
            matrix: Matrix4::identity(),
        }
    }

    pub fn push(&mut self, op: TransformOp) {
        self.ops.push(op);
        self.update_matrix();
    }

    pub fn ops(&self) -> &[TransformOp] {
        &self.ops
    }

    pub fn is_identity(&self) -> bool {
        self.ops.is_empty()
    }

    /// The combined transformation matrix of every operation in order.
    pub fn matrix(&self) -> &Matrix4<f32> {
        &self.matrix
    }

    /// Transforms a point through the whole operation list.
    pub fn apply(&self, pos: &Pos) -> Pos {
        (self.matrix * pos.push(1.0)).xyz()
    }

    fn update_matrix(&mut self) {
        self.matrix = self
            .ops
            .iter()
            .fold(Matrix4::identity(), |acc, op| op.matrix() * acc);
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod test {
    use std::f32::consts::FRAC_PI_2;

    use super::{Transform, TransformOp};
    use crate::Pos;

    #[test]
    fn identity_leaves_points_alone() {
        let transform = Transform::identity();
        assert!(transform.is_identity());

        let point = Pos::new(1.0, -2.0, 3.0);
        assert_eq!(transform.apply(&point), point);
    }

    #[test]
    fn ops_apply_left_to_right() {
        let mut translate_then_scale = Transform::identity();
        translate_then_scale.push(TransformOp::Translate(Pos::new(1.0, 0.0, 0.0)));
        translate_then_scale.push(TransformOp::Scale(Pos::repeat(2.0)));

        let mut scale_then_translate = Transform::identity();
        scale_then_translate.push(TransformOp::Scale(Pos::repeat(2.0)));
        scale_then_translate.push(TransformOp::Translate(Pos::new(1.0, 0.0, 0.0)));

        let origin = Pos::zeros();
        assert_eq!(
            translate_then_scale.apply(&origin),
            Pos::new(2.0, 0.0, 0.0)
        );
        assert_eq!(
            scale_then_translate.apply(&origin),
            Pos::new(1.0, 0.0, 0.0)
        );
    }

    #[test]
    fn rotation_about_z() {
        let mut transform = Transform::identity();
        transform.push(TransformOp::Rotate(Pos::new(0.0, 0.0, FRAC_PI_2)));

        let rotated = transform.apply(&Pos::new(1.0, 0.0, 0.0));
        assert!((rotated - Pos::new(0.0, 1.0, 0.0)).norm() < 1e-6);
    }
}
