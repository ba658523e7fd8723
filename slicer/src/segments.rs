use nalgebra::Vector2;

use crate::{mesh::Mesh, raster::Projection, Pos};

/// Distance below which a point counts as lying on the cut plane, in mm.
/// Also used to collapse coincident intersection points within a triangle.
pub const PLANE_EPSILON: f32 = 0.001;

/// An unordered piece of a layer outline, in pixel space. Produced and
/// consumed within a single layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: Vector2<f32>,
    pub end: Vector2<f32>,
}

/// Finds every line segment where the transformed mesh surface crosses the
/// plane `Z = z`. Points are projected into pixel space as they are
/// emitted. A mesh with no triangles crossing the plane yields an empty
/// set, not an error.
pub fn intersect_plane(mesh: &Mesh, z: f32, projection: &Projection) -> Vec<Segment> {
    let mut segments = Vec::new();
    let identity = mesh.transform().is_identity();

    for triangle in mesh.triangles() {
        let vertices = if identity {
            triangle.vertices
        } else {
            triangle.vertices.map(|v| mesh.transform_point(&v))
        };

        // Each edge contributes either its lerped crossing point or, when
        // the whole edge lies on the plane, both endpoints.
        let mut points: Vec<Pos> = Vec::new();
        for i in 0..3 {
            let p1 = vertices[i];
            let p2 = vertices[(i + 1) % 3];

            if (p1.z < z && z < p2.z) || (p1.z > z && z > p2.z) {
                let t = (z - p1.z) / (p2.z - p1.z);
                points.push(p1 + t * (p2 - p1));
            } else if (p1.z - z).abs() < PLANE_EPSILON && (p2.z - z).abs() < PLANE_EPSILON {
                points.push(p1);
                points.push(p2);
            }
        }

        // A triangle only yields a segment when exactly two distinct
        // points remain. This drops fully coplanar triangles (three
        // distinct points) along with degenerate ones.
        let mut distinct: Vec<Pos> = Vec::new();
        for point in points {
            if !distinct.iter().any(|p| (point - p).norm() < PLANE_EPSILON) {
                distinct.push(point);
            }
        }

        if let [a, b] = distinct[..] {
            segments.push(Segment {
                start: projection.project(&a),
                end: projection.project(&b),
            });
        }
    }

    segments
}

#[cfg(test)]
mod test {
    use common::config::PrinterSettings;
    use nalgebra::Vector3;

    use super::intersect_plane;
    use crate::{raster::Projection, test_mesh, Pos};

    fn projection() -> Projection {
        // 1920 / 19.2 == 1080 / 10.8, so the projection scale is a round
        // 100 px/mm before the margin factor.
        Projection::new(&PrinterSettings {
            build_volume: Vector3::new(19.2, 10.8, 25.0),
            ..Default::default()
        })
    }

    #[test]
    fn triangle_away_from_plane_contributes_nothing() {
        let above = test_mesh::single_triangle(
            Pos::new(0.0, 0.0, 5.0),
            Pos::new(1.0, 0.0, 6.0),
            Pos::new(0.0, 1.0, 7.0),
        );
        assert!(intersect_plane(&above, 1.0, &projection()).is_empty());

        let below = test_mesh::single_triangle(
            Pos::new(0.0, 0.0, -5.0),
            Pos::new(1.0, 0.0, -6.0),
            Pos::new(0.0, 1.0, -7.0),
        );
        assert!(intersect_plane(&below, 1.0, &projection()).is_empty());
    }

    #[test]
    fn straddling_triangle_contributes_one_segment() {
        let mesh = test_mesh::single_triangle(
            Pos::new(0.0, 0.0, 0.0),
            Pos::new(2.0, 0.0, 2.0),
            Pos::new(0.0, 2.0, 2.0),
        );

        let segments = intersect_plane(&mesh, 1.0, &projection());
        assert_eq!(segments.len(), 1);

        // Crossing points sit halfway along both slanted edges.
        let expected_a = projection().project(&Pos::new(1.0, 0.0, 1.0));
        let expected_b = projection().project(&Pos::new(0.0, 1.0, 1.0));
        let segment = segments[0];
        assert!(
            (segment.start - expected_a).norm() < 1e-3 && (segment.end - expected_b).norm() < 1e-3
                || (segment.start - expected_b).norm() < 1e-3
                    && (segment.end - expected_a).norm() < 1e-3
        );
    }

    #[test]
    fn vertex_order_does_not_change_the_crossing() {
        let a = Pos::new(0.0, 0.0, 0.0);
        let b = Pos::new(2.0, 0.0, 2.0);
        let c = Pos::new(0.0, 2.0, 2.0);

        let forward = intersect_plane(&test_mesh::single_triangle(a, b, c), 1.0, &projection());
        let reversed = intersect_plane(&test_mesh::single_triangle(c, b, a), 1.0, &projection());

        assert_eq!(forward.len(), 1);
        assert_eq!(reversed.len(), 1);

        let mut fwd = [forward[0].start, forward[0].end];
        let mut rev = [reversed[0].start, reversed[0].end];
        fwd.sort_by(|a, b| a.x.total_cmp(&b.x));
        rev.sort_by(|a, b| a.x.total_cmp(&b.x));
        assert!((fwd[0] - rev[0]).norm() < 1e-3 && (fwd[1] - rev[1]).norm() < 1e-3);
    }

    #[test]
    fn coplanar_triangle_is_dropped() {
        let mesh = test_mesh::single_triangle(
            Pos::new(0.0, 0.0, 1.0),
            Pos::new(2.0, 0.0, 1.0),
            Pos::new(0.0, 2.0, 1.0),
        );
        assert!(intersect_plane(&mesh, 1.0, &projection()).is_empty());
    }

    #[test]
    fn degenerate_triangle_is_tolerated() {
        let mesh = test_mesh::single_triangle(
            Pos::new(0.0, 0.0, 0.0),
            Pos::new(0.0, 0.0, 2.0),
            Pos::new(0.0, 0.0, 2.0),
        );
        assert!(intersect_plane(&mesh, 1.0, &projection()).is_empty());
    }

    #[test]
    fn cube_cross_section_yields_side_segments() {
        let mesh = test_mesh::cube(10.0);
        // Four side faces of two triangles each cross the mid plane.
        let segments = intersect_plane(&mesh, 5.0, &projection());
        assert_eq!(segments.len(), 8);
    }
}
