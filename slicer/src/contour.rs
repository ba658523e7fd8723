use nalgebra::Vector2;

use crate::segments::Segment;

/// Maximum endpoint distance, in pixels, for two segments to be stitched
/// into the same contour.
pub const CONNECT_TOLERANCE: f32 = 0.5;

/// A closed polygon in pixel space. The last point connects implicitly
/// back to the first, there is no duplicated closing point. `hole` records
/// the winding orientation; the even-odd fill does not consult it.
#[derive(Clone, Debug)]
pub struct Contour {
    pub points: Vec<Vector2<f32>>,
    pub hole: bool,
}

/// Stitches an unordered segment set into closed contours. Segments are
/// consumed greedily in insertion order, the first endpoint within
/// tolerance of the contour's open end wins. Fragments that end up with
/// fewer than three points are discarded.
pub fn assemble(segments: Vec<Segment>) -> Vec<Contour> {
    let mut used = vec![false; segments.len()];
    let mut contours = Vec::new();

    for seed in 0..segments.len() {
        if used[seed] {
            continue;
        }
        used[seed] = true;

        let mut points = vec![segments[seed].start, segments[seed].end];
        loop {
            let last = points[points.len() - 1];
            let next = segments
                .iter()
                .enumerate()
                .find(|(i, s)| !used[*i] && (connects(s.start, last) || connects(s.end, last)));

            let Some((index, segment)) = next else {
                break;
            };

            used[index] = true;
            points.push(if connects(segment.start, last) {
                segment.end
            } else {
                segment.start
            });
        }

        // The stitch walked all the way around, drop the duplicate.
        if points.len() > 1 && connects(points[points.len() - 1], points[0]) {
            points.pop();
        }

        if points.len() >= 3 {
            let hole = signed_area(&points) < 0.0;
            contours.push(Contour { points, hole });
        }
    }

    contours
}

fn connects(a: Vector2<f32>, b: Vector2<f32>) -> bool {
    (a - b).norm() <= CONNECT_TOLERANCE
}

/// Shoelace sum. The sign distinguishes winding direction in image
/// coordinates.
fn signed_area(points: &[Vector2<f32>]) -> f32 {
    let mut area = 0.0;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        area += a.x * b.y - b.x * a.y;
    }
    area / 2.0
}
