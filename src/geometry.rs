//! Pure geometry builders for the draw primitives.
//!
//! Each builder turns a compact description (center + radius, two corners)
//! into a flat vertex list ready for batching; the caller decides the
//! primitive kind it is pushed under.

use crate::vertex::Vertex;

/// Meridian/parallel count of the wire sphere.
pub(crate) const SPHERE_SEGMENTS: usize = 20;

/// Solid axis-aligned cube spanning `[center - radius, center + radius]`,
/// as a 12-triangle / 36-vertex triangle list.
pub(crate) fn cube(center: [f32; 3], radius: f32, color: u32) -> [Vertex; 36] {
    let [cx, cy, cz] = center;
    let (x0, y0, z0) = (cx - radius, cy - radius, cz - radius);
    let (x1, y1, z1) = (cx + radius, cy + radius, cz + radius);
    let v = |x, y, z| Vertex::new([x, y, z], color);
    [
        // Front (+z)
        v(x0, y0, z1),
        v(x1, y0, z1),
        v(x1, y1, z1),
        v(x0, y0, z1),
        v(x1, y1, z1),
        v(x0, y1, z1),
        // Back (-z)
        v(x0, y0, z0),
        v(x0, y1, z0),
        v(x1, y1, z0),
        v(x0, y0, z0),
        v(x1, y1, z0),
        v(x1, y0, z0),
        // Left (-x)
        v(x0, y0, z0),
        v(x0, y0, z1),
        v(x0, y1, z1),
        v(x0, y0, z0),
        v(x0, y1, z1),
        v(x0, y1, z0),
        // Right (+x)
        v(x1, y0, z0),
        v(x1, y1, z0),
        v(x1, y1, z1),
        v(x1, y0, z0),
        v(x1, y1, z1),
        v(x1, y0, z1),
        // Top (+y)
        v(x0, y1, z0),
        v(x0, y1, z1),
        v(x1, y1, z1),
        v(x0, y1, z0),
        v(x1, y1, z1),
        v(x1, y1, z0),
        // Bottom (-y)
        v(x0, y0, z0),
        v(x1, y0, z0),
        v(x1, y0, z1),
        v(x0, y0, z0),
        v(x1, y0, z1),
        v(x0, y0, z1),
    ]
}

/// Wireframe axis-aligned box between two opposite corners, as a
/// 12-edge / 24-vertex line list. Corners are used as-is; callers own
/// min/max ordering.
pub(crate) fn box_edges(a: [f32; 3], b: [f32; 3], color: u32) -> [Vertex; 24] {
    let [ax, ay, az] = a;
    let [bx, by, bz] = b;
    let v = |x, y, z| Vertex::new([x, y, z], color);
    [
        // Bottom rectangle
        v(ax, ay, az),
        v(bx, ay, az),
        v(bx, ay, az),
        v(bx, ay, bz),
        v(bx, ay, bz),
        v(ax, ay, bz),
        v(ax, ay, bz),
        v(ax, ay, az),
        // Top rectangle
        v(ax, by, az),
        v(bx, by, az),
        v(bx, by, az),
        v(bx, by, bz),
        v(bx, by, bz),
        v(ax, by, bz),
        v(ax, by, bz),
        v(ax, by, az),
        // Vertical edges
        v(ax, ay, az),
        v(ax, by, az),
        v(bx, ay, az),
        v(bx, by, az),
        v(bx, ay, bz),
        v(bx, by, bz),
        v(ax, ay, bz),
        v(ax, by, bz),
    ]
}

/// A single line segment.
pub(crate) fn line(start: [f32; 3], end: [f32; 3], color: u32) -> [Vertex; 2] {
    [Vertex::new(start, color), Vertex::new(end, color)]
}

/// Endpoint pairs of a closed lat/long wire sphere.
///
/// Builds a `SPHERE_SEGMENTS × SPHERE_SEGMENTS` grid over
/// `φ ∈ [0, π], θ ∈ [0, 2π]`, then connects it: vertical lines between
/// consecutive rings, horizontal lines within each ring except the last.
/// The final meridian coincides with the first (θ wraps), closing the
/// sphere.
pub(crate) fn sphere_outline(center: [f32; 3], radius: f32) -> Vec<([f32; 3], [f32; 3])> {
    let n = SPHERE_SEGMENTS;
    let mut grid = Vec::with_capacity(n * n);
    for i in 0..n {
        let phi = i as f32 / (n - 1) as f32 * std::f32::consts::PI;
        for j in 0..n {
            let theta = j as f32 / (n - 1) as f32 * 2.0 * std::f32::consts::PI;
            grid.push([
                center[0] + radius * phi.sin() * theta.cos(),
                center[1] + radius * phi.sin() * theta.sin(),
                center[2] + radius * phi.cos(),
            ]);
        }
    }
    let mut lines = Vec::with_capacity((n - 1) * n + (n - 1) * (n - 1));
    for i in 0..n - 1 {
        for j in 0..n {
            lines.push((grid[i * n + j], grid[(i + 1) * n + j]));
        }
    }
    for i in 0..n - 1 {
        for j in 0..n - 1 {
            lines.push((grid[i * n + j], grid[i * n + j + 1]));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_spans_center_plus_minus_radius() {
        let vertices = cube([1.0, 2.0, 3.0], 0.5, 0xFF00_00FF);
        assert_eq!(vertices.len(), 36);
        for vertex in &vertices {
            assert_eq!(vertex.color, 0xFF00_00FF);
            assert!((vertex.position[0] - 1.0).abs() == 0.5);
            assert!((vertex.position[1] - 2.0).abs() == 0.5);
            assert!((vertex.position[2] - 3.0).abs() == 0.5);
        }
    }

    #[test]
    fn test_box_corners_used_verbatim() {
        // Deliberately unordered corners: the builder must not normalize.
        let a = [5.0, 0.0, 2.0];
        let b = [1.0, 3.0, -2.0];
        let vertices = box_edges(a, b, 0xFFFF_FFFF);
        assert_eq!(vertices.len(), 24);
        assert_eq!(vertices[0].position, a);
        assert_eq!(vertices[1].position, [b[0], a[1], a[2]]);
        // Every x is one of the two inputs, never a min/max blend.
        for vertex in &vertices {
            assert!(vertex.position[0] == a[0] || vertex.position[0] == b[0]);
        }
    }

    #[test]
    fn test_line_is_two_vertices() {
        let vertices = line([0.0; 3], [1.0, 2.0, 3.0], 7);
        assert_eq!(vertices[0].position, [0.0; 3]);
        assert_eq!(vertices[1].position, [1.0, 2.0, 3.0]);
        assert_eq!(vertices[0].color, 7);
    }

    #[test]
    fn test_sphere_line_count() {
        let n = SPHERE_SEGMENTS;
        let lines = sphere_outline([0.0; 3], 1.0);
        assert_eq!(lines.len(), (n - 1) * n + (n - 1) * (n - 1));
    }

    #[test]
    fn test_sphere_points_lie_on_the_sphere() {
        let center = [1.0, -2.0, 0.5];
        let radius = 3.0;
        for (start, end) in sphere_outline(center, radius) {
            for point in [start, end] {
                let distance = ((point[0] - center[0]).powi(2)
                    + (point[1] - center[1]).powi(2)
                    + (point[2] - center[2]).powi(2))
                .sqrt();
                assert!((distance - radius).abs() < 1e-4);
            }
        }
    }
}
