//! Flat-colored primitive geometry.
//!
//! Backends receive a [`Shape`] in logical pixels. The GPU backend asks for a
//! [`Mesh`] and uploads it; the canvas backend maps each variant onto path calls.

use crate::coords::{Rect, Vec2};

/// Fixed circle tessellation.
pub const CIRCLE_SEGMENTS: usize = 32;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Shape {
    Line { from: Vec2, to: Vec2 },
    Triangle { a: Vec2, b: Vec2, c: Vec2 },
    Rect(Rect),
    RectOutline(Rect),
    Circle { center: Vec2, radius: f32 },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Topology {
    LineList,
    LineStrip,
    TriangleList,
    /// First point is the hub.
    TriangleFan,
}

/// Points plus how to connect them. `indices` is empty for non-indexed draws.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub topology: Topology,
    pub points: Vec<Vec2>,
    pub indices: Vec<u32>,
}

impl Shape {
    pub fn is_finite(&self) -> bool {
        match *self {
            Shape::Line { from, to } => from.is_finite() && to.is_finite(),
            Shape::Triangle { a, b, c } => a.is_finite() && b.is_finite() && c.is_finite(),
            Shape::Rect(r) | Shape::RectOutline(r) => r.is_finite(),
            Shape::Circle { center, radius } => center.is_finite() && radius.is_finite(),
        }
    }

    pub fn mesh(&self) -> Mesh {
        match *self {
            Shape::Line { from, to } => Mesh {
                topology: Topology::LineList,
                points: vec![from, to],
                indices: Vec::new(),
            },
            Shape::Triangle { a, b, c } => Mesh {
                topology: Topology::TriangleList,
                points: vec![a, b, c],
                indices: Vec::new(),
            },
            Shape::Rect(r) => Mesh {
                topology: Topology::TriangleList,
                points: r.corners().to_vec(),
                indices: vec![0, 1, 2, 2, 3, 0],
            },
            Shape::RectOutline(r) => {
                let [tl, tr, br, bl] = r.corners();
                Mesh {
                    topology: Topology::LineStrip,
                    points: vec![tl, tr, br, bl, tl],
                    indices: Vec::new(),
                }
            }
            Shape::Circle { center, radius } => Mesh {
                topology: Topology::TriangleFan,
                points: circle_fan(center, radius),
                indices: Vec::new(),
            },
        }
    }
}

/// Hub followed by `CIRCLE_SEGMENTS + 1` ring points; the last closes the ring.
fn circle_fan(center: Vec2, radius: f32) -> Vec<Vec2> {
    let mut points = Vec::with_capacity(CIRCLE_SEGMENTS + 2);
    points.push(center);
    for i in 0..=CIRCLE_SEGMENTS {
        let angle = i as f32 * core::f32::consts::TAU / CIRCLE_SEGMENTS as f32;
        points.push(Vec2::new(
            center.x + radius * angle.cos(),
            center.y + radius * angle.sin(),
        ));
    }
    points
}

impl Mesh {
    /// Expands strips and fans into a plain list for pipelines that only take
    /// `LineList`/`TriangleList`. Returns `(topology, vertex order)`.
    pub fn flattened(&self) -> (Topology, Vec<Vec2>) {
        match self.topology {
            Topology::LineList => (Topology::LineList, self.points.clone()),
            Topology::LineStrip => {
                let list = self
                    .points
                    .windows(2)
                    .flat_map(|w| [w[0], w[1]])
                    .collect();
                (Topology::LineList, list)
            }
            Topology::TriangleList if self.indices.is_empty() => {
                (Topology::TriangleList, self.points.clone())
            }
            Topology::TriangleList => {
                let list = self
                    .indices
                    .iter()
                    .filter_map(|&i| self.points.get(i as usize).copied())
                    .collect();
                (Topology::TriangleList, list)
            }
            Topology::TriangleFan => {
                let Some((&hub, ring)) = self.points.split_first() else {
                    return (Topology::TriangleList, Vec::new());
                };
                let list = ring.windows(2).flat_map(|w| [hub, w[0], w[1]]).collect();
                (Topology::TriangleList, list)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_uses_shared_corner_order_and_indices() {
        let m = Shape::Rect(Rect::new(0.0, 0.0, 10.0, 5.0)).mesh();
        assert_eq!(m.topology, Topology::TriangleList);
        assert_eq!(m.points, Rect::new(0.0, 0.0, 10.0, 5.0).corners().to_vec());
        assert_eq!(m.indices, vec![0, 1, 2, 2, 3, 0]);
    }

    #[test]
    fn outline_is_closed_five_point_strip() {
        let m = Shape::RectOutline(Rect::new(1.0, 2.0, 3.0, 4.0)).mesh();
        assert_eq!(m.topology, Topology::LineStrip);
        assert_eq!(m.points.len(), 5);
        assert_eq!(m.points.first(), m.points.last());
    }

    #[test]
    fn circle_fan_has_hub_and_closed_ring() {
        let center = Vec2::new(50.0, 50.0);
        let m = Shape::Circle { center, radius: 10.0 }.mesh();
        assert_eq!(m.topology, Topology::TriangleFan);
        assert_eq!(m.points.len(), CIRCLE_SEGMENTS + 2);
        assert_eq!(m.points[0], center);
        assert!(m.points[1].distance(m.points[CIRCLE_SEGMENTS + 1]) < 1e-4);
        for p in &m.points[1..] {
            assert!((p.distance(center) - 10.0).abs() < 1e-4);
        }
    }

    #[test]
    fn fan_flattens_to_one_triangle_per_segment() {
        let m = Shape::Circle { center: Vec2::zero(), radius: 1.0 }.mesh();
        let (topology, list) = m.flattened();
        assert_eq!(topology, Topology::TriangleList);
        assert_eq!(list.len(), CIRCLE_SEGMENTS * 3);
        assert!(list.chunks(3).all(|t| t[0] == Vec2::zero()));
    }

    #[test]
    fn strip_flattens_to_segment_pairs() {
        let m = Shape::RectOutline(Rect::new(0.0, 0.0, 1.0, 1.0)).mesh();
        let (topology, list) = m.flattened();
        assert_eq!(topology, Topology::LineList);
        assert_eq!(list.len(), 8);
    }

    #[test]
    fn indexed_rect_flattens_to_six_vertices() {
        let (_, list) = Shape::Rect(Rect::new(0.0, 0.0, 2.0, 2.0)).mesh().flattened();
        assert_eq!(list.len(), 6);
        assert_eq!(list[0], list[5]);
    }

    #[test]
    fn nan_shapes_are_not_finite() {
        assert!(!Shape::Circle { center: Vec2::zero(), radius: f32::NAN }.is_finite());
        assert!(Shape::Line { from: Vec2::zero(), to: Vec2::new(1.0, 1.0) }.is_finite());
    }
}
