//! Triangle tessellation for draw commands

use glam::Vec2;
use std::f32::consts::TAU;

use super::commands::{DrawCommand, RenderSink};
use super::vertex::Vertex;

/// Width of merge preview lines in pixels
pub const LINE_WIDTH: f32 = 1.5;

/// Corner `i` of a regular polygon, matching the sketch's (sin, cos) layout
#[inline]
pub fn polygon_vertex(center: Vec2, radius: f32, sides: u32, rotation: f32, i: u32) -> Vec2 {
    let angle = TAU * i as f32 / sides as f32 + rotation;
    center + Vec2::new(radius * angle.sin(), radius * angle.cos())
}

/// Generate vertices for a filled regular polygon (triangle fan from the centre)
pub fn polygon(center: Vec2, radius: f32, sides: u32, rotation: f32, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((sides * 3) as usize);

    for i in 0..sides {
        let a = polygon_vertex(center, radius, sides, rotation, i);
        let b = polygon_vertex(center, radius, sides, rotation, (i + 1) % sides);

        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(a.x, a.y, color));
        vertices.push(Vertex::new(b.x, b.y, color));
    }

    vertices
}

/// Generate vertices for a line segment as a thin quad
pub fn line(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    let v1a = from + perp;
    let v1b = from - perp;
    let v2a = to + perp;
    let v2b = to - perp;

    vec![
        Vertex::new(v1a.x, v1a.y, color),
        Vertex::new(v1b.x, v1b.y, color),
        Vertex::new(v2a.x, v2a.y, color),
        Vertex::new(v2a.x, v2a.y, color),
        Vertex::new(v1b.x, v1b.y, color),
        Vertex::new(v2b.x, v2b.y, color),
    ]
}

/// Render sink that tessellates commands into a pixel-space triangle list
#[derive(Debug, Default)]
pub struct VertexSink {
    pub vertices: Vec<Vertex>,
}

impl VertexSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }
}

impl RenderSink for VertexSink {
    fn draw(&mut self, command: DrawCommand) {
        match command {
            DrawCommand::Polygon {
                center,
                radius,
                sides,
                rotation,
                colour,
            } => self
                .vertices
                .extend(polygon(center, radius, sides, rotation, colour)),
            DrawCommand::Line { from, to, colour } => {
                self.vertices.extend(line(from, to, LINE_WIDTH, colour))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0; 4];

    #[test]
    fn test_polygon_has_one_triangle_per_side() {
        let v = polygon(Vec2::ZERO, 10.0, 5, 0.0, WHITE);
        assert_eq!(v.len(), 15);
    }

    #[test]
    fn test_unrotated_first_corner_points_down_y() {
        let p = polygon_vertex(Vec2::new(100.0, 100.0), 10.0, 4, 0.0, 0);
        assert!((p - Vec2::new(100.0, 110.0)).length() < 1e-4);
    }

    #[test]
    fn test_corners_sit_on_radius() {
        let center = Vec2::new(-3.0, 8.0);
        for i in 0..6 {
            let p = polygon_vertex(center, 25.0, 6, 1.3, i);
            assert!((p.distance(center) - 25.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_degenerate_line_is_skipped() {
        assert!(line(Vec2::ONE, Vec2::ONE, 2.0, WHITE).is_empty());
        assert_eq!(line(Vec2::ZERO, Vec2::X, 2.0, WHITE).len(), 6);
    }

    #[test]
    fn test_vertex_sink_tessellates_commands() {
        let mut sink = VertexSink::new();
        sink.draw(DrawCommand::Polygon {
            center: Vec2::ZERO,
            radius: 10.0,
            sides: 3,
            rotation: 0.0,
            colour: WHITE,
        });
        sink.draw(DrawCommand::Line {
            from: Vec2::ZERO,
            to: Vec2::new(0.0, 5.0),
            colour: WHITE,
        });
        assert_eq!(sink.vertices.len(), 9 + 6);
        sink.clear();
        assert!(sink.vertices.is_empty());
    }
}
