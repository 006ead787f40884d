//! Draw commands emitted by the simulation
//!
//! The simulation never talks to the GPU directly. It describes a frame as a
//! stream of commands handed to a [`RenderSink`].

use glam::Vec2;

/// One primitive to paint
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    /// Filled regular polygon
    Polygon {
        center: Vec2,
        radius: f32,
        sides: u32,
        /// Rotation in radians
        rotation: f32,
        colour: [f32; 4],
    },
    /// Line segment between two points
    Line {
        from: Vec2,
        to: Vec2,
        colour: [f32; 4],
    },
}

/// Anything that can consume draw commands
pub trait RenderSink {
    fn draw(&mut self, command: DrawCommand);
}

/// Recording sink, handy for tests and headless runs
impl RenderSink for Vec<DrawCommand> {
    fn draw(&mut self, command: DrawCommand) {
        self.push(command);
    }
}
