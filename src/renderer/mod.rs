//! Rendering module
//!
//! The simulation emits [`DrawCommand`]s into a [`RenderSink`]; the WebGPU
//! backend tessellates them with [`VertexSink`] and draws triangle lists.

pub mod commands;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use commands::{DrawCommand, RenderSink};
pub use pipeline::RenderState;
pub use shapes::VertexSink;
pub use vertex::Vertex;
