pub mod mesh;
pub mod pipeline;
pub mod shaders;
pub mod source;

pub use mesh::QuadMesh;
pub use pipeline::{ProgramOrigin, RenderPipeline};
pub use shaders::{GlApi, ShaderApi, ShaderProgram, ShaderStage};
pub use source::{parse_shader, parse_shader_str, ShaderProgramSource};
