pub mod config;
pub mod display;
pub mod input;
pub mod render;
pub mod utils;

// Re-export commonly used types
pub use config::core::AppConfig;
pub use config::rendering::RenderConfig;
pub use config::window::WindowConfig;
pub use input::InputAction;
pub use render::pipeline::RenderPipeline;
pub use render::shaders::{GlApi, ShaderApi, ShaderProgram, ShaderStage};
pub use render::source::{parse_shader, parse_shader_str, ShaderProgramSource};
pub use utils::error::{AppError, ShaderError};
