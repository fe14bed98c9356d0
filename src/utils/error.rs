use std::ffi::NulError;
use thiserror::Error;

use crate::render::shaders::ShaderStage;

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("Failed to create {0} object")]
    Creation(&'static str),

    #[error("Failed to compile {stage} shader: {log}")]
    Compilation { stage: ShaderStage, log: String },

    #[error("Program linking failed: {0}")]
    Linking(String),

    #[error("Null byte in shader source: {0}")]
    Nul(#[from] NulError),
}

/// Failures while bringing up the window and GL context.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Event loop error: {0}")]
    EventLoop(String),

    #[error("Failed to create window: {0}")]
    Display(String),

    #[error("Failed to create OpenGL context: {0}")]
    Context(String),

    #[error("Failed to create GL surface: {0}")]
    Surface(String),
}
