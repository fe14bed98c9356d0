// shaders.rs - Shader compilation and program linking

use gl::types::*;
use log::{debug, error, info};
use std::ffi::{CStr, CString};
use std::fmt;
use std::ptr;

use crate::render::source::ShaderProgramSource;
use crate::utils::error::ShaderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn gl_enum(self) -> GLenum {
        match self {
            Self::Vertex => gl::VERTEX_SHADER,
            Self::Fragment => gl::FRAGMENT_SHADER,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The slice of the graphics API needed to build shader programs.
///
/// Object ids follow GL conventions: `0` from a `create_*` call means the
/// driver could not allocate the object.
pub trait ShaderApi {
    fn create_shader(&self, stage: ShaderStage) -> GLuint;
    fn shader_source(&self, shader: GLuint, source: &CStr);
    fn compile_shader(&self, shader: GLuint);
    fn shader_compile_status(&self, shader: GLuint) -> bool;
    fn shader_info_log(&self, shader: GLuint) -> String;
    fn delete_shader(&self, shader: GLuint);

    fn create_program(&self) -> GLuint;
    fn attach_shader(&self, program: GLuint, shader: GLuint);
    fn detach_shader(&self, program: GLuint, shader: GLuint);
    fn link_program(&self, program: GLuint);
    fn program_link_status(&self, program: GLuint) -> bool;
    fn program_info_log(&self, program: GLuint) -> String;
    fn delete_program(&self, program: GLuint);
    fn use_program(&self, program: GLuint);
}

/// [`ShaderApi`] over the global `gl` bindings.
///
/// Only valid once `gl::load_with` has run and a context is current on the
/// calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlApi;

impl ShaderApi for GlApi {
    fn create_shader(&self, stage: ShaderStage) -> GLuint {
        unsafe { gl::CreateShader(stage.gl_enum()) }
    }

    fn shader_source(&self, shader: GLuint, source: &CStr) {
        unsafe {
            gl::ShaderSource(shader, 1, &source.as_ptr(), ptr::null());
        }
    }

    fn compile_shader(&self, shader: GLuint) {
        unsafe { gl::CompileShader(shader) };
    }

    fn shader_compile_status(&self, shader: GLuint) -> bool {
        let mut success = gl::FALSE as GLint;
        unsafe {
            gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut success);
        }
        success == gl::TRUE as GLint
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        let mut len = 0;
        unsafe {
            gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len);
        }

        let mut buffer = log_buffer(len);
        let mut written: GLsizei = 0;
        unsafe {
            gl::GetShaderInfoLog(
                shader,
                len,
                &mut written,
                buffer.as_mut_ptr() as *mut GLchar,
            );
        }
        log_to_string(buffer, written)
    }

    fn delete_shader(&self, shader: GLuint) {
        unsafe { gl::DeleteShader(shader) };
    }

    fn create_program(&self) -> GLuint {
        unsafe { gl::CreateProgram() }
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { gl::AttachShader(program, shader) };
    }

    fn detach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { gl::DetachShader(program, shader) };
    }

    fn link_program(&self, program: GLuint) {
        unsafe { gl::LinkProgram(program) };
    }

    fn program_link_status(&self, program: GLuint) -> bool {
        let mut success = gl::FALSE as GLint;
        unsafe {
            gl::GetProgramiv(program, gl::LINK_STATUS, &mut success);
        }
        success == gl::TRUE as GLint
    }

    fn program_info_log(&self, program: GLuint) -> String {
        let mut len = 0;
        unsafe {
            gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len);
        }

        let mut buffer = log_buffer(len);
        let mut written: GLsizei = 0;
        unsafe {
            gl::GetProgramInfoLog(
                program,
                len,
                &mut written,
                buffer.as_mut_ptr() as *mut GLchar,
            );
        }
        log_to_string(buffer, written)
    }

    fn delete_program(&self, program: GLuint) {
        unsafe { gl::DeleteProgram(program) };
    }

    fn use_program(&self, program: GLuint) {
        unsafe { gl::UseProgram(program) };
    }
}

// INFO_LOG_LENGTH includes the terminating NUL.
fn log_buffer(len: GLint) -> Vec<u8> {
    vec![0u8; len.max(0) as usize]
}

fn log_to_string(mut buffer: Vec<u8>, written: GLsizei) -> String {
    buffer.truncate(written.max(0) as usize);
    String::from_utf8_lossy(&buffer).trim_end().to_string()
}

/// A compiled shader stage. The stage object is deleted when this drops.
pub struct CompiledShader<'a, A: ShaderApi> {
    api: &'a A,
    id: GLuint,
    stage: ShaderStage,
}

impl<'a, A: ShaderApi> CompiledShader<'a, A> {
    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }
}

impl<A: ShaderApi> Drop for CompiledShader<'_, A> {
    fn drop(&mut self) {
        self.api.delete_shader(self.id);
    }
}

pub fn compile_shader<'a, A: ShaderApi>(
    api: &'a A,
    stage: ShaderStage,
    source: &str,
) -> Result<CompiledShader<'a, A>, ShaderError> {
    let source = CString::new(source)?;

    let id = api.create_shader(stage);
    if id == 0 {
        return Err(ShaderError::Creation(stage.name()));
    }
    let shader = CompiledShader { api, id, stage };

    api.shader_source(id, &source);
    api.compile_shader(id);

    if !api.shader_compile_status(id) {
        let log = api.shader_info_log(id);
        error!("Failed to compile {} shader: {}", stage, log);
        return Err(ShaderError::Compilation { stage, log });
    }

    debug!("Compiled {} shader {}", stage, id);
    Ok(shader)
}

/// A linked shader program. The program object is deleted when this drops.
pub struct ShaderProgram<A: ShaderApi = GlApi> {
    api: A,
    id: GLuint,
}

impl<A: ShaderApi + Clone> ShaderProgram<A> {
    /// Compiles both stages and links them.
    ///
    /// A stage that fails to compile stops the build before linking. The stage
    /// objects never outlive this call, whether linking succeeds or not.
    pub fn new(api: &A, vertex_source: &str, fragment_source: &str) -> Result<Self, ShaderError> {
        let vertex = compile_shader(api, ShaderStage::Vertex, vertex_source)?;
        let fragment = compile_shader(api, ShaderStage::Fragment, fragment_source)?;

        let id = api.create_program();
        if id == 0 {
            return Err(ShaderError::Creation("program"));
        }
        let program = ShaderProgram {
            api: api.clone(),
            id,
        };

        api.attach_shader(id, vertex.id());
        api.attach_shader(id, fragment.id());
        api.link_program(id);
        let linked = api.program_link_status(id);
        api.detach_shader(id, vertex.id());
        api.detach_shader(id, fragment.id());

        if !linked {
            let log = api.program_info_log(id);
            error!("Failed to link shader program: {}", log);
            return Err(ShaderError::Linking(log));
        }

        info!("Linked shader program {}", id);
        Ok(program)
    }

    pub fn from_source(api: &A, source: &ShaderProgramSource) -> Result<Self, ShaderError> {
        Self::new(api, &source.vertex_source, &source.fragment_source)
    }
}

impl<A: ShaderApi> ShaderProgram<A> {
    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn bind(&self) {
        self.api.use_program(self.id);
    }
}

impl<A: ShaderApi> Drop for ShaderProgram<A> {
    fn drop(&mut self) {
        self.api.delete_program(self.id);
    }
}

/// Built-in shader pair for the quad: position passthrough and solid yellow.
pub mod quad_shaders {
    pub const VERTEX_SRC: &str = r#"#version 330 core
layout (location = 0) in vec3 aPos;
void main()
{
    gl_Position = vec4(aPos.x, aPos.y, aPos.z, 1.0);
}
"#;

    pub const FRAGMENT_SRC: &str = r#"#version 330 core
out vec4 FragColor;
void main()
{
    FragColor = vec4(1.0f, 1.0f, 0.0f, 1.0f);
}
"#;
}
