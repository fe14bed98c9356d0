use log::{error, info, warn};
use std::path::Path;

use crate::config::RenderConfig;
use crate::render::mesh::QuadMesh;
use crate::render::shaders::{quad_shaders, GlApi, ShaderApi, ShaderProgram};
use crate::render::source::parse_shader;
use crate::utils::error::ShaderError;

/// Which shader the quad ends up drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramOrigin {
    File,
    Embedded,
}

/// Builds the program from the shader file and the built-in pair, preferring the file.
///
/// Both are always compiled so a broken file still leaves something to draw with.
pub fn build_programs<A: ShaderApi + Clone>(
    api: &A,
    shader_path: &Path,
) -> Option<(ShaderProgram<A>, ProgramOrigin)> {
    let source = parse_shader(shader_path);
    let from_file = ShaderProgram::from_source(api, &source);
    let embedded = ShaderProgram::new(api, quad_shaders::VERTEX_SRC, quad_shaders::FRAGMENT_SRC);
    select_program(from_file, embedded)
}

pub fn select_program<A: ShaderApi>(
    from_file: Result<ShaderProgram<A>, ShaderError>,
    embedded: Result<ShaderProgram<A>, ShaderError>,
) -> Option<(ShaderProgram<A>, ProgramOrigin)> {
    match (from_file, embedded) {
        (Ok(program), _) => {
            info!("Using shader program {} from file", program.id());
            Some((program, ProgramOrigin::File))
        }
        (Err(file_err), Ok(program)) => {
            warn!(
                "Shader file unusable ({}), falling back to built-in program {}",
                file_err,
                program.id()
            );
            Some((program, ProgramOrigin::Embedded))
        }
        (Err(file_err), Err(embedded_err)) => {
            error!("No usable shader program: file: {}; built-in: {}", file_err, embedded_err);
            None
        }
    }
}

/// Everything needed to draw a frame. Must be dropped while the context is current.
pub struct RenderPipeline {
    clear_color: [f32; 4],
    mesh: QuadMesh,
    program: Option<(ShaderProgram<GlApi>, ProgramOrigin)>,
}

impl RenderPipeline {
    pub fn new(config: &RenderConfig, shader_path: &Path) -> Self {
        let program = build_programs(&GlApi, shader_path);
        let mesh = QuadMesh::upload();
        Self {
            clear_color: config.clear_color,
            mesh,
            program,
        }
    }

    pub fn origin(&self) -> Option<ProgramOrigin> {
        self.program.as_ref().map(|(_, origin)| *origin)
    }

    pub fn resize(&self, width: u32, height: u32) {
        unsafe {
            gl::Viewport(0, 0, width as i32, height as i32);
        }
    }

    pub fn render(&self) {
        let [r, g, b, a] = self.clear_color;
        unsafe {
            gl::ClearColor(r, g, b, a);
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }

        if let Some((program, _)) = &self.program {
            program.bind();
            self.mesh.draw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::shaders::tests::FakeGl;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_file_program_preferred() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Basic.shader");
        fs::write(
            &path,
            format!(
                "#shader vertex\n{}#shader fragment\n{}",
                quad_shaders::VERTEX_SRC,
                quad_shaders::FRAGMENT_SRC
            ),
        )
        .unwrap();

        let api = FakeGl::default();
        let (program, origin) = build_programs(&api, &path).unwrap();
        assert_eq!(origin, ProgramOrigin::File);

        // The unused built-in program is released straight away.
        assert_eq!(api.live_programs(), 1);
        assert_eq!(api.live_shaders(), 0);
        drop(program);
        assert_eq!(api.live_programs(), 0);
    }

    #[test]
    fn test_missing_file_falls_back_to_builtin() {
        let dir = tempdir().unwrap();
        let api = FakeGl::default();

        let (_program, origin) = build_programs(&api, &dir.path().join("nope.shader")).unwrap();
        assert_eq!(origin, ProgramOrigin::Embedded);
        assert_eq!(api.live_programs(), 1);
    }

    #[test]
    fn test_both_failing_gives_none() {
        let api = FakeGl::default();
        api.state.borrow_mut().fail_link = true;

        let dir = tempdir().unwrap();
        assert!(build_programs(&api, &dir.path().join("nope.shader")).is_none());
        assert_eq!(api.live_programs(), 0);
        assert_eq!(api.live_shaders(), 0);
    }
}
