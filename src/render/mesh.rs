use gl::types::*;
use std::mem;
use std::ptr;

/// Corner positions of the quad, three floats each.
pub const QUAD_VERTICES: [f32; 12] = [
    0.5, 0.5, 0.0, // top right
    0.5, -0.5, 0.0, // bottom right
    -0.5, -0.5, 0.0, // bottom left
    -0.5, 0.5, 0.0, // top left
];

/// Two clockwise triangles sharing the 1-3 diagonal.
pub const QUAD_INDICES: [u32; 6] = [
    0, 1, 3, // first triangle
    1, 2, 3, // second triangle
];

pub const FLOATS_PER_VERTEX: usize = 3;

/// The quad uploaded to the GPU. Owns its VAO, VBO and EBO.
pub struct QuadMesh {
    vao: GLuint,
    vbo: GLuint,
    ebo: GLuint,
    index_count: GLsizei,
}

impl QuadMesh {
    /// Uploads [`QUAD_VERTICES`] and [`QUAD_INDICES`]. Requires a current GL context.
    pub fn upload() -> Self {
        let vertex_bytes: &[u8] = bytemuck::cast_slice(&QUAD_VERTICES);
        let index_bytes: &[u8] = bytemuck::cast_slice(&QUAD_INDICES);

        let mut vao = 0;
        let mut vbo = 0;
        let mut ebo = 0;
        unsafe {
            gl::GenVertexArrays(1, &mut vao);
            gl::GenBuffers(1, &mut vbo);
            gl::GenBuffers(1, &mut ebo);

            gl::BindVertexArray(vao);

            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);
            gl::BufferData(
                gl::ARRAY_BUFFER,
                vertex_bytes.len() as GLsizeiptr,
                vertex_bytes.as_ptr() as *const _,
                gl::STATIC_DRAW,
            );

            gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, ebo);
            gl::BufferData(
                gl::ELEMENT_ARRAY_BUFFER,
                index_bytes.len() as GLsizeiptr,
                index_bytes.as_ptr() as *const _,
                gl::STATIC_DRAW,
            );

            // Position attribute
            gl::VertexAttribPointer(
                0,
                FLOATS_PER_VERTEX as GLint,
                gl::FLOAT,
                gl::FALSE,
                stride(),
                ptr::null(),
            );
            gl::EnableVertexAttribArray(0);

            // The EBO binding lives in the VAO, so only the array buffer is unbound.
            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
            gl::BindVertexArray(0);
        }

        log::debug!("Uploaded quad mesh (vao {}, vbo {}, ebo {})", vao, vbo, ebo);

        Self {
            vao,
            vbo,
            ebo,
            index_count: QUAD_INDICES.len() as GLsizei,
        }
    }

    pub fn draw(&self) {
        unsafe {
            gl::BindVertexArray(self.vao);
            gl::DrawElements(
                gl::TRIANGLES,
                self.index_count,
                gl::UNSIGNED_INT,
                ptr::null(),
            );
        }
    }
}

impl Drop for QuadMesh {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteVertexArrays(1, &self.vao);
            gl::DeleteBuffers(1, &self.vbo);
            gl::DeleteBuffers(1, &self.ebo);
        }
    }
}

fn stride() -> GLsizei {
    (FLOATS_PER_VERTEX * mem::size_of::<f32>()) as GLsizei
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_reference_existing_vertices() {
        let vertex_count = QUAD_VERTICES.len() / FLOATS_PER_VERTEX;
        assert_eq!(vertex_count, 4);
        assert!(QUAD_INDICES.iter().all(|&i| (i as usize) < vertex_count));
    }

    #[test]
    fn test_triangles_cover_every_corner() {
        let mut seen = [false; 4];
        for &i in &QUAD_INDICES {
            seen[i as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
        assert_eq!(QUAD_INDICES.len() % 3, 0);
    }

    #[test]
    fn test_upload_sizes() {
        assert_eq!(stride(), 12);
        assert_eq!(bytemuck::cast_slice::<f32, u8>(&QUAD_VERTICES).len(), 48);
        assert_eq!(bytemuck::cast_slice::<u32, u8>(&QUAD_INDICES).len(), 24);
    }

    #[test]
    fn test_quad_is_centered() {
        let (sx, sy) = QUAD_VERTICES
            .chunks(FLOATS_PER_VERTEX)
            .fold((0.0, 0.0), |(x, y), v| (x + v[0], y + v[1]));
        assert_eq!((sx, sy), (0.0, 0.0));
    }
}
