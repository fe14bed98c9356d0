//! Splits a combined shader file into its vertex and fragment sections.
//!
//! A line containing `#shader` selects the section that following lines go to:
//!
//! ```text
//! #shader vertex
//! ...vertex source...
//! #shader fragment
//! ...fragment source...
//! ```
//!
//! Marker lines are not part of either section. Lines that appear before the
//! first selecting marker belong to no section and are dropped.

use log::{debug, error, warn};
use std::borrow::Cow;
use std::fs;
use std::path::Path;

const MARKER: &str = "#shader";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderProgramSource {
    pub vertex_source: String,
    pub fragment_source: String,
}

impl ShaderProgramSource {
    pub fn new(vertex_source: impl Into<String>, fragment_source: impl Into<String>) -> Self {
        Self {
            vertex_source: vertex_source.into(),
            fragment_source: fragment_source.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_source.is_empty() && self.fragment_source.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Vertex,
    Fragment,
}

/// Reads and splits the shader file at `path`.
///
/// An unreadable file is logged and yields two empty sections; compiling
/// those fails later with the driver's own diagnostic. Bytes that are not
/// valid UTF-8 are replaced with U+FFFD rather than rejecting the file.
pub fn parse_shader(path: impl AsRef<Path>) -> ShaderProgramSource {
    let path = path.as_ref();
    match fs::read(path) {
        Ok(bytes) => {
            debug!("Parsing shader file {}", path.display());
            let text = String::from_utf8_lossy(&bytes);
            if let Cow::Owned(_) = text {
                warn!(
                    "Shader file {} is not valid UTF-8, invalid bytes were replaced",
                    path.display()
                );
            }
            parse_shader_str(&text)
        }
        Err(e) => {
            error!("file open failed, file path: {} ({})", path.display(), e);
            ShaderProgramSource::default()
        }
    }
}

pub fn parse_shader_str(text: &str) -> ShaderProgramSource {
    let mut source = ShaderProgramSource::default();
    let mut section: Option<Section> = None;
    let mut orphaned = 0usize;

    for line in text.lines() {
        if line.contains(MARKER) {
            if line.contains("vertex") {
                section = Some(Section::Vertex);
            } else if line.contains("fragment") {
                section = Some(Section::Fragment);
            }
            continue;
        }

        let target = match section {
            Some(Section::Vertex) => &mut source.vertex_source,
            Some(Section::Fragment) => &mut source.fragment_source,
            None => {
                orphaned += 1;
                continue;
            }
        };
        target.push_str(line);
        target.push('\n');
    }

    if orphaned > 0 {
        warn!(
            "Discarded {} line(s) before the first '{} vertex|fragment' marker",
            orphaned, MARKER
        );
    }

    source
}
