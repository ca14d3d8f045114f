//! Screen-space quads for bitmap-font text overlays.
//!
//! The font texture is a 16x16 grid of glyphs indexed by byte value.

const CELL: f32 = 1.0 / 16.0;

/// Two triangles per glyph, positions in pixels.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextMesh {
    pub vertices: Vec<[f32; 2]>,
    pub uvs: Vec<[f32; 2]>,
}

impl TextMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }
}

/// Lay out `text` left to right from `(x, y)` using square glyphs of `size` pixels.
pub fn layout_text(text: &str, x: i32, y: i32, size: i32) -> TextMesh {
    let bytes = text.as_bytes();
    let mut mesh = TextMesh {
        vertices: Vec::with_capacity(bytes.len() * 6),
        uvs: Vec::with_capacity(bytes.len() * 6),
    };

    let size = size as f32;
    for (i, &character) in bytes.iter().enumerate() {
        let left = x as f32 + i as f32 * size;
        let right = left + size;
        let bottom = y as f32;
        let top = bottom + size;

        let up_left = [left, top];
        let up_right = [right, top];
        let down_right = [right, bottom];
        let down_left = [left, bottom];
        mesh.vertices
            .extend_from_slice(&[up_left, down_left, up_right, down_right, up_right, down_left]);

        let uv_x = f32::from(character % 16) / 16.0;
        let uv_y = f32::from(character / 16) / 16.0;

        let uv_up_left = [uv_x, uv_y];
        let uv_up_right = [uv_x + CELL, uv_y];
        let uv_down_right = [uv_x + CELL, uv_y + CELL];
        let uv_down_left = [uv_x, uv_y + CELL];
        mesh.uvs.extend_from_slice(&[
            uv_up_left,
            uv_down_left,
            uv_up_right,
            uv_down_right,
            uv_up_right,
            uv_down_left,
        ]);
    }

    mesh
}
