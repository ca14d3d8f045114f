//! Minimal OBJ parser for triangulated meshes with positions, uvs and normals.
//!
//! Faces must be exactly three `p/t/n` references. Output is flat (not
//! deduplicated); see [`crate::index::index_mesh`] for the indexed form.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use crate::{
    error::{AssetError, AssetResult},
    mesh::FlatMesh,
};

/// Load an OBJ mesh from a file path.
pub fn load_obj_from_path(path: impl AsRef<Path>) -> AssetResult<FlatMesh> {
    let path = path.as_ref();
    log::info!("Loading OBJ from {:?}", path);
    let file = File::open(path).map_err(|e| AssetError::io(path, e))?;
    let mesh = load_obj_from_reader(BufReader::new(file)).map_err(|e| match e {
        AssetError::Io { source, .. } => AssetError::io(path, source),
        other => other,
    })?;
    log::info!(
        "Loaded OBJ {:?}: {} triangles",
        path,
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Load an OBJ mesh from a [`BufRead`] implementation.
pub fn load_obj_from_reader<R: BufRead>(reader: R) -> AssetResult<FlatMesh> {
    parse_obj(reader)
}

/// Convenience helper to parse an OBJ string literal.
pub fn load_obj_from_str(contents: &str) -> AssetResult<FlatMesh> {
    parse_obj(io::Cursor::new(contents))
}

fn parse_obj<R: BufRead>(reader: R) -> AssetResult<FlatMesh> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut texcoords: Vec<[f32; 2]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();

    let mut mesh = FlatMesh::default();

    for (line_idx, line) in reader.lines().enumerate() {
        let line_no = line_idx + 1;
        let line = line.map_err(|e| match e.kind() {
            io::ErrorKind::InvalidData => AssetError::parse(line_no, "line is not valid UTF-8"),
            _ => AssetError::io("<reader>", e),
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut parts = trimmed.split_whitespace();
        let Some(tag) = parts.next() else {
            continue;
        };

        match tag {
            "v" => {
                let x = parse_f32(parts.next(), line_no, "x coordinate")?;
                let y = parse_f32(parts.next(), line_no, "y coordinate")?;
                let z = parse_f32(parts.next(), line_no, "z coordinate")?;
                positions.push([x, y, z]);
            }
            "vt" => {
                let u = parse_f32(parts.next(), line_no, "u coordinate")?;
                let v = parse_f32(parts.next(), line_no, "v coordinate")?;
                texcoords.push([u, v]);
            }
            "vn" => {
                let nx = parse_f32(parts.next(), line_no, "nx coordinate")?;
                let ny = parse_f32(parts.next(), line_no, "ny coordinate")?;
                let nz = parse_f32(parts.next(), line_no, "nz coordinate")?;
                normals.push([nx, ny, nz]);
            }
            "f" => {
                let refs: Vec<&str> = parts.collect();
                if refs.len() != 3 {
                    return Err(AssetError::parse(
                        line_no,
                        format!(
                            "face has {} vertices; only triangles (p/t/n p/t/n p/t/n) are supported",
                            refs.len()
                        ),
                    ));
                }
                for token in refs {
                    let [p, t, n] = parse_face_vertex(token, line_no)?;
                    mesh.positions
                        .push(positions[resolve_index(p, positions.len(), "position", line_no)?]);
                    mesh.uvs
                        .push(texcoords[resolve_index(t, texcoords.len(), "texcoord", line_no)?]);
                    mesh.normals
                        .push(normals[resolve_index(n, normals.len(), "normal", line_no)?]);
                }
            }
            _ => {
                // Ignore other directives (o/g/s/usemtl/mtllib etc.)
            }
        }
    }

    log::debug!(
        "OBJ: {} positions, {} uvs, {} normals -> {} triangle vertices",
        positions.len(),
        texcoords.len(),
        normals.len(),
        mesh.len()
    );

    Ok(mesh)
}

fn parse_f32(value: Option<&str>, line_no: usize, what: &str) -> AssetResult<f32> {
    let token = value.ok_or_else(|| AssetError::parse(line_no, format!("missing {what}")))?;
    token
        .parse::<f32>()
        .map_err(|e| AssetError::parse(line_no, format!("invalid {what} '{token}': {e}")))
}

/// Split `p/t/n` into its three raw 1-based indices.
fn parse_face_vertex(token: &str, line_no: usize) -> AssetResult<[i64; 3]> {
    let mut out = [0i64; 3];
    let mut split = token.split('/');
    for slot in &mut out {
        let part = split
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                AssetError::parse(
                    line_no,
                    format!("face element '{token}' is not of the form p/t/n"),
                )
            })?;
        *slot = part.parse::<i64>().map_err(|_| {
            AssetError::parse(line_no, format!("invalid index '{part}' in '{token}'"))
        })?;
    }
    if split.next().is_some() {
        return Err(AssetError::parse(
            line_no,
            format!("face element '{token}' has more than 3 components"),
        ));
    }
    Ok(out)
}

fn resolve_index(raw: i64, len: usize, kind: &'static str, line_no: usize) -> AssetResult<usize> {
    if raw < 1 || raw as u64 > len as u64 {
        return Err(AssetError::IndexOutOfRange {
            line: line_no,
            kind,
            index: raw,
            len,
        });
    }
    Ok((raw - 1) as usize)
}
