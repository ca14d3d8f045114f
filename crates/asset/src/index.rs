//! Vertex deduplication: flat per-triangle attributes to an indexed mesh.
//!
//! Two vertices are shared only when position, uv and normal are exactly
//! equal. There is no epsilon: values that differ in the last bit stay
//! separate vertices.

use std::collections::HashMap;

use crate::{
    error::{AssetError, AssetResult},
    mesh::{FlatMesh, MeshData, MeshVertex},
};

/// Lookup key for one (position, uv, normal) tuple.
///
/// Components are compared by value, so `-0.0 == 0.0`. Vertices containing
/// NaN never get a key since NaN is not equal to itself.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
struct PackedVertex([u32; 8]);

impl PackedVertex {
    fn new(position: [f32; 3], uv: [f32; 2], normal: [f32; 3]) -> Option<Self> {
        let mut bits = [0u32; 8];
        let components = position.iter().chain(&uv).chain(&normal);
        for (slot, &c) in bits.iter_mut().zip(components) {
            if c.is_nan() {
                return None;
            }
            // Adding +0.0 folds -0.0 into +0.0.
            *slot = (c + 0.0).to_bits();
        }
        Some(Self(bits))
    }
}

/// Build an indexed mesh. The index sequence keeps the input's length and order.
pub fn index_mesh(flat: &FlatMesh) -> AssetResult<MeshData> {
    let len = flat.positions.len();
    if flat.uvs.len() != len || flat.normals.len() != len {
        return Err(AssetError::AttributeMismatch {
            positions: len,
            uvs: flat.uvs.len(),
            normals: flat.normals.len(),
        });
    }

    let mut lookup: HashMap<PackedVertex, u32> = HashMap::with_capacity(len);
    let mut vertices: Vec<MeshVertex> = Vec::new();
    let mut indices: Vec<u32> = Vec::with_capacity(len);

    for i in 0..len {
        let (position, uv, normal) = (flat.positions[i], flat.uvs[i], flat.normals[i]);
        let key = PackedVertex::new(position, uv, normal);

        if let Some(&idx) = key.as_ref().and_then(|k| lookup.get(k)) {
            indices.push(idx);
            continue;
        }

        let idx = u32::try_from(vertices.len()).map_err(|_| AssetError::TooManyVertices)?;
        vertices.push(MeshVertex::new(position, normal, uv));
        if let Some(key) = key {
            lookup.insert(key, idx);
        }
        indices.push(idx);
    }

    log::debug!(
        "Indexed {} triangle vertices into {} unique vertices",
        len,
        vertices.len()
    );

    Ok(MeshData::new(vertices, indices))
}
