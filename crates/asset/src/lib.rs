//! Asset loading/parsers (meshes, textures, text overlays).
//! Textures: 24-bit BMP and S3TC DDS with mip chains.
//! Meshes: triangulated OBJ, then vertex indexing for indexed draws.

pub mod bmp;
pub mod dds;
pub mod error;
pub mod index;
pub mod mesh;
pub mod obj;
pub mod text;
pub mod texture;

pub use error::{AssetError, AssetResult};
pub use index::index_mesh;
pub use mesh::{FlatMesh, MeshData, MeshVertex};
pub use texture::{MipLevel, TextureData, TextureFormat, load_texture_from_path};
