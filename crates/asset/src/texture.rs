//! Texture data structures shared by the BMP and DDS decoders.

use std::{fs, path::Path};

use crate::{
    bmp,
    dds,
    error::{AssetError, AssetResult},
};

/// Decoded texture in the layout the GL upload expects, before GPU upload.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureData {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    /// Per-level spans into `data`. Empty for uncompressed images.
    pub mip_levels: Vec<MipLevel>,
}

/// Supported pixel/block formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureFormat {
    /// 24-bit uncompressed, stored blue-green-red.
    Bgr8,
    Dxt1,
    Dxt3,
    Dxt5,
}

/// One level of a compressed mip chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MipLevel {
    pub width: u32,
    pub height: u32,
    pub offset: usize,
    pub len: usize,
}

pub const FOURCC_DXT1: u32 = 0x3154_5844;
pub const FOURCC_DXT3: u32 = 0x3354_5844;
pub const FOURCC_DXT5: u32 = 0x3554_5844;

impl TextureFormat {
    pub fn from_fourcc(code: u32) -> Option<Self> {
        match code {
            FOURCC_DXT1 => Some(Self::Dxt1),
            FOURCC_DXT3 => Some(Self::Dxt3),
            FOURCC_DXT5 => Some(Self::Dxt5),
            _ => None,
        }
    }

    pub fn is_compressed(self) -> bool {
        !matches!(self, Self::Bgr8)
    }

    /// Bytes per 4x4 block for compressed formats.
    pub fn block_size(self) -> Option<usize> {
        match self {
            Self::Bgr8 => None,
            Self::Dxt1 => Some(8),
            Self::Dxt3 | Self::Dxt5 => Some(16),
        }
    }
}

impl TextureData {
    /// Number of decoded mip levels, `None` for uncompressed images.
    pub fn mip_count(&self) -> Option<u32> {
        if self.format.is_compressed() {
            Some(self.mip_levels.len() as u32)
        } else {
            None
        }
    }

    /// Bytes of one mip level. Level 0 of an uncompressed image is the whole payload.
    pub fn level_data(&self, level: usize) -> Option<&[u8]> {
        if !self.format.is_compressed() {
            return (level == 0).then_some(self.data.as_slice());
        }
        let mip = self.mip_levels.get(level)?;
        self.data.get(mip.offset..mip.offset + mip.len)
    }
}

/// Load a BMP or DDS texture, picking the decoder from the file's magic bytes.
pub fn load_texture_from_path(path: impl AsRef<Path>) -> AssetResult<TextureData> {
    let path = path.as_ref();
    log::info!("Loading texture from {:?}", path);

    let bytes = fs::read(path).map_err(|e| AssetError::io(path, e))?;
    let texture = if bytes.starts_with(bmp::MAGIC) {
        bmp::decode_bmp(&bytes)?
    } else if bytes.starts_with(dds::MAGIC) {
        dds::decode_dds(&bytes)?
    } else {
        return Err(AssetError::Format(format!(
            "{} is neither a BMP nor a DDS file",
            path.display()
        )));
    };

    log::info!(
        "Loaded {:?} texture {}x{} with {} bytes",
        texture.format,
        texture.width,
        texture.height,
        texture.data.len()
    );
    Ok(texture)
}
