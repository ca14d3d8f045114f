//! DDS loader for S3TC (DXT1/DXT3/DXT5) compressed textures with mip chains.

use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use byteorder::{ByteOrder, LittleEndian};

use crate::{
    error::{AssetError, AssetResult},
    texture::{MipLevel, TextureData, TextureFormat},
};

pub const MAGIC: &[u8] = b"DDS ";
pub const HEADER_SIZE: usize = 128;

const HEIGHT_FIELD: usize = 12;
const WIDTH_FIELD: usize = 16;
const MIP_COUNT_FIELD: usize = 28;
const FOURCC_FIELD: usize = 84;

/// Load a DDS texture from a file path.
pub fn load_dds_from_path(path: impl AsRef<Path>) -> AssetResult<TextureData> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| AssetError::io(path, e))?;
    load_dds_from_reader(BufReader::new(file)).map_err(|e| match e {
        AssetError::Io { source, .. } => AssetError::io(path, source),
        other => other,
    })
}

/// Load a DDS texture from any reader. The whole stream is read into memory.
pub fn load_dds_from_reader<R: Read>(mut reader: R) -> AssetResult<TextureData> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| AssetError::io("<reader>", e))?;
    decode_dds(&bytes)
}

/// Decode an in-memory DDS file.
pub fn decode_dds(bytes: &[u8]) -> AssetResult<TextureData> {
    if bytes.len() < MAGIC.len() {
        return Err(AssetError::TruncatedData {
            what: "DDS signature",
            needed: MAGIC.len(),
            available: bytes.len(),
        });
    }
    if &bytes[..MAGIC.len()] != MAGIC {
        return Err(AssetError::Format("File was not of type DDS".into()));
    }
    if bytes.len() < HEADER_SIZE {
        return Err(AssetError::TruncatedData {
            what: "DDS header",
            needed: HEADER_SIZE,
            available: bytes.len(),
        });
    }

    let height = LittleEndian::read_u32(&bytes[HEIGHT_FIELD..]);
    let width = LittleEndian::read_u32(&bytes[WIDTH_FIELD..]);
    let mip_count = LittleEndian::read_u32(&bytes[MIP_COUNT_FIELD..]);
    let fourcc = LittleEndian::read_u32(&bytes[FOURCC_FIELD..]);

    let format = TextureFormat::from_fourcc(fourcc).ok_or_else(|| {
        AssetError::UnsupportedFormat(format!(
            "FourCC {:?} (0x{:08X}) not recognized",
            String::from_utf8_lossy(&fourcc.to_le_bytes()),
            fourcc
        ))
    })?;
    // from_fourcc only yields compressed formats.
    let block_size = format.block_size().unwrap_or(16);

    if mip_count == 0 {
        log::warn!("DDS declares zero mip levels; texture will have no image data");
    }

    let payload = &bytes[HEADER_SIZE..];
    let levels = mip_chain(width, height, mip_count, block_size, payload.len())?;
    let needed: usize = levels.iter().map(|l| l.len).sum();

    log::debug!(
        "DDS {:?} {}x{}: {} levels, {} of {} payload bytes used",
        format,
        width,
        height,
        levels.len(),
        needed,
        payload.len()
    );

    Ok(TextureData {
        data: payload.to_vec(),
        width,
        height,
        format,
        mip_levels: levels,
    })
}

/// Byte spans of each level, halving dimensions (min 1) after each one.
///
/// Fails as soon as a level would end past `available` payload bytes.
fn mip_chain(
    width: u32,
    height: u32,
    mip_count: u32,
    block_size: usize,
    available: usize,
) -> AssetResult<Vec<MipLevel>> {
    let (mut w, mut h) = (width, height);
    let mut offset = 0usize;
    let mut levels = Vec::with_capacity(mip_count.min(32) as usize);

    for _ in 0..mip_count {
        if w == 0 && h == 0 {
            break;
        }
        let len = (w.div_ceil(4) as usize)
            .saturating_mul(h.div_ceil(4) as usize)
            .saturating_mul(block_size);
        let end = offset.saturating_add(len);
        if end > available {
            return Err(AssetError::TruncatedData {
                what: "DDS mip chain",
                needed: end,
                available,
            });
        }
        levels.push(MipLevel {
            width: w,
            height: h,
            offset,
            len,
        });
        offset = end;
        w = (w / 2).max(1);
        h = (h / 2).max(1);
    }
    Ok(levels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::{FOURCC_DXT1, FOURCC_DXT5};

    fn dds_bytes(
        width: u32,
        height: u32,
        mips: u32,
        fourcc: u32,
        payload: usize,
    ) -> Vec<u8> {
        let mut out = vec![0u8; HEADER_SIZE + payload];
        out[..4].copy_from_slice(MAGIC);
        LittleEndian::write_u32(&mut out[HEIGHT_FIELD..], height);
        LittleEndian::write_u32(&mut out[WIDTH_FIELD..], width);
        LittleEndian::write_u32(&mut out[MIP_COUNT_FIELD..], mips);
        LittleEndian::write_u32(&mut out[FOURCC_FIELD..], fourcc);
        out
    }

    #[test]
    fn dxt1_mip_chain_spans() {
        // 16x16: 128 + 32 + 8 + 8 + 8 bytes.
        let bytes = dds_bytes(16, 16, 5, FOURCC_DXT1, 184);
        let tex = decode_dds(&bytes).expect("decode dds");
        assert_eq!(tex.format, TextureFormat::Dxt1);
        assert_eq!((tex.width, tex.height), (16, 16));
        assert_eq!(tex.mip_count(), Some(5));

        let dims: Vec<(u32, u32)> = tex.mip_levels.iter().map(|l| (l.width, l.height)).collect();
        assert_eq!(dims, vec![(16, 16), (8, 8), (4, 4), (2, 2), (1, 1)]);
        let lens: Vec<usize> = tex.mip_levels.iter().map(|l| l.len).collect();
        assert_eq!(lens, vec![128, 32, 8, 8, 8]);
        assert_eq!(tex.mip_levels[1].offset, 128);
        assert_eq!(tex.level_data(4).map(<[u8]>::len), Some(8));
    }

    #[test]
    fn non_square_clamps_to_one() {
        let levels = mip_chain(8, 2, 4, 16, 1024).expect("mip chain");
        let dims: Vec<(u32, u32)> = levels.iter().map(|l| (l.width, l.height)).collect();
        assert_eq!(dims, vec![(8, 2), (4, 1), (2, 1), (1, 1)]);
        assert!(levels.iter().all(|l| l.len >= 16));
    }

    #[test]
    fn level_spans_fit_payload() {
        let bytes = dds_bytes(64, 32, 7, FOURCC_DXT5, 4096);
        let tex = decode_dds(&bytes).expect("decode dds");
        let total: usize = tex.mip_levels.iter().map(|l| l.len).sum();
        assert!(total <= tex.data.len());
        for pair in tex.mip_levels.windows(2) {
            assert_eq!(pair[0].offset + pair[0].len, pair[1].offset);
        }
    }

    #[test]
    fn truncated_payload_fails() {
        // Levels 0 and 1 fit (128 + 32), level 2 ends at 168.
        let bytes = dds_bytes(16, 16, 5, FOURCC_DXT1, 164);
        match decode_dds(&bytes) {
            Err(AssetError::TruncatedData { needed, available, .. }) => {
                assert_eq!(needed, 168);
                assert_eq!(available, 164);
            }
            other => panic!("expected TruncatedData, got {other:?}"),
        }
    }

    #[test]
    fn bad_magic_is_format_error() {
        let mut bytes = dds_bytes(4, 4, 1, FOURCC_DXT1, 8);
        bytes[..4].copy_from_slice(b"XXXX");
        assert!(matches!(decode_dds(&bytes), Err(AssetError::Format(_))));
        // Magic is checked before the header length.
        assert!(matches!(decode_dds(b"XXXX"), Err(AssetError::Format(_))));
    }

    #[test]
    fn unknown_fourcc_is_unsupported() {
        let bytes = dds_bytes(4, 4, 1, u32::from_le_bytes(*b"ATI2"), 16);
        assert!(matches!(decode_dds(&bytes), Err(AssetError::UnsupportedFormat(_))));
    }

    #[test]
    fn short_header_is_truncated() {
        let bytes = dds_bytes(4, 4, 1, FOURCC_DXT1, 0);
        assert!(matches!(
            decode_dds(&bytes[..100]),
            Err(AssetError::TruncatedData { what: "DDS header", .. })
        ));
    }

    #[test]
    fn zero_mip_count_has_no_levels() {
        let bytes = dds_bytes(4, 4, 0, FOURCC_DXT1, 8);
        let tex = decode_dds(&bytes).expect("decode dds");
        assert_eq!(tex.mip_count(), Some(0));
        assert_eq!(tex.level_data(0), None);
    }

    #[test]
    fn huge_mip_count_stops_at_payload_end() {
        let bytes = dds_bytes(1, 1, u32::MAX, FOURCC_DXT1, 0);
        match decode_dds(&bytes) {
            Err(AssetError::TruncatedData { what, needed, available }) => {
                assert_eq!(what, "DDS mip chain");
                assert_eq!((needed, available), (8, 0));
            }
            other => panic!("expected TruncatedData, got {other:?}"),
        }

        // A payload holding a few 1x1 levels still fails on the first missing one.
        let bytes = dds_bytes(1, 1, u32::MAX, FOURCC_DXT5, 48);
        assert!(matches!(
            decode_dds(&bytes),
            Err(AssetError::TruncatedData { needed: 64, available: 48, .. })
        ));
    }

    #[test]
    fn path_and_reader_entry_points() {
        let bytes = dds_bytes(8, 8, 2, FOURCC_DXT1, 40);
        let path = std::env::temp_dir().join(format!("gltut-{}-entry.dds", std::process::id()));
        std::fs::write(&path, &bytes).expect("write temp dds");
        let from_path = load_dds_from_path(&path);
        std::fs::remove_file(&path).ok();

        let from_path = from_path.expect("load dds from path");
        let from_reader = load_dds_from_reader(std::io::Cursor::new(&bytes)).expect("load dds");
        assert_eq!(from_path, from_reader);
        assert_eq!(from_path.mip_count(), Some(2));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_dds_from_path("/definitely/not/here.dds").unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
        assert!(err.to_string().contains("here.dds"));
    }
}
