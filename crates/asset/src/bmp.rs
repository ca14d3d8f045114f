//! Minimal BMP decoder for 24-bit uncompressed images.
//!
//! Only the fixed 54-byte header layout is understood. Rows are returned in
//! file order (bottom-up) and are assumed to need no padding.

use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use byteorder::{ByteOrder, LittleEndian};

use crate::{
    error::{AssetError, AssetResult},
    texture::{TextureData, TextureFormat},
};

pub const MAGIC: &[u8] = b"BM";
pub const HEADER_SIZE: usize = 54;

const DATA_OFFSET_FIELD: usize = 0x0A;
const WIDTH_FIELD: usize = 0x12;
const HEIGHT_FIELD: usize = 0x16;
const IMAGE_SIZE_FIELD: usize = 0x22;

/// Load a BMP image from a file path.
pub fn load_bmp_from_path(path: impl AsRef<Path>) -> AssetResult<TextureData> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| AssetError::io(path, e))?;
    load_bmp_from_reader(BufReader::new(file)).map_err(|e| match e {
        AssetError::Io { source, .. } => AssetError::io(path, source),
        other => other,
    })
}

/// Load a BMP image from any reader. The whole stream is read into memory.
pub fn load_bmp_from_reader<R: Read>(mut reader: R) -> AssetResult<TextureData> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| AssetError::io("<reader>", e))?;
    decode_bmp(&bytes)
}

/// Decode an in-memory BMP file.
pub fn decode_bmp(bytes: &[u8]) -> AssetResult<TextureData> {
    if bytes.len() < MAGIC.len() {
        return Err(AssetError::TruncatedData {
            what: "BMP signature",
            needed: MAGIC.len(),
            available: bytes.len(),
        });
    }
    if &bytes[..MAGIC.len()] != MAGIC {
        return Err(AssetError::Format("Not a correct BMP file".into()));
    }
    if bytes.len() < HEADER_SIZE {
        return Err(AssetError::TruncatedData {
            what: "BMP header",
            needed: HEADER_SIZE,
            available: bytes.len(),
        });
    }

    let mut data_offset = LittleEndian::read_u32(&bytes[DATA_OFFSET_FIELD..]) as usize;
    let mut image_size = LittleEndian::read_u32(&bytes[IMAGE_SIZE_FIELD..]) as usize;
    let width = LittleEndian::read_u32(&bytes[WIDTH_FIELD..]);
    let height = LittleEndian::read_u32(&bytes[HEIGHT_FIELD..]);

    // Some writers leave these blank; guess them for plain 24-bit RGB.
    if image_size == 0 {
        image_size = (width as usize)
            .checked_mul(height as usize)
            .and_then(|px| px.checked_mul(3))
            .ok_or_else(|| AssetError::Format("BMP dimensions overflow".into()))?;
    }
    if data_offset == 0 {
        data_offset = HEADER_SIZE;
    }

    let end = data_offset
        .checked_add(image_size)
        .ok_or_else(|| AssetError::Format("BMP image size overflows".into()))?;
    let payload = bytes.get(data_offset..end).ok_or(AssetError::TruncatedData {
        what: "BMP pixel data",
        needed: end,
        available: bytes.len(),
    })?;

    log::debug!(
        "BMP {}x{}: {} payload bytes at offset {}",
        width,
        height,
        image_size,
        data_offset
    );

    Ok(TextureData {
        data: payload.to_vec(),
        width,
        height,
        format: TextureFormat::Bgr8,
        mip_levels: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a 24-bit BMP with the given header fields and `payload` pixel bytes.
    fn bmp_bytes(
        width: u32,
        height: u32,
        declared_size: u32,
        data_offset: u32,
        payload: &[u8],
    ) -> Vec<u8> {
        let mut out = vec![0u8; HEADER_SIZE];
        out[..2].copy_from_slice(MAGIC);
        LittleEndian::write_u32(&mut out[DATA_OFFSET_FIELD..], data_offset);
        LittleEndian::write_u32(&mut out[WIDTH_FIELD..], width);
        LittleEndian::write_u32(&mut out[HEIGHT_FIELD..], height);
        LittleEndian::write_u32(&mut out[IMAGE_SIZE_FIELD..], declared_size);
        out.extend_from_slice(payload);
        out
    }

    #[test]
    fn decodes_header_fields() {
        let pixels: Vec<u8> = (0..48).collect();
        let bytes = bmp_bytes(4, 4, 48, 54, &pixels);
        let tex = decode_bmp(&bytes).expect("decode bmp");
        assert_eq!((tex.width, tex.height), (4, 4));
        assert_eq!(tex.format, TextureFormat::Bgr8);
        assert_eq!(tex.data, pixels);
        assert_eq!(tex.mip_count(), None);
    }

    #[test]
    fn zero_size_and_offset_are_guessed() {
        let pixels = vec![7u8; 2 * 2 * 3];
        let bytes = bmp_bytes(2, 2, 0, 0, &pixels);
        let tex = decode_bmp(&bytes).expect("decode bmp");
        assert_eq!(tex.data.len(), 12);
    }

    #[test]
    fn honours_data_offset() {
        let mut pixels = vec![0xEE; 4];
        pixels.extend_from_slice(&[1, 2, 3]);
        let bytes = bmp_bytes(1, 1, 3, 58, &pixels);
        let tex = decode_bmp(&bytes).expect("decode bmp");
        assert_eq!(tex.data, vec![1, 2, 3]);
    }

    #[test]
    fn rejects_bad_magic() {
        let mut bytes = bmp_bytes(1, 1, 3, 54, &[0, 0, 0]);
        bytes[0] = b'X';
        assert!(matches!(decode_bmp(&bytes), Err(AssetError::Format(_))));
    }

    #[test]
    fn short_payload_is_truncated() {
        let bytes = bmp_bytes(4, 4, 48, 54, &[0u8; 20]);
        match decode_bmp(&bytes) {
            Err(AssetError::TruncatedData { needed, available, .. }) => {
                assert_eq!(needed, 54 + 48);
                assert_eq!(available, 54 + 20);
            }
            other => panic!("expected TruncatedData, got {other:?}"),
        }
    }

    #[test]
    fn short_header_is_truncated() {
        assert!(matches!(
            decode_bmp(b"BM\0\0"),
            Err(AssetError::TruncatedData { what: "BMP header", .. })
        ));
        assert!(matches!(
            decode_bmp(b"B"),
            Err(AssetError::TruncatedData { .. })
        ));
    }

    #[test]
    fn path_and_reader_entry_points() {
        let bytes = bmp_bytes(2, 1, 6, 54, &[1, 2, 3, 4, 5, 6]);
        let path = std::env::temp_dir().join(format!("gltut-{}-entry.bmp", std::process::id()));
        std::fs::write(&path, &bytes).expect("write temp bmp");
        let from_path = load_bmp_from_path(&path);
        std::fs::remove_file(&path).ok();

        let from_path = from_path.expect("load bmp from path");
        let from_reader = load_bmp_from_reader(std::io::Cursor::new(&bytes)).expect("load bmp");
        assert_eq!(from_path, from_reader);
        assert_eq!(from_path.data, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_bmp_from_path("/definitely/not/here.bmp").unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
        assert!(err.to_string().contains("here.bmp"));
    }
}
