use crate::foundation::{
    error::{AtlasmendError, AtlasmendResult},
    raster::Raster,
};

/// Tag opening every texture blob.
pub const TEXTURE_MAGIC: [u8; 4] = *b"RTEX";

/// Magic + width + height + flags + format id, each field u32 LE.
pub const TEXTURE_HEADER_LEN: usize = 20;

/// Target pixel layouts of the asset container the processed atlas is
/// injected into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    Luminance,
    LuminanceAlpha,
    Rgb,
    Rgba,
}

impl PixelFormat {
    pub fn id(self) -> u32 {
        match self {
            PixelFormat::Luminance => 0,
            PixelFormat::LuminanceAlpha => 1,
            PixelFormat::Rgb => 2,
            PixelFormat::Rgba => 3,
        }
    }

    pub fn from_id(id: u32) -> Option<Self> {
        match id {
            0 => Some(PixelFormat::Luminance),
            1 => Some(PixelFormat::LuminanceAlpha),
            2 => Some(PixelFormat::Rgb),
            3 => Some(PixelFormat::Rgba),
            _ => None,
        }
    }

    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Luminance => 1,
            PixelFormat::LuminanceAlpha => 2,
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }
}

/// Parsed 20-byte header of a texture blob.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextureHeader {
    pub width: u32,
    pub height: u32,
    pub flags: u32,
    pub format: PixelFormat,
}

/// Serializes a raster into the container's texture framing: the fixed
/// header followed by raw pixel bytes in the requested format.
pub fn encode_texture(raster: &Raster, format: PixelFormat) -> AtlasmendResult<Vec<u8>> {
    let pixel_count = raster.width() as usize * raster.height() as usize;
    let mut out = Vec::with_capacity(TEXTURE_HEADER_LEN + pixel_count * format.bytes_per_pixel());
    out.extend_from_slice(&TEXTURE_MAGIC);
    out.extend_from_slice(&raster.width().to_le_bytes());
    out.extend_from_slice(&raster.height().to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&format.id().to_le_bytes());

    let c = raster.channels() as usize;
    for px in raster.data().chunks_exact(c) {
        let (r, g, b, a) = (px[0], px[1], px[2], px[3]);
        match format {
            PixelFormat::Luminance => out.push(luma(r, g, b)),
            PixelFormat::LuminanceAlpha => {
                out.push(luma(r, g, b));
                out.push(a);
            }
            PixelFormat::Rgb => out.extend_from_slice(&[r, g, b]),
            PixelFormat::Rgba => out.extend_from_slice(&[r, g, b, a]),
        }
    }
    Ok(out)
}

/// Splits a texture blob into its parsed header and raw payload,
/// validating framing and payload length.
pub fn decode_texture(bytes: &[u8]) -> AtlasmendResult<(TextureHeader, &[u8])> {
    if bytes.len() < TEXTURE_HEADER_LEN {
        return Err(AtlasmendError::codec("texture blob shorter than its header"));
    }
    if bytes[..4] != TEXTURE_MAGIC {
        return Err(AtlasmendError::codec("texture blob magic mismatch"));
    }

    let field = |i: usize| {
        let at = 4 + i * 4;
        u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
    };
    let (width, height, flags, format_id) = (field(0), field(1), field(2), field(3));
    let format = PixelFormat::from_id(format_id)
        .ok_or_else(|| AtlasmendError::codec(format!("unknown texture format id {format_id}")))?;

    let payload = &bytes[TEXTURE_HEADER_LEN..];
    let expected = width as usize * height as usize * format.bytes_per_pixel();
    if payload.len() != expected {
        return Err(AtlasmendError::codec(format!(
            "texture payload length {} does not match {}x{} {:?}",
            payload.len(),
            width,
            height,
            format
        )));
    }

    Ok((
        TextureHeader {
            width,
            height,
            flags,
            format,
        },
        payload,
    ))
}

// Integer BT.601 weights; matches the container's own importer.
fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((u32::from(r) * 299 + u32::from(g) * 587 + u32::from(b) * 114) / 1000) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Raster {
        let mut r = Raster::new(2, 1, 4).unwrap();
        r.pixel_mut(0, 0).copy_from_slice(&[255, 0, 0, 255]);
        r.pixel_mut(1, 0).copy_from_slice(&[0, 255, 0, 128]);
        r
    }

    #[test]
    fn header_layout_is_exact() {
        let blob = encode_texture(&sample(), PixelFormat::Rgba).unwrap();
        assert_eq!(&blob[..4], b"RTEX");
        assert_eq!(blob[4..8], 2u32.to_le_bytes());
        assert_eq!(blob[8..12], 1u32.to_le_bytes());
        assert_eq!(blob[12..16], 0u32.to_le_bytes());
        assert_eq!(blob[16..20], 3u32.to_le_bytes());
        assert_eq!(blob.len(), TEXTURE_HEADER_LEN + 8);
    }

    #[test]
    fn rgba_payload_is_verbatim() {
        let blob = encode_texture(&sample(), PixelFormat::Rgba).unwrap();
        assert_eq!(&blob[20..], &[255, 0, 0, 255, 0, 255, 0, 128]);
    }

    #[test]
    fn luminance_alpha_uses_bt601_weights() {
        let blob = encode_texture(&sample(), PixelFormat::LuminanceAlpha).unwrap();
        // 255*299/1000 = 76, 255*587/1000 = 149.
        assert_eq!(&blob[20..], &[76, 255, 149, 128]);
    }

    #[test]
    fn decode_validates_framing() {
        let blob = encode_texture(&sample(), PixelFormat::Rgb).unwrap();
        let (header, payload) = decode_texture(&blob).unwrap();
        assert_eq!(header.width, 2);
        assert_eq!(header.height, 1);
        assert_eq!(header.format, PixelFormat::Rgb);
        assert_eq!(payload, &[255, 0, 0, 0, 255, 0]);

        assert!(decode_texture(&blob[..10]).is_err());

        let mut bad_magic = blob.clone();
        bad_magic[0] = b'X';
        assert!(decode_texture(&bad_magic).is_err());

        let mut truncated = blob.clone();
        truncated.pop();
        assert!(decode_texture(&truncated).is_err());

        let mut bad_format = blob;
        bad_format[16] = 9;
        assert!(decode_texture(&bad_format).is_err());
    }

    #[test]
    fn extra_channels_are_ignored_by_the_encoder() {
        let mut r = Raster::new(1, 1, 5).unwrap();
        r.pixel_mut(0, 0).copy_from_slice(&[1, 2, 3, 4, 99]);
        let blob = encode_texture(&r, PixelFormat::Rgba).unwrap();
        assert_eq!(&blob[20..], &[1, 2, 3, 4]);
    }
}
