use std::io::Cursor;

use anyhow::Context;

use crate::foundation::{
    error::{AtlasmendError, AtlasmendResult},
    raster::Raster,
};

/// Decodes any format the `image` crate recognizes, forcing RGBA8.
pub fn decode_png(bytes: &[u8]) -> AtlasmendResult<Raster> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Raster::from_parts(width, height, 4, rgba.into_raw())
}

pub fn encode_png(raster: &Raster) -> AtlasmendResult<Vec<u8>> {
    if raster.channels() != 4 {
        return Err(AtlasmendError::codec(format!(
            "png encoding expects a 4-channel raster, got {}",
            raster.channels()
        )));
    }
    let img = image::RgbaImage::from_raw(raster.width(), raster.height(), raster.data().to_vec())
        .ok_or_else(|| AtlasmendError::codec("raster buffer does not fit its dimensions"))?;

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(buf)
}
