use std::path::Path;

use image::{ImageFormat, RgbaImage};
use layers::RasterBuffer;
use views::{CanvasSurface, TextureSurface, Viewport};

use crate::error::AppError;

/// Keeps the most recent sphere texture for export.
#[derive(Debug, Default)]
pub struct PngTexture {
    latest: Option<RasterBuffer>,
    uploads: usize,
}

impl PngTexture {
    pub fn latest(&self) -> Option<&RasterBuffer> {
        self.latest.as_ref()
    }

    pub fn uploads(&self) -> usize {
        self.uploads
    }
}

impl TextureSurface for PngTexture {
    fn upload_texture(&mut self, raster: RasterBuffer) {
        self.uploads += 1;
        self.latest = Some(raster);
    }
}

/// Off-screen flat map canvas with a settable viewport.
#[derive(Debug)]
pub struct PngCanvas {
    viewport: Viewport,
    latest: Option<RasterBuffer>,
    paints: usize,
}

impl PngCanvas {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            latest: None,
            paints: 0,
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn latest(&self) -> Option<&RasterBuffer> {
        self.latest.as_ref()
    }

    pub fn paints(&self) -> usize {
        self.paints
    }
}

impl CanvasSurface for PngCanvas {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn paint(&mut self, raster: RasterBuffer) {
        self.paints += 1;
        self.latest = Some(raster);
    }
}

pub fn write_png(path: &Path, raster: &RasterBuffer) -> Result<(), AppError> {
    let (width, height) = (raster.width(), raster.height());
    let image = RgbaImage::from_raw(width, height, raster.as_bytes().to_vec())
        .ok_or(AppError::RasterShape { width, height })?;
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|source| AppError::Encode {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::{PngCanvas, PngTexture, write_png};
    use foundation::Rgba8;
    use layers::RasterBuffer;
    use views::{CanvasSurface, TextureSurface, Viewport};

    #[test]
    fn surfaces_keep_the_latest_raster() {
        let mut texture = PngTexture::default();
        texture.upload_texture(RasterBuffer::new(2, 1));
        texture.upload_texture(RasterBuffer::new(4, 2));
        assert_eq!(texture.uploads(), 2);
        assert_eq!(texture.latest().map(|r| r.width()), Some(4));

        let mut canvas = PngCanvas::new(Viewport::new(8, 4));
        canvas.set_viewport(Viewport::new(16, 8));
        assert_eq!(canvas.viewport(), Viewport::new(16, 8));
        assert!(canvas.latest().is_none());
        canvas.paint(RasterBuffer::new(16, 8));
        assert_eq!(canvas.paints(), 1);
    }

    #[test]
    fn png_round_trips_pixels() {
        let mut raster = RasterBuffer::new(3, 2);
        raster.blend_pixel(2, 1, Rgba8::rgb(204, 85, 0), 1.0);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("globe.png");

        write_png(&path, &raster).unwrap();
        let decoded = image::open(&path).unwrap().to_rgba8();

        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.get_pixel(2, 1).0, [204, 85, 0, 255]);
        assert_eq!(decoded.get_pixel(0, 0).0, [0, 0, 0, 0]);
    }
}
