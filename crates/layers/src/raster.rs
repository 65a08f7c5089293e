use foundation::Rgba8;

/// Source-over composite of `src` onto `dst` (straight alpha), with the
/// source alpha additionally scaled by `opacity`.
pub fn blend_over(dst: Rgba8, src: Rgba8, opacity: f32) -> Rgba8 {
    let sa = src.alpha() * opacity.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return dst;
    }
    let da = dst.alpha();
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba8::TRANSPARENT;
    }

    let mix = |s: u8, d: u8| {
        let c = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };
    Rgba8::new(
        mix(src.r, dst.r),
        mix(src.g, dst.g),
        mix(src.b, dst.b),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    )
}

/// Owned RGBA8 pixel grid, row-major from the top-left corner.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgba8>,
}

impl std::fmt::Debug for RasterBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl RasterBuffer {
    /// Fully transparent buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Rgba8::TRANSPARENT)
    }

    pub fn filled(width: u32, height: u32, color: Rgba8) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    pub fn blend_pixel(&mut self, x: u32, y: u32, color: Rgba8, opacity: f32) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = blend_over(self.pixels[i], color, opacity);
        }
    }

    /// Composite `color` over every pixel.
    pub fn fill(&mut self, color: Rgba8, opacity: f32) {
        for px in &mut self.pixels {
            *px = blend_over(*px, color, opacity);
        }
    }

    /// Composite `other` over `self`, aligned at the origin. Only the
    /// overlapping area is touched.
    pub fn draw_over(&mut self, other: &RasterBuffer, opacity: f32) {
        let w = self.width.min(other.width);
        let h = self.height.min(other.height);
        for y in 0..h {
            for x in 0..w {
                let src = other.pixels[(y * other.width + x) as usize];
                if src.a == 0 {
                    continue;
                }
                let i = (y * self.width + x) as usize;
                self.pixels[i] = blend_over(self.pixels[i], src, opacity);
            }
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    /// blake3 digest of the pixel bytes, hex encoded.
    pub fn content_hash(&self) -> String {
        blake3::hash(self.as_bytes()).to_hex().to_string()
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| (y * self.width + x) as usize)
    }
}
