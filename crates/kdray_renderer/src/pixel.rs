//! Pixel sinks: where rendered colors are written.

use kdray_math::Color3;

/// Destination for rendered pixels.
///
/// Writes are batched between [`lock`](PixelSink::lock) and
/// [`unlock`](PixelSink::unlock); use [`SinkGuard`] to pair them.
pub trait PixelSink {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    fn set_pixel(&mut self, x: u32, y: u32, color: Color3);

    /// Write a whole row. `colors` holds one entry per column.
    fn set_row(&mut self, y: u32, colors: &[Color3]) {
        for (x, &color) in colors.iter().enumerate() {
            self.set_pixel(x as u32, y, color);
        }
    }

    fn lock(&mut self) {}
    fn unlock(&mut self) {}
}

/// Holds a sink locked for as long as the guard lives.
pub struct SinkGuard<'a, S: PixelSink + ?Sized> {
    sink: &'a mut S,
}

impl<'a, S: PixelSink + ?Sized> SinkGuard<'a, S> {
    pub fn new(sink: &'a mut S) -> Self {
        sink.lock();
        Self { sink }
    }
}

impl<S: PixelSink + ?Sized> std::ops::Deref for SinkGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.sink
    }
}

impl<S: PixelSink + ?Sized> std::ops::DerefMut for SinkGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.sink
    }
}

impl<S: PixelSink + ?Sized> Drop for SinkGuard<'_, S> {
    fn drop(&mut self) {
        self.sink.unlock();
    }
}

/// In-memory image. Colors are clamped to [0, 1] as they are written.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color3>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color3::BLACK; width as usize * height as usize],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color3 {
        self.pixels[self.index(x, y)]
    }

    pub fn pixels(&self) -> &[Color3] {
        &self.pixels
    }

    /// Convert to RGBA bytes, row-major from the top-left.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for color in &self.pixels {
            let [r, g, b] = color.to_rgb8();
            bytes.extend_from_slice(&[r, g, b, 255]);
        }
        bytes
    }
}

impl PixelSink for ImageBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: Color3) {
        let i = self.index(x, y);
        self.pixels[i] = color.clamp();
    }

    fn set_row(&mut self, y: u32, colors: &[Color3]) {
        let start = self.index(0, y);
        let row = &mut self.pixels[start..start + colors.len()];
        for (dst, src) in row.iter_mut().zip(colors) {
            *dst = src.clamp();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_pixel_clamps() {
        let mut image = ImageBuffer::new(2, 2);
        image.set_pixel(1, 0, Color3::new(2.0, -1.0, 0.5));
        assert_eq!(image.get(1, 0), Color3::new(1.0, 0.0, 0.5));
        assert_eq!(image.get(0, 1), Color3::BLACK);
    }

    #[test]
    fn test_set_row() {
        let mut image = ImageBuffer::new(3, 2);
        image.set_row(1, &[Color3::WHITE, Color3::new(0.5, 0.5, 0.5), Color3::new(3.0, 0.0, 0.0)]);
        assert_eq!(image.get(0, 1), Color3::WHITE);
        assert_eq!(image.get(2, 1), Color3::new(1.0, 0.0, 0.0));
        assert_eq!(image.get(0, 0), Color3::BLACK);
        assert_eq!(image.pixels().len(), 6);
        assert_eq!(image.pixels()[5], Color3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_to_rgba8() {
        let mut image = ImageBuffer::new(1, 1);
        image.set_pixel(0, 0, Color3::new(1.0, 0.0, 1.0));
        assert_eq!(image.to_rgba8(), vec![255, 0, 255, 255]);
    }

    #[derive(Default)]
    struct CountingSink {
        locks: usize,
        unlocks: usize,
        writes: usize,
    }

    impl PixelSink for CountingSink {
        fn width(&self) -> u32 {
            4
        }
        fn height(&self) -> u32 {
            4
        }
        fn set_pixel(&mut self, _x: u32, _y: u32, _color: Color3) {
            assert_eq!(self.locks, self.unlocks + 1, "write outside lock");
            self.writes += 1;
        }
        fn lock(&mut self) {
            self.locks += 1;
        }
        fn unlock(&mut self) {
            self.unlocks += 1;
        }
    }

    #[test]
    fn test_guard_locks_for_its_lifetime() {
        let mut sink = CountingSink::default();
        {
            let mut guard = SinkGuard::new(&mut sink);
            guard.set_row(0, &[Color3::WHITE; 4]);
        }
        assert_eq!((sink.locks, sink.unlocks, sink.writes), (1, 1, 4));
    }
}
