use crate::gbuffer::GBuffer;
use tracing::trace;

/// Owns the deferred-rendering resources tied to the output size.
#[derive(Debug)]
pub struct RenderManager {
    width: u32,
    height: u32,
    gbuffer: GBuffer,
}

impl RenderManager {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            gbuffer: GBuffer::new(width, height),
        }
    }

    /// Reallocates the size-dependent resources. Dimensions must already be
    /// clamped to at least 1 by the dispatcher.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        if (width, height) == (self.width, self.height) {
            return;
        }
        trace!("Render manager resizing {}x{} -> {width}x{height}", self.width, self.height);
        self.width = width;
        self.height = height;
        self.gbuffer.resize(width, height);
    }

    pub fn gbuffer(&self) -> &GBuffer {
        &self.gbuffer
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_propagates_to_gbuffer() {
        let mut manager = RenderManager::new(800, 600);
        manager.on_resize(1, 500);
        assert_eq!((manager.width(), manager.height()), (1, 500));
        assert_eq!(manager.gbuffer().width(), 1);
        assert_eq!(manager.gbuffer().height(), 500);
    }
}
