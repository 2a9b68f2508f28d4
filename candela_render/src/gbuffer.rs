use wgpu::{TextureFormat, TextureUsages};

/// Intermediate targets written by the geometry pass and read by the
/// deferred lighting pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GBufferTarget {
    Colour,
    Normals,
    Pbr,
    Position,
}

impl GBufferTarget {
    pub const ALL: [GBufferTarget; 4] = [
        GBufferTarget::Colour,
        GBufferTarget::Normals,
        GBufferTarget::Pbr,
        GBufferTarget::Position,
    ];

    pub fn format(self) -> TextureFormat {
        match self {
            GBufferTarget::Colour => TextureFormat::Rgba8UnormSrgb,
            GBufferTarget::Normals => TextureFormat::Rgba16Float,
            GBufferTarget::Pbr => TextureFormat::Rgba16Float,
            GBufferTarget::Position => TextureFormat::Rgba32Float,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GBufferTarget::Colour => "gbuffer colour",
            GBufferTarget::Normals => "gbuffer normals",
            GBufferTarget::Pbr => "gbuffer pbr",
            GBufferTarget::Position => "gbuffer position",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentDesc {
    pub label: &'static str,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    pub usages: TextureUsages,
}

/// The deferred G-buffer: one attachment per [`GBufferTarget`] plus depth.
///
/// A resize exclusively reallocates every attachment; callers must not hold a
/// render pass over the old size across a resize.
#[derive(Debug)]
pub struct GBuffer {
    width: u32,
    height: u32,
    attachments: [AttachmentDesc; 4],
    depth: AttachmentDesc,
}

impl GBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        if width == 0 || height == 0 {
            candela_utils::debug_panic!("zero-sized G-buffer target {width}x{height}");
        }
        let width = width.max(1);
        let height = height.max(1);

        let attachments = GBufferTarget::ALL.map(|target| AttachmentDesc {
            label: target.label(),
            width,
            height,
            format: target.format(),
            usages: TextureUsages::RENDER_ATTACHMENT | TextureUsages::TEXTURE_BINDING,
        });

        let depth = AttachmentDesc {
            label: "gbuffer depth",
            width,
            height,
            format: TextureFormat::Depth32Float,
            usages: TextureUsages::RENDER_ATTACHMENT,
        };

        Self {
            width,
            height,
            attachments,
            depth,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }

    pub fn attachment(&self, target: GBufferTarget) -> &AttachmentDesc {
        let index = GBufferTarget::ALL
            .iter()
            .position(|t| *t == target)
            .expect("target is one of GBufferTarget::ALL");
        &self.attachments[index]
    }

    pub fn depth(&self) -> &AttachmentDesc {
        &self.depth
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
    fn resize_reallocates_every_attachment() {
        let mut gbuffer = GBuffer::new(640, 480);
        gbuffer.resize(1280, 720);

        assert_eq!(gbuffer.width(), 1280);
        for target in GBufferTarget::ALL {
            let desc = gbuffer.attachment(target);
            assert_eq!((desc.width, desc.height), (1280, 720));
        }
        assert_eq!(gbuffer.depth().height, 720);
    }

    #[test]
    fn attachments_carry_their_formats() {
        let gbuffer = GBuffer::new(64, 64);
        assert_eq!(
            gbuffer.attachment(GBufferTarget::Position).format,
            TextureFormat::Rgba32Float
        );
        assert_eq!(
            gbuffer.attachment(GBufferTarget::Colour).format,
            TextureFormat::Rgba8UnormSrgb
        );
    }
}
