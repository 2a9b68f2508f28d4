use snafu::{ResultExt, Snafu, ensure};
use std::f32::consts::PI;
use std::path::Path;
use tracing::trace;
use wgpu::{AddressMode, FilterMode, MipmapFilterMode, TextureFormat};

/// Face order matches the GPU cube-map layer convention: +X, -X, +Y, -Y, +Z, -Z.
pub const FACE_SUFFIXES: [&str; 6] = ["px", "nx", "py", "ny", "pz", "nz"];

const BYTES_PER_TEXEL: usize = 4;

#[derive(Debug, Snafu)]
#[snafu(context(suffix(Err)))]
pub enum CubemapError {
    #[snafu(display("Unable to read cube-map source {path:?}: {source}"))]
    ReadSource {
        path: String,
        source: std::io::Error,
    },

    #[snafu(display("Unable to decode cube-map source {path:?}: {source}"))]
    DecodeSource {
        path: String,
        source: image::ImageError,
    },

    #[snafu(display("Cube-map face {face:?} is {width}x{height}, faces must be square"))]
    NonSquareFace {
        face: &'static str,
        width: u32,
        height: u32,
    },

    #[snafu(display("Cube-map face {face:?} is {width} texels wide, expected {expected}"))]
    FaceSizeMismatch {
        face: &'static str,
        width: u32,
        expected: u32,
    },
}

/// Six-faced texture, stored face-major with the mip chain of each face packed
/// after its base level.
#[derive(Debug, Clone)]
pub struct Cubemap {
    pub width: u32,
    pub height: u32,
    pub mip_level_count: u32,
    pub format: TextureFormat,
    pub data: Vec<u8>,
    pub repeat_mode: AddressMode,
    pub filter_mode: FilterMode,
    pub mip_filter_mode: MipmapFilterMode,
}

impl Cubemap {
    /// Wraps six equally sized RGBA8 faces into a single-mip cube map.
    pub fn from_faces(faces: [Vec<u8>; 6], size: u32) -> Self {
        let mut data = Vec::with_capacity(faces.iter().map(Vec::len).sum());
        for face in faces {
            data.extend_from_slice(&face);
        }

        Self {
            width: size,
            height: size,
            mip_level_count: 1,
            format: TextureFormat::Rgba8UnormSrgb,
            data,
            repeat_mode: AddressMode::ClampToEdge,
            filter_mode: FilterMode::Linear,
            mip_filter_mode: MipmapFilterMode::Linear,
        }
    }

    /// 1x1 sky-blue placeholder used where a real environment is missing.
    pub fn fallback() -> Self {
        let faces = std::array::from_fn(|_| vec![110, 150, 220, 255]);
        Self::from_faces(faces, 1)
    }

    /// Loads six per-face images named `{base_path}_{px,nx,py,ny,pz,nz}{file_type}`.
    ///
    /// All faces must be square and equally sized; the first face fixes the size.
    pub fn load_faces(base_path: &str, file_type: &str) -> Result<Self, CubemapError> {
        let mut faces: [Vec<u8>; 6] = std::array::from_fn(|_| Vec::new());
        let mut size = 0u32;

        for (slot, suffix) in faces.iter_mut().zip(FACE_SUFFIXES) {
            let path = format!("{base_path}_{suffix}{file_type}");
            let image = decode(&path)?.into_rgba8();
            let (width, height) = image.dimensions();

            ensure!(
                width == height,
                NonSquareFaceErr {
                    face: suffix,
                    width,
                    height
                }
            );
            if size == 0 {
                size = width;
            }
            ensure!(
                width == size,
                FaceSizeMismatchErr {
                    face: suffix,
                    width,
                    expected: size
                }
            );

            *slot = image.into_raw();
        }

        trace!("Loaded 6 cube-map faces from {base_path:?} at {size}x{size}");
        Ok(Self::from_faces(faces, size))
    }

    /// Projects a single equirectangular image onto a cube.
    ///
    /// HDR sources are tonemapped to sRGB; face size is derived from the source
    /// resolution.
    pub fn load_equirect(path: &str) -> Result<Self, CubemapError> {
        let source = decode(path)?.into_rgb32f();
        let (src_w, src_h) = (source.width().max(1), source.height().max(1));
        let size = (src_w / 4).max(1).min((src_h / 2).max(1));

        let sample = |dir: [f32; 3]| -> [u8; 4] {
            let theta = dir[2].atan2(dir[0]);
            let phi = dir[1].clamp(-1.0, 1.0).acos();
            let u = (theta + PI) / (2.0 * PI);
            let v = phi / PI;

            let sx = (u * (src_w as f32 - 1.0)).round().clamp(0.0, src_w as f32 - 1.0) as u32;
            let sy = (v * (src_h as f32 - 1.0)).round().clamp(0.0, src_h as f32 - 1.0) as u32;
            let px = source.get_pixel(sx, sy).0;

            [
                tonemap_to_srgb_u8(px[0]),
                tonemap_to_srgb_u8(px[1]),
                tonemap_to_srgb_u8(px[2]),
                255,
            ]
        };

        let faces = std::array::from_fn(|face| {
            let mut face_data = Vec::with_capacity((size * size) as usize * BYTES_PER_TEXEL);
            for y in 0..size {
                for x in 0..size {
                    let dir = texel_direction(face as u32, x, y, size);
                    face_data.extend_from_slice(&sample(dir));
                }
            }
            face_data
        });

        trace!("Projected equirect {path:?} ({src_w}x{src_h}) onto {size}x{size} cube");
        Ok(Self::from_faces(faces, size))
    }

    /// Builds the prefiltered variant of this map: an sRGB-aware mip chain with
    /// up to `mip_count` levels per face.
    pub fn prefiltered(&self, mip_count: u32) -> Self {
        let levels = mip_count.clamp(1, mip_chain_len(self.width));
        let mut data = Vec::with_capacity(chain_byte_size(self.width, levels) * 6);

        for face in 0..6 {
            let mut prev = self.face_level0(face).to_vec();
            let mut prev_size = self.width;
            data.extend_from_slice(&prev);

            for _ in 1..levels {
                let next_size = (prev_size / 2).max(1);
                let next = downsample_face(&prev, prev_size, next_size);
                data.extend_from_slice(&next);
                prev = next;
                prev_size = next_size;
            }
        }

        Self {
            mip_level_count: levels,
            data,
            ..self.clone_header()
        }
    }

    /// Builds the irradiance variant: a small cosine-weighted convolution of the
    /// base map, one mip, `face_size` texels per side.
    pub fn irradiance(&self, face_size: u32) -> Self {
        // Convolving the full-resolution source is pointless for a diffuse term;
        // shrink it to a fixed working size first.
        const WORK_SIZE: u32 = 16;

        let work = self.shrunk_faces(WORK_SIZE);
        let work_size = work.1;
        let directions: Vec<[f32; 3]> = (0..6u32)
            .flat_map(|face| {
                (0..work_size).flat_map(move |y| {
                    (0..work_size).map(move |x| texel_direction(face, x, y, work_size))
                })
            })
            .collect();

        let faces = std::array::from_fn(|face| {
            let mut face_data = Vec::with_capacity((face_size * face_size) as usize * BYTES_PER_TEXEL);
            for y in 0..face_size {
                for x in 0..face_size {
                    let normal = texel_direction(face as u32, x, y, face_size);

                    let mut accum = [0.0f32; 3];
                    let mut weight_sum = 0.0f32;
                    for (texel, dir) in directions.iter().enumerate() {
                        let cosine =
                            normal[0] * dir[0] + normal[1] * dir[1] + normal[2] * dir[2];
                        if cosine <= 0.0 {
                            continue;
                        }
                        let i = texel * BYTES_PER_TEXEL;
                        accum[0] += srgb_u8_to_linear(work.0[i]) * cosine;
                        accum[1] += srgb_u8_to_linear(work.0[i + 1]) * cosine;
                        accum[2] += srgb_u8_to_linear(work.0[i + 2]) * cosine;
                        weight_sum += cosine;
                    }

                    let norm = if weight_sum > 0.0 { weight_sum } else { 1.0 };
                    face_data.extend_from_slice(&[
                        linear_to_srgb_u8(accum[0] / norm),
                        linear_to_srgb_u8(accum[1] / norm),
                        linear_to_srgb_u8(accum[2] / norm),
                        255,
                    ]);
                }
            }
            face_data
        });

        Self::from_faces(faces, face_size)
    }

    /// Base-level texels of one face.
    pub fn face_level0(&self, face: usize) -> &[u8] {
        let stride = self.face_stride();
        let level0 = (self.width * self.height) as usize * BYTES_PER_TEXEL;
        &self.data[face * stride..face * stride + level0]
    }

    fn face_stride(&self) -> usize {
        chain_byte_size(self.width, self.mip_level_count)
    }

    /// All six faces downsampled to at most `target` texels per side,
    /// concatenated face-major. Returns the data and the actual size used.
    fn shrunk_faces(&self, target: u32) -> (Vec<u8>, u32) {
        let mut size = self.width;
        let mut faces: Vec<Vec<u8>> = (0..6).map(|f| self.face_level0(f).to_vec()).collect();

        while size > target && size > 1 {
            let next_size = (size / 2).max(1);
            for face in &mut faces {
                *face = downsample_face(face, size, next_size);
            }
            size = next_size;
        }

        (faces.concat(), size)
    }

    fn clone_header(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            mip_level_count: self.mip_level_count,
            format: self.format,
            data: Vec::new(),
            repeat_mode: self.repeat_mode,
            filter_mode: self.filter_mode,
            mip_filter_mode: self.mip_filter_mode,
        }
    }
}

// Format is taken from the file extension; TGA carries no magic bytes, so
// content sniffing is not an option here.
fn decode(path: &str) -> Result<image::DynamicImage, CubemapError> {
    let reader = image::ImageReader::open(Path::new(path)).context(ReadSourceErr { path })?;
    reader.decode().context(DecodeSourceErr { path })
}

/// Outward direction through the center of texel (x, y) on the given face.
fn texel_direction(face: u32, x: u32, y: u32, size: u32) -> [f32; 3] {
    let u = 2.0 * ((x as f32 + 0.5) / size as f32) - 1.0;
    let v = 2.0 * ((y as f32 + 0.5) / size as f32) - 1.0;

    let (x, y, z) = match face {
        0 => (1.0, -v, -u),  // +X
        1 => (-1.0, -v, u),  // -X
        2 => (u, 1.0, v),    // +Y
        3 => (u, -1.0, -v),  // -Y
        4 => (u, -v, 1.0),   // +Z
        _ => (-u, -v, -1.0), // -Z
    };

    let len = (x * x + y * y + z * z).sqrt().max(1e-6);
    [x / len, y / len, z / len]
}

pub(crate) fn mip_chain_len(size: u32) -> u32 {
    let mut levels = 1;
    let mut s = size.max(1);
    while s > 1 {
        s = (s / 2).max(1);
        levels += 1;
    }
    levels
}

fn chain_byte_size(base_size: u32, mip_levels: u32) -> usize {
    let mut total = 0usize;
    for level in 0..mip_levels {
        let size = (base_size >> level).max(1) as usize;
        total += size * size * BYTES_PER_TEXEL;
    }
    total
}

fn downsample_face(src: &[u8], src_size: u32, dst_size: u32) -> Vec<u8> {
    let mut out = vec![0u8; (dst_size * dst_size) as usize * BYTES_PER_TEXEL];

    for y in 0..dst_size {
        for x in 0..dst_size {
            let sx = x * 2;
            let sy = y * 2;
            let sample_coords = [
                (sx, sy),
                ((sx + 1).min(src_size - 1), sy),
                (sx, (sy + 1).min(src_size - 1)),
                ((sx + 1).min(src_size - 1), (sy + 1).min(src_size - 1)),
            ];

            let mut accum = [0.0f32; 3];
            let mut accum_a = 0u32;
            for (px, py) in sample_coords {
                let i = ((py * src_size + px) as usize) * BYTES_PER_TEXEL;
                accum[0] += srgb_u8_to_linear(src[i]);
                accum[1] += srgb_u8_to_linear(src[i + 1]);
                accum[2] += srgb_u8_to_linear(src[i + 2]);
                accum_a += src[i + 3] as u32;
            }

            let di = ((y * dst_size + x) as usize) * BYTES_PER_TEXEL;
            out[di] = linear_to_srgb_u8(accum[0] * 0.25);
            out[di + 1] = linear_to_srgb_u8(accum[1] * 0.25);
            out[di + 2] = linear_to_srgb_u8(accum[2] * 0.25);
            out[di + 3] = ((accum_a + 2) / 4) as u8;
        }
    }

    out
}

fn srgb_u8_to_linear(v: u8) -> f32 {
    let s = (v as f32) * (1.0 / 255.0);
    s.powf(2.2)
}

fn linear_to_srgb_u8(v: f32) -> u8 {
    let s = v.max(0.0).powf(1.0 / 2.2);
    (s * 255.0).round().clamp(0.0, 255.0) as u8
}

fn tonemap_to_srgb_u8(v: f32) -> u8 {
    let v = v.max(0.0);
    let mapped = v / (1.0 + v);
    let srgb = mapped.powf(1.0 / 2.2);
    (srgb * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_map(size: u32, rgba: [u8; 4]) -> Cubemap {
        let face: Vec<u8> = rgba
            .iter()
            .copied()
            .cycle()
            .take((size * size) as usize * 4)
            .collect();
        Cubemap::from_faces(std::array::from_fn(|_| face.clone()), size)
    }

    #[test]
    fn texel_directions_are_unit_length() {
        for face in 0..6 {
            let dir = texel_direction(face, 3, 1, 8);
            let len = (dir[0] * dir[0] + dir[1] * dir[1] + dir[2] * dir[2]).sqrt();
            assert!((len - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn prefiltered_packs_full_chain() {
        let map = solid_map(8, [200, 100, 50, 255]);
        let pre = map.prefiltered(4);

        assert_eq!(pre.mip_level_count, 4);
        assert_eq!(pre.width, 8);
        // 8 + 4 + 2 + 1 squared texels, 4 bytes each, 6 faces
        assert_eq!(pre.data.len(), (64 + 16 + 4 + 1) * 4 * 6);
    }

    #[test]
    fn prefiltered_mip_count_is_clamped_to_chain() {
        let map = solid_map(4, [10, 10, 10, 255]);
        let pre = map.prefiltered(10);
        assert_eq!(pre.mip_level_count, mip_chain_len(4));
    }

    #[test]
    fn irradiance_of_uniform_map_is_uniform() {
        let map = solid_map(8, [180, 90, 45, 255]);
        let irr = map.irradiance(4);

        assert_eq!(irr.width, 4);
        assert_eq!(irr.mip_level_count, 1);
        let first = &irr.data[0..4];
        for texel in irr.data.chunks(4) {
            for channel in 0..3 {
                assert!((texel[channel] as i32 - first[channel] as i32).abs() <= 2);
            }
        }
    }

    #[test]
    fn fallback_is_single_texel() {
        let map = Cubemap::fallback();
        assert_eq!(map.width, 1);
        assert_eq!(map.data.len(), 6 * 4);
    }

    #[test]
    fn missing_faces_report_read_error() {
        let err = Cubemap::load_faces("/definitely/not/here/sky", ".tga").unwrap_err();
        assert!(matches!(err, CubemapError::ReadSource { .. }));
    }
}
