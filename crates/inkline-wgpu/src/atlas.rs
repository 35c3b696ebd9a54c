use inkline::{CoverageBitmap, CoverageKind};

use crate::{Error, Result};

/// A coverage bitmap uploaded to the GPU, ready to be bound by glyph draws.
///
/// The texture format follows the bitmap kind: grayscale masks are `R8Unorm`,
/// subpixel masks are expanded to `Rgba8Unorm`.
#[derive(Debug)]
pub struct CoverageAtlas {
    kind: CoverageKind,
    width: u32,
    height: u32,
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

impl CoverageAtlas {
    pub(crate) fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        bitmap: &CoverageBitmap,
    ) -> Self {
        let (width, height) = (bitmap.width(), bitmap.height());
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Inkline Coverage Atlas"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: texture_format(bitmap.kind()),
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Inkline Coverage Atlas Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        let atlas = Self {
            kind: bitmap.kind(),
            width,
            height,
            texture,
            bind_group,
        };
        atlas.upload(queue, bitmap);
        log::debug!(
            "Uploaded {:?} coverage atlas ({}x{})",
            atlas.kind,
            width,
            height
        );
        atlas
    }

    /// Replace the atlas contents. The bitmap must match the atlas kind and
    /// size.
    pub fn update(&self, queue: &wgpu::Queue, bitmap: &CoverageBitmap) -> Result<()> {
        check_compatible((self.kind, self.width, self.height), bitmap)?;
        self.upload(queue, bitmap);
        Ok(())
    }

    fn upload(&self, queue: &wgpu::Queue, bitmap: &CoverageBitmap) {
        let expanded;
        let (pixels, bytes_per_texel) = match self.kind {
            CoverageKind::Grayscale => (bitmap.data(), 1),
            CoverageKind::Subpixel => {
                expanded = bitmap.to_rgba8();
                (expanded.as_slice(), 4)
            }
        };

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(self.width * bytes_per_texel),
                rows_per_image: Some(self.height),
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
    }

    pub fn kind(&self) -> CoverageKind {
        self.kind
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub(crate) fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

fn check_compatible(
    (atlas_kind, atlas_width, atlas_height): (CoverageKind, u32, u32),
    bitmap: &CoverageBitmap,
) -> Result<()> {
    let (kind, width, height) = (bitmap.kind(), bitmap.width(), bitmap.height());
    if (kind, width, height) != (atlas_kind, atlas_width, atlas_height) {
        return Err(Error::AtlasMismatch {
            atlas_kind,
            atlas_width,
            atlas_height,
            kind,
            width,
            height,
        });
    }
    Ok(())
}

pub(crate) fn texture_format(kind: CoverageKind) -> wgpu::TextureFormat {
    match kind {
        CoverageKind::Grayscale => wgpu::TextureFormat::R8Unorm,
        CoverageKind::Subpixel => wgpu::TextureFormat::Rgba8Unorm,
    }
}

pub(crate) fn create_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("Inkline Coverage Sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        // Coverage is already rasterized per pixel; filtering would smear it.
        mag_filter: wgpu::FilterMode::Nearest,
        min_filter: wgpu::FilterMode::Nearest,
        mipmap_filter: wgpu::MipmapFilterMode::Nearest,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texture_format_matches_channels() {
        assert_eq!(
            texture_format(CoverageKind::Grayscale).block_copy_size(None),
            Some(1)
        );
        assert_eq!(
            texture_format(CoverageKind::Subpixel).block_copy_size(None),
            Some(4)
        );
    }

    #[test]
    fn test_update_rejects_other_kind_with_both_shapes() {
        let atlas = (CoverageKind::Grayscale, 4, 2);
        let same = CoverageBitmap::new(CoverageKind::Grayscale, 4, 2, vec![0; 8]).unwrap();
        assert!(check_compatible(atlas, &same).is_ok());

        // Same byte count as a 4x6 grayscale atlas, but a different kind.
        let subpixel = CoverageBitmap::new(CoverageKind::Subpixel, 4, 2, vec![0; 24]).unwrap();
        let err = check_compatible((CoverageKind::Grayscale, 4, 6), &subpixel).unwrap_err();
        assert!(matches!(
            err,
            Error::AtlasMismatch {
                atlas_kind: CoverageKind::Grayscale,
                atlas_height: 6,
                kind: CoverageKind::Subpixel,
                height: 2,
                ..
            }
        ));
        let message = err.to_string();
        assert!(message.contains("4x6 Grayscale"), "{message}");
        assert!(message.contains("4x2 Subpixel"), "{message}");

        let taller = CoverageBitmap::new(CoverageKind::Grayscale, 4, 3, vec![0; 12]).unwrap();
        assert!(check_compatible(atlas, &taller).is_err());
    }
}
