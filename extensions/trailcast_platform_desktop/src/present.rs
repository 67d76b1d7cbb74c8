//! wgpu surface presenter
//!
//! The replay renderer draws on the CPU, so presenting is a texture upload:
//! each frame is written into the acquired swapchain texture and presented.
//! No render pipeline is involved.

use std::borrow::Cow;
use std::sync::Arc;

use trailcast_platform::{PlatformError, Result};
use winit::window::Window as WinitWindow;

/// Pick a swapchain format that holds 8-bit RGBA or BGRA texels.
///
/// Returns the format and whether red and blue must be swapped on upload.
pub fn choose_format(formats: &[wgpu::TextureFormat]) -> Option<(wgpu::TextureFormat, bool)> {
    use wgpu::TextureFormat as F;

    let preference = [
        (F::Rgba8Unorm, false),
        (F::Bgra8Unorm, true),
        (F::Rgba8UnormSrgb, false),
        (F::Bgra8UnormSrgb, true),
    ];
    preference
        .into_iter()
        .find(|(format, _)| formats.contains(format))
}

/// Copy the top-left `copy_width x copy_height` region of a tightly packed
/// RGBA8 frame into rows of `padded_row_bytes`, optionally swapping red and
/// blue.
pub fn upload_rows(
    pixels: &[u8],
    src_width: u32,
    copy_width: u32,
    copy_height: u32,
    padded_row_bytes: usize,
    swap_red_blue: bool,
) -> Cow<'_, [u8]> {
    let src_row_bytes = src_width as usize * 4;
    let row_bytes = copy_width as usize * 4;
    let rows = copy_height as usize;

    if !swap_red_blue && row_bytes == src_row_bytes && padded_row_bytes == row_bytes {
        return Cow::Borrowed(&pixels[..row_bytes * rows]);
    }

    let mut out = vec![0u8; padded_row_bytes * rows];
    for row in 0..rows {
        let src = &pixels[row * src_row_bytes..row * src_row_bytes + row_bytes];
        let dst = &mut out[row * padded_row_bytes..row * padded_row_bytes + row_bytes];
        dst.copy_from_slice(src);
        if swap_red_blue {
            for px in dst.chunks_exact_mut(4) {
                px.swap(0, 2);
            }
        }
    }
    Cow::Owned(out)
}

/// Presents CPU frames on a window surface.
pub struct SurfacePresenter {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    swap_red_blue: bool,
}

impl SurfacePresenter {
    /// Create a surface for `window` and configure it for texture uploads.
    pub fn new(window: Arc<WinitWindow>, vsync: bool) -> Result<Self> {
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(Arc::clone(&window))
            .map_err(|e| PlatformError::Surface(e.to_string()))?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| PlatformError::Unsupported("no compatible graphics adapter".to_string()))?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("trailcast device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: wgpu::MemoryHints::default(),
            },
            None,
        ))
        .map_err(|e| PlatformError::InitFailed(e.to_string()))?;

        let caps = surface.get_capabilities(&adapter);
        if !caps.usages.contains(wgpu::TextureUsages::COPY_DST) {
            return Err(PlatformError::Unsupported(
                "surface textures cannot be written to directly".to_string(),
            ));
        }
        let (format, swap_red_blue) = choose_format(&caps.formats).ok_or_else(|| {
            PlatformError::Unsupported(format!("no 8-bit RGBA surface format in {:?}", caps.formats))
        })?;

        let size = window.inner_size();
        let mut config = surface
            .get_default_config(&adapter, size.width.max(1), size.height.max(1))
            .ok_or_else(|| PlatformError::Surface("surface not supported by adapter".to_string()))?;
        config.format = format;
        config.usage |= wgpu::TextureUsages::COPY_DST;
        config.present_mode = if vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };
        surface.configure(&device, &config);

        tracing::info!(
            "Surface {}x{} {:?} on {}",
            config.width,
            config.height,
            format,
            adapter.get_info().name
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            swap_red_blue,
        })
    }

    /// Reconfigure after the window changed size.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    pub fn surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Upload and present one frame. Frames skipped because the surface was
    /// lost or timed out are not errors.
    pub fn present(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<()> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(PlatformError::Present(format!(
                "frame is {} bytes, expected {expected}",
                pixels.len()
            )));
        }

        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::warn!("Surface lost, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::warn!("Surface timed out, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(PlatformError::Present(e.to_string())),
        };

        let copy_width = width.min(self.config.width);
        let copy_height = height.min(self.config.height);
        if copy_width == 0 || copy_height == 0 {
            frame.present();
            return Ok(());
        }

        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT as usize;
        let row_bytes = copy_width as usize * 4;
        let padded_row_bytes = row_bytes.div_ceil(align) * align;
        let data = upload_rows(
            pixels,
            width,
            copy_width,
            copy_height,
            padded_row_bytes,
            self.swap_red_blue,
        );

        self.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &frame.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &data,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(padded_row_bytes as u32),
                rows_per_image: Some(copy_height),
            },
            wgpu::Extent3d {
                width: copy_width,
                height: copy_height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(std::iter::empty());
        frame.present();
        Ok(())
    }
}
