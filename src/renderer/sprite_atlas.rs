use std::collections::{HashMap, HashSet};
use std::path::Path;

use image::RgbaImage;
use wgpu::util::DeviceExt;

use crate::error::GameError;

// ── SpriteData ───────────────────────────────────────────────────────────────

/// UV rectangle and source size for a single named sprite.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpriteData {
    pub uv_min: [f32; 2],
    pub uv_max: [f32; 2],
    pub pixel_w: u32,
    pub pixel_h: u32,
}

// ── Shelf packing (pure, GPU-free) ───────────────────────────────────────────

/// One sprite's position inside the packed atlas.
#[derive(Debug, PartialEq)]
pub struct PlacedSprite {
    pub name: String,
    /// Top-left pixel coordinate inside the atlas.
    pub atlas_x: u32,
    pub atlas_y: u32,
    pub pixel_w: u32,
    pub pixel_h: u32,
}

/// Shelf-pack `(name, pixel_w, pixel_h)` items into rows of at most
/// `max_width` pixels, tallest first.
///
/// Duplicate names keep only their first (tallest-sorted) occurrence.
/// Sprites wider than `max_width` are skipped.  Both returned atlas
/// dimensions are powers of two.
pub fn pack(items: &[(String, u32, u32)], max_width: u32) -> (Vec<PlacedSprite>, u32, u32) {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| items[b].2.cmp(&items[a].2));

    let mut placed_names: HashSet<&str> = HashSet::new();
    let mut placements: Vec<PlacedSprite> = Vec::new();
    let mut cur_x = 0u32;
    let mut cur_y = 0u32;
    let mut row_h = 0u32;

    for &i in &order {
        let (ref name, w, h) = items[i];

        if !placed_names.insert(name.as_str()) {
            continue;
        }

        if w > max_width {
            tracing::warn!("sprite '{name}' is wider ({w}px) than the atlas ({max_width}px); skipping");
            continue;
        }

        if cur_x + w > max_width {
            cur_y += row_h;
            cur_x = 0;
            row_h = 0;
        }

        placements.push(PlacedSprite {
            name: name.clone(),
            atlas_x: cur_x,
            atlas_y: cur_y,
            pixel_w: w,
            pixel_h: h,
        });
        cur_x += w;
        row_h = row_h.max(h);
    }

    let used_h = cur_y + row_h;
    let atlas_h = used_h.next_power_of_two().max(1);
    let atlas_w = max_width.next_power_of_two();
    (placements, atlas_w, atlas_h)
}

// ── SpriteSheet (CPU side) ───────────────────────────────────────────────────

/// Decoded and packed sprites, ready to upload once a GPU device exists.
///
/// Loading happens before the window opens so that a missing image is
/// reported as an [`GameError::AssetLoad`] at startup.
pub struct SpriteSheet {
    sprites: HashMap<String, SpriteData>,
    image: RgbaImage,
}

impl SpriteSheet {
    /// Maximum row width of the packed atlas texture in pixels.
    pub const ATLAS_WIDTH: u32 = 512;

    /// Pack already-decoded images, keyed by sprite name.
    pub fn from_images(images: Vec<(String, RgbaImage)>) -> Self {
        if images.is_empty() {
            return Self::default();
        }

        let dims: Vec<(String, u32, u32)> =
            images.iter().map(|(name, img)| (name.clone(), img.width(), img.height())).collect();
        let (placements, atlas_w, atlas_h) = pack(&dims, Self::ATLAS_WIDTH);

        let lookup: HashMap<&str, &RgbaImage> = images.iter().map(|(n, i)| (n.as_str(), i)).collect();
        let mut image = RgbaImage::new(atlas_w, atlas_h);
        let mut sprites = HashMap::new();

        for p in &placements {
            let Some(src) = lookup.get(p.name.as_str()) else { continue };
            for dy in 0..p.pixel_h {
                for dx in 0..p.pixel_w {
                    image.put_pixel(p.atlas_x + dx, p.atlas_y + dy, *src.get_pixel(dx, dy));
                }
            }

            let uv_min = [p.atlas_x as f32 / atlas_w as f32, p.atlas_y as f32 / atlas_h as f32];
            let uv_max = [
                (p.atlas_x + p.pixel_w) as f32 / atlas_w as f32,
                (p.atlas_y + p.pixel_h) as f32 / atlas_h as f32,
            ];
            sprites.insert(
                p.name.clone(),
                SpriteData { uv_min, uv_max, pixel_w: p.pixel_w, pixel_h: p.pixel_h },
            );
        }

        Self { sprites, image }
    }

    /// Scan `path` recursively for `.png` files (named by file stem) and make
    /// sure every name in `required` is present.
    pub fn load_folder<P: AsRef<Path>>(path: P, required: &[&str]) -> Result<Self, GameError> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(GameError::asset(path, "sprite folder not found"));
        }

        let mut images: Vec<(String, RgbaImage)> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for entry in walkdir::WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let file_path = entry.path();
            if file_path.extension().and_then(|s| s.to_str()) != Some("png") {
                continue;
            }
            let name = match file_path.file_stem().and_then(|s| s.to_str()) {
                Some(n) if !n.is_empty() => n.to_string(),
                _ => continue,
            };
            if !seen.insert(name.clone()) {
                tracing::warn!("duplicate sprite name '{name}' at {}; skipping", file_path.display());
                continue;
            }
            let img = image::open(file_path).map_err(|e| GameError::asset(file_path, e))?;
            images.push((name, img.to_rgba8()));
        }

        if let Some(missing) = required.iter().find(|name| !seen.contains(**name)) {
            return Err(GameError::asset(path.join(format!("{missing}.png")), "required sprite missing"));
        }

        tracing::info!(count = images.len(), "loaded sprites from '{}'", path.display());
        Ok(Self::from_images(images))
    }

    pub fn get(&self, name: &str) -> Option<SpriteData> {
        self.sprites.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

impl Default for SpriteSheet {
    /// A 1×1 transparent sheet with no sprites.
    fn default() -> Self {
        Self { sprites: HashMap::new(), image: RgbaImage::new(1, 1) }
    }
}

// ── SpriteAtlas (GPU side) ───────────────────────────────────────────────────

pub struct SpriteAtlas {
    pub sprites: HashMap<String, SpriteData>,
    pub texture_view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl SpriteAtlas {
    pub fn upload(device: &wgpu::Device, queue: &wgpu::Queue, sheet: &SpriteSheet) -> Self {
        let img = &sheet.image;
        let (w, h) = img.dimensions();
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some("sprite_atlas_tex"),
                size: wgpu::Extent3d { width: w, height: h, depth_or_array_layers: 1 },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            img.as_raw(),
        );
        let texture_view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        // Sprites are drawn scaled down, so filter linearly.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        Self { sprites: sheet.sprites.clone(), texture_view, sampler }
    }
}
