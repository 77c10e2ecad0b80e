//! Thumbnail generation with a three-tier fallback
//!
//! Images are decoded and downscaled natively. Videos go through an external
//! frame extractor (ffmpeg by default) bounded by a timeout. Audio, and any
//! tier that fails, ends in a synthesized placeholder. Generation never
//! returns an error: a thumbnail is cosmetic, so failures are logged and the
//! next tier takes over.

use crate::glyph::{render_placeholder, PlaceholderMark};
use crate::types::AssetType;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GenericImageView, RgbImage};
use reel_core::{fs, ReelError, Result, ThumbnailConfig};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Which tier produced a thumbnail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailSource {
    /// Decoded and resized in-process
    Native,
    /// Extracted by the external frame tool
    ExternalTool,
    /// Synthesized fallback
    Placeholder,
}

/// A generated preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    /// Storage name relative to the thumbnails directory
    pub name: String,
    pub source: ThumbnailSource,
}

/// Pulls a preview frame out of a video file
pub trait FrameExtractor: Send + Sync {
    /// Tool name for logs
    fn name(&self) -> &str;

    /// Write the first frame of `source` to `dest` as JPEG, scaled to fit
    /// within `width` x `height`
    fn extract_first_frame(&self, source: &Path, dest: &Path, width: u32, height: u32) -> Result<()>;
}

/// Frame extraction by running the `ffmpeg` executable
#[derive(Debug, Clone)]
pub struct FfmpegExtractor {
    program: String,
    timeout: Duration,
}

impl FfmpegExtractor {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn from_config(config: &ThumbnailConfig) -> Self {
        Self::new(config.ffmpeg.clone(), Duration::from_secs(config.timeout_secs))
    }
}

impl FrameExtractor for FfmpegExtractor {
    fn name(&self) -> &str {
        &self.program
    }

    fn extract_first_frame(&self, source: &Path, dest: &Path, width: u32, height: u32) -> Result<()> {
        let scale = format!(
            "scale={}:{}:force_original_aspect_ratio=decrease",
            width, height
        );

        let mut child = Command::new(&self.program)
            .arg("-loglevel")
            .arg("error")
            .arg("-i")
            .arg(source)
            .args(["-vframes", "1", "-q:v", "2", "-vf"])
            .arg(&scale)
            .arg("-y")
            .arg(dest)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => {
                    ReelError::ThumbnailError(format!("{} not found", self.program))
                }
                _ => ReelError::ThumbnailError(format!("Failed to run {}: {}", self.program, e)),
            })?;

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                child.kill().ok();
                child.wait().ok();
                return Err(ReelError::ThumbnailError(format!(
                    "{} timed out after {:?}",
                    self.program, self.timeout
                )));
            }
            std::thread::sleep(Duration::from_millis(25));
        };

        if !status.success() {
            return Err(ReelError::ThumbnailError(format!(
                "{} exited with {}",
                self.program, status
            )));
        }
        if !dest.is_file() {
            return Err(ReelError::ThumbnailError(format!(
                "{} produced no output",
                self.program
            )));
        }
        Ok(())
    }
}

/// Produces `<asset_id>_thumb.jpg` previews inside one directory
pub struct ThumbnailGenerator {
    dir: PathBuf,
    width: u32,
    height: u32,
    quality: u8,
    extractor: Box<dyn FrameExtractor>,
}

impl ThumbnailGenerator {
    pub fn new<P: AsRef<Path>>(dir: P, config: &ThumbnailConfig) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            width: config.width.max(1),
            height: config.height.max(1),
            quality: config.quality.clamp(1, 100),
            extractor: Box::new(FfmpegExtractor::from_config(config)),
        }
    }

    /// Replace the video frame extractor
    pub fn with_extractor(mut self, extractor: Box<dyn FrameExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Bounding box every thumbnail fits inside
    pub fn bounds(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn thumbnail_name(asset_id: &str) -> String {
        format!("{}_thumb.jpg", asset_id)
    }

    pub fn path_for(&self, asset_id: &str) -> PathBuf {
        self.dir.join(Self::thumbnail_name(asset_id))
    }

    /// Generate the preview for one asset. Always yields a thumbnail name.
    pub fn generate(&self, source: &Path, asset_id: &str, asset_type: AssetType) -> Thumbnail {
        let name = Self::thumbnail_name(asset_id);
        let dest = self.dir.join(&name);

        if let Err(e) = std::fs::create_dir_all(&self.dir) {
            tracing::warn!(dir = %self.dir.display(), error = %e, "cannot create thumbnail directory");
        }

        let attempt = match asset_type {
            AssetType::Image => Some((ThumbnailSource::Native, self.try_native(source, &dest))),
            AssetType::Video => Some((ThumbnailSource::ExternalTool, self.try_external(source, &dest))),
            AssetType::Audio => None,
        };

        match attempt {
            Some((source_tag, Ok(()))) => {
                tracing::debug!(asset_id, ?source_tag, "thumbnail generated");
                return Thumbnail {
                    name,
                    source: source_tag,
                };
            }
            Some((source_tag, Err(e))) => {
                tracing::warn!(
                    asset_id,
                    ?source_tag,
                    error = %e,
                    "thumbnail generation failed, using placeholder"
                );
            }
            None => {}
        }

        if let Err(e) = self.write_placeholder(&dest, Some(asset_type)) {
            tracing::error!(asset_id, error = %e, "failed to write placeholder thumbnail");
        }
        Thumbnail {
            name,
            source: ThumbnailSource::Placeholder,
        }
    }

    /// Decode, shrink to fit, flatten to RGB, encode as JPEG
    fn try_native(&self, source: &Path, dest: &Path) -> Result<()> {
        let img = image::open(source)
            .map_err(|e| ReelError::ImageError(format!("Failed to decode {}: {}", source.display(), e)))?;
        let fitted = fit_within(img, self.width, self.height);
        self.write_jpeg(&fitted.to_rgb8(), dest)
    }

    fn try_external(&self, source: &Path, dest: &Path) -> Result<()> {
        tracing::debug!(tool = self.extractor.name(), source = %source.display(), "extracting video frame");
        self.extractor
            .extract_first_frame(source, dest, self.width, self.height)
    }

    /// Write a placeholder of the full bounding-box size
    pub fn write_placeholder(&self, dest: &Path, kind: Option<AssetType>) -> Result<PlaceholderMark> {
        let (img, mark) = render_placeholder(self.width, self.height, kind);
        self.write_jpeg(&img, dest)?;
        Ok(mark)
    }

    fn write_jpeg(&self, img: &RgbImage, dest: &Path) -> Result<()> {
        let mut bytes = Vec::new();
        JpegEncoder::new_with_quality(&mut bytes, self.quality)
            .encode_image(img)
            .map_err(|e| ReelError::ImageError(format!("Failed to encode JPEG: {}", e)))?;
        fs::write_atomic(dest, &bytes)
    }
}

/// Downscale to fit the box, preserving aspect ratio. Never upscales.
fn fit_within(img: DynamicImage, width: u32, height: u32) -> DynamicImage {
    let (w, h) = img.dimensions();
    if w <= width && h <= height {
        return img;
    }
    img.resize(width, height, image::imageops::FilterType::Lanczos3)
}
