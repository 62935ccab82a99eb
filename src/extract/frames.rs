//! Frame sequences stored as a directory of images.
//!
//! Decoding and muxing video containers is left to external tools (for
//! example `ffmpeg -i in.mp4 frames/%05d.png`). Frames are ordered by file
//! name, so zero-padded numbering keeps them in playback order.

use super::{decode_image, encode_image, DocumentKind};
use crate::error::{RedactorError, RedactorResult};
use image::{ImageFormat, RgbaImage};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File names of a frame sequence in playback order.
#[derive(Debug, Clone, Default)]
pub struct FrameDirectory {
    names: Vec<OsString>,
}

impl FrameDirectory {
    /// Loads every image in `dir`, sorted by file name. Files that are not
    /// images are ignored.
    pub fn load(dir: &Path) -> RedactorResult<(Self, Vec<RgbaImage>)> {
        let io_error = |e: std::io::Error| RedactorError::Io {
            path: dir.to_path_buf(),
            source: e,
        };

        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
            .map_err(io_error)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file())
            .filter(|p| matches!(DocumentKind::from_path(p), Ok(DocumentKind::Image(_))))
            .collect();
        paths.sort();

        let mut names = Vec::with_capacity(paths.len());
        let mut frames = Vec::with_capacity(paths.len());
        for path in &paths {
            let bytes = std::fs::read(path).map_err(|e| RedactorError::Io {
                path: path.clone(),
                source: e,
            })?;
            frames.push(decode_image(&bytes)?);
            if let Some(name) = path.file_name() {
                names.push(name.to_os_string());
            }
        }

        debug!(frames = frames.len(), dir = %dir.display(), "Loaded frame sequence");
        Ok((Self { names }, frames))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Writes frames into `dir` under the names they were loaded with.
    pub fn save(&self, dir: &Path, frames: &[RgbaImage]) -> RedactorResult<()> {
        if frames.len() != self.names.len() {
            return Err(RedactorError::InvalidInput {
                parameter: "frames".to_string(),
                reason: format!(
                    "expected {} frame(s), got {}",
                    self.names.len(),
                    frames.len()
                ),
            });
        }

        std::fs::create_dir_all(dir).map_err(|e| RedactorError::Io {
            path: dir.to_path_buf(),
            source: e,
        })?;

        for (name, frame) in self.names.iter().zip(frames) {
            let path = dir.join(name);
            let format = ImageFormat::from_path(&path).unwrap_or(ImageFormat::Png);
            let bytes = encode_image(frame, format)?;
            std::fs::write(&path, bytes).map_err(|e| RedactorError::Io { path, source: e })?;
        }
        Ok(())
    }
}
