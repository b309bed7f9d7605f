use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::canvas::CanvasBuffer;
use image::ImageFormat;
use thiserror::Error;

const PREFERENCE_FILE: &str = "SlimShot.ini";
const QUICK_SAVE_PREFIX: &str = "SlimShotFastSave-";
const QUICK_SAVE_EXTENSION: &str = "png";
const DEFAULT_FALLBACK_TEMP_DIR: &str = "/tmp/slimshot";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to encode image {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("there is no image to save; capture or open one first")]
    NoActiveImage,
    #[error("missing HOME environment variable")]
    MissingHomeDirectory,
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Image load/save plus the remembered "last save folder".
///
/// The preference file is read once on construction; afterwards the folder
/// lives in memory and every successful save updates both copies.
#[derive(Debug, Clone)]
pub struct StorageService {
    home_dir: PathBuf,
    preference_path: PathBuf,
    last_save_dir: RefCell<Option<PathBuf>>,
}

impl StorageService {
    pub fn with_paths(home_dir: PathBuf, preference_path: PathBuf) -> Self {
        let last_save_dir = read_save_dir_preference(&preference_path);
        Self {
            home_dir,
            preference_path,
            last_save_dir: RefCell::new(last_save_dir),
        }
    }

    /// Quick saves land in `home_dir`; the preference file sits in the
    /// working directory.
    pub fn with_home(home_dir: PathBuf) -> Self {
        Self::with_paths(home_dir, PathBuf::from(PREFERENCE_FILE))
    }

    pub fn with_default_paths() -> StorageResult<Self> {
        let home = std::env::var_os("HOME")
            .filter(|home| !home.is_empty())
            .ok_or(StorageError::MissingHomeDirectory)?;
        Ok(Self::with_home(PathBuf::from(home)))
    }

    pub fn load(&self, path: &Path) -> StorageResult<CanvasBuffer> {
        // Sniff the content; saved files are PNG whatever their extension.
        let image = image::ImageReader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(image::ImageError::IoError)
            .and_then(|reader| reader.decode())
            .map_err(|source| StorageError::Decode {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::info!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            "loaded image"
        );
        Ok(CanvasBuffer::new(image.to_rgba8()))
    }

    /// Writes the live bitmap as PNG whatever the extension says, then
    /// remembers the parent folder. A failed preference write is only logged.
    pub fn save(&self, canvas: &CanvasBuffer, path: &Path) -> StorageResult<()> {
        write_png(canvas, path)?;
        tracing::info!(path = %path.display(), "saved image");

        if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            if let Err(err) = self.remember_save_dir(parent) {
                tracing::warn!(
                    path = %self.preference_path.display(),
                    ?err,
                    "failed to remember last save folder"
                );
            }
        }
        Ok(())
    }

    pub fn quick_save(&self, canvas: Option<&CanvasBuffer>) -> StorageResult<PathBuf> {
        let canvas = canvas.ok_or(StorageError::NoActiveImage)?;
        let target = next_quick_save_path(&self.home_dir);
        write_png(canvas, &target)?;
        tracing::info!(path = %target.display(), "quick saved image");
        Ok(target)
    }

    pub fn last_save_dir(&self) -> Option<PathBuf> {
        self.last_save_dir.borrow().clone()
    }

    /// Updates the in-memory folder, then persists it.
    pub fn remember_save_dir(&self, dir: &Path) -> StorageResult<()> {
        self.last_save_dir.replace(Some(dir.to_path_buf()));
        fs::write(&self.preference_path, dir.to_string_lossy().as_bytes())?;
        Ok(())
    }
}

/// Missing or unreadable preference yields `None`.
fn read_save_dir_preference(preference_path: &Path) -> Option<PathBuf> {
    match fs::read_to_string(preference_path) {
        Ok(contents) => {
            let dir = contents.trim();
            (!dir.is_empty()).then(|| PathBuf::from(dir))
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => None,
        Err(err) => {
            tracing::warn!(
                path = %preference_path.display(),
                ?err,
                "failed to read last save folder"
            );
            None
        }
    }
}

fn write_png(canvas: &CanvasBuffer, path: &Path) -> StorageResult<()> {
    canvas
        .bitmap()
        .save_with_format(path, ImageFormat::Png)
        .map_err(|source| StorageError::Encode {
            path: path.to_path_buf(),
            source,
        })
}

fn next_quick_save_path(dir: &Path) -> PathBuf {
    (1u64..)
        .map(|index| dir.join(format!("{QUICK_SAVE_PREFIX}{index}.{QUICK_SAVE_EXTENSION}")))
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| dir.join(format!("{QUICK_SAVE_PREFIX}0.{QUICK_SAVE_EXTENSION}")))
}

/// Scratch location for the raw capture before it is decoded.
pub fn temp_capture_path(capture_id: &str) -> PathBuf {
    let mut path = default_runtime_temp_dir();
    path.push(format!("slimshot-{capture_id}.png"));
    path
}

fn default_runtime_temp_dir() -> PathBuf {
    std::env::var("XDG_RUNTIME_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_FALLBACK_TEMP_DIR))
}
