//! This crate provides [`TreeConfig`], the whole state of the application that the user can
//! change.
//!
//! A config is never mutated. Every edit makes a new config with a higher version, and the scene
//! applies configs in version order, so an old config arriving late can never undo a newer one.

mod mode;
mod quality;

pub use self::{
    mode::{visible_title, AppMode},
    quality::{QualityTier, LOW_QUALITY_WIDTH},
};

use serde::{Deserialize, Serialize};
use std::{fmt, fs, io, path::Path};
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// The most photos that can be hung on the tree.
pub const MAX_IMAGES: usize = 5;

/// The default location of the config file.
pub const DEFAULT_CONFIG_FILENAME: &str = "twinkle_tree.ron";

/// The error type for loading, saving, and editing a [`TreeConfig`].
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ConfigError {
    #[error("IO error: `{0:?}`")]
    Io(#[from] io::Error),

    #[error("Error parsing RON: `{0}`")]
    Parse(#[from] ron::error::SpannedError),

    #[error("Error serializing RON: `{0}`")]
    Serialize(#[from] ron::Error),

    #[error("All {} photo slots are already used", MAX_IMAGES)]
    NoPhotoSlotsLeft,
}

/// A reference to an image to hang on the tree, as an asset path or URL.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    /// Wrap the given path or URL.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The path or URL of the image.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImageRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Everything about the tree that the user can change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Incremented by every edit. This only exists at runtime.
    #[serde(skip)]
    version: u64,

    /// The current mode.
    mode: AppMode,

    /// The title shown above the tree.
    title: String,

    /// A reference to the background music.
    music: Option<String>,

    /// The photos to hang on the tree, in slot order.
    images: Vec<ImageRef>,

    /// The rendering quality.
    quality: QualityTier,

    /// Whether the snow is falling.
    show_snow: bool,

    /// The photo currently zoomed in on, if any. This only exists at runtime.
    #[serde(skip)]
    active_image: Option<ImageRef>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            version: 0,
            mode: AppMode::Edit,
            title: "Merry Christmas".to_string(),
            music: Some("christmas-music-merry-christmas-264517.mp3".to_string()),
            images: vec![],
            quality: QualityTier::High,
            show_snow: true,
            active_image: None,
        }
    }
}

impl TreeConfig {
    /// The version of this config. Later edits have higher versions.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Is this config newer than the other one?
    pub fn is_newer_than(&self, other: &Self) -> bool {
        self.version > other.version
    }

    /// The current mode.
    pub fn mode(&self) -> AppMode {
        self.mode
    }

    /// The raw title, which may be empty.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The title to show in the current mode, if any. See [`visible_title`].
    pub fn visible_title(&self) -> Option<&str> {
        visible_title(self.mode, &self.title)
    }

    /// The reference to the background music, if any.
    pub fn music(&self) -> Option<&str> {
        self.music.as_deref()
    }

    /// The photos to hang on the tree. There are never more than [`MAX_IMAGES`].
    pub fn images(&self) -> &[ImageRef] {
        &self.images
    }

    /// The rendering quality.
    pub fn quality(&self) -> QualityTier {
        self.quality
    }

    /// Whether the snow is falling.
    pub fn show_snow(&self) -> bool {
        self.show_snow
    }

    /// The photo currently zoomed in on, if any.
    pub fn active_image(&self) -> Option<&ImageRef> {
        self.active_image.as_ref()
    }

    /// Copy this config with the version bumped, ready for an edit.
    fn next(&self) -> Self {
        Self {
            version: self.version + 1,
            ..self.clone()
        }
    }

    /// Switch to the given mode.
    pub fn with_mode(&self, mode: AppMode) -> Self {
        Self { mode, ..self.next() }
    }

    /// Use the given quality tier.
    pub fn with_quality(&self, quality: QualityTier) -> Self {
        Self {
            quality,
            ..self.next()
        }
    }

    /// Change the title.
    pub fn with_title(&self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..self.next()
        }
    }

    /// Change or remove the background music.
    pub fn with_music(&self, music: Option<String>) -> Self {
        Self {
            music,
            ..self.next()
        }
    }

    /// Start or stop the snow.
    pub fn with_show_snow(&self, show_snow: bool) -> Self {
        Self {
            show_snow,
            ..self.next()
        }
    }

    /// Zoom in on the given photo, or close the zoomed photo with `None`.
    pub fn with_active_image(&self, active_image: Option<ImageRef>) -> Self {
        Self {
            active_image,
            ..self.next()
        }
    }

    /// Append the given images to the end of the list, keeping only as many as there are free
    /// slots. Returns [`ConfigError::NoPhotoSlotsLeft`] if every slot was already used.
    #[instrument(skip_all, fields(current = self.images.len()))]
    pub fn with_added_images(
        &self,
        images: impl IntoIterator<Item = ImageRef>,
    ) -> Result<Self, ConfigError> {
        let free = MAX_IMAGES.saturating_sub(self.images.len());
        if free == 0 {
            return Err(ConfigError::NoPhotoSlotsLeft);
        }

        let mut next = self.next();
        next.images.extend(images.into_iter().take(free));
        debug!(images = next.images.len(), "Added images");
        Ok(next)
    }

    /// Remove the image at the given index. If that image was zoomed in on, the zoom is closed.
    ///
    /// Returns `None` if there's no image at that index.
    pub fn without_image(&self, index: usize) -> Option<Self> {
        if index >= self.images.len() {
            return None;
        }

        let mut next = self.next();
        let removed = next.images.remove(index);
        if next.active_image.as_ref() == Some(&removed) && !next.images.contains(&removed) {
            next.active_image = None;
        }
        Some(next)
    }

    /// Load the config from a RON file, or use the default if the file is unavailable or invalid.
    /// In that case, also save the default to the file for future editing.
    #[instrument(skip_all, fields(path = ?path.as_ref()))]
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        match Self::try_from_file(path) {
            Ok(config) => config,
            Err(error) => {
                warn!(?error, "Unable to load config, using the default");
                let default = Self::default();
                if let Err(error) = default.save_to_file(path) {
                    warn!(?error, "Unable to save the default config");
                }
                default
            }
        }
    }

    /// Load the config from a RON file.
    ///
    /// Any images beyond the first [`MAX_IMAGES`] are dropped.
    pub fn try_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let mut config: Self = ron::from_str(&text)?;

        if config.images.len() > MAX_IMAGES {
            warn!(
                dropped = config.images.len() - MAX_IMAGES,
                "Too many images in config file"
            );
            config.images.truncate(MAX_IMAGES);
        }

        debug!(?config, "Loaded config");
        Ok(config)
    }

    /// Save the config to a RON file, creating any missing parent directories.
    ///
    /// The version and the zoomed photo aren't saved.
    #[instrument(skip_all, fields(path = ?path.as_ref()))]
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let text =
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default().struct_names(true))?;
        fs::write(path, text)?;
        debug!("Saved config");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn images(names: &[&str]) -> Vec<ImageRef> {
        names.iter().copied().map(ImageRef::from).collect()
    }

    /// A path in the temp dir which is unique to the calling test.
    fn temp_path(name: &str) -> PathBuf {
        let path = std::env::temp_dir()
            .join(format!("tt-config-{}", std::process::id()))
            .join(name);
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn edits_bump_version_test() {
        let config = TreeConfig::default();
        assert_eq!(config.version(), 0);

        let edited = config
            .with_mode(AppMode::Play)
            .with_quality(QualityTier::Low)
            .with_title("Happy Holidays")
            .with_music(None)
            .with_show_snow(false)
            .with_active_image(Some("a.png".into()));

        assert_eq!(edited.version(), 6);
        assert!(edited.is_newer_than(&config));
        assert!(!config.is_newer_than(&edited));

        assert_eq!(edited.mode(), AppMode::Play);
        assert_eq!(edited.quality(), QualityTier::Low);
        assert_eq!(edited.title(), "Happy Holidays");
        assert_eq!(edited.music(), None);
        assert!(!edited.show_snow());
        assert_eq!(edited.active_image(), Some(&ImageRef::new("a.png")));

        // The original is untouched
        assert_eq!(config, TreeConfig::default());
    }

    #[test]
    fn with_added_images_test() {
        let config = TreeConfig::default();

        let config = config.with_added_images(images(&["a", "b"])).unwrap();
        assert_eq!(config.images(), images(&["a", "b"]));
        assert_eq!(config.version(), 1);

        // Only as many as there are free slots
        let config = config
            .with_added_images(images(&["c", "d", "e", "f", "g"]))
            .unwrap();
        assert_eq!(config.images(), images(&["a", "b", "c", "d", "e"]));
        assert_eq!(config.version(), 2);

        assert!(matches!(
            config.with_added_images(images(&["h"])),
            Err(ConfigError::NoPhotoSlotsLeft)
        ));
    }

    #[test]
    fn without_image_test() {
        let config = TreeConfig::default()
            .with_added_images(images(&["a", "b", "c"]))
            .unwrap()
            .with_active_image(Some("b".into()));

        assert_eq!(config.without_image(3), None);

        let removed_a = config.without_image(0).unwrap();
        assert_eq!(removed_a.images(), images(&["b", "c"]));
        assert_eq!(removed_a.active_image(), Some(&ImageRef::new("b")));
        assert!(removed_a.is_newer_than(&config));

        let removed_b = config.without_image(1).unwrap();
        assert_eq!(removed_b.images(), images(&["a", "c"]));
        assert_eq!(removed_b.active_image(), None);

        // Removing frees a slot again
        let full = TreeConfig::default()
            .with_added_images(images(&["a", "b", "c", "d", "e"]))
            .unwrap();
        assert!(full.with_added_images(images(&["f"])).is_err());
        let refilled = full
            .without_image(4)
            .unwrap()
            .with_added_images(images(&["f"]))
            .unwrap();
        assert_eq!(refilled.images(), images(&["a", "b", "c", "d", "f"]));
    }

    #[test]
    fn visible_title_in_config_test() {
        let config = TreeConfig::default().with_title("");
        assert_eq!(config.visible_title(), Some(""));
        assert_eq!(config.with_mode(AppMode::Play).visible_title(), None);

        let config = config.with_title("Hello");
        assert_eq!(config.with_mode(AppMode::Play).visible_title(), Some("Hello"));
    }

    #[test]
    fn save_and_load_test() {
        let path = temp_path("save_and_load.ron");

        let config = TreeConfig::default()
            .with_title("Our tree")
            .with_quality(QualityTier::Low)
            .with_added_images(images(&["photos/one.png", "photos/two.jpg"]))
            .unwrap()
            .with_active_image(Some("photos/one.png".into()));
        config.save_to_file(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("TreeConfig("), "{text}");
        assert!(text.contains("\"photos/two.jpg\""), "{text}");
        assert!(!text.contains("version"), "{text}");
        assert!(!text.contains("active_image"), "{text}");

        let loaded = TreeConfig::try_from_file(&path).unwrap();
        assert_eq!(loaded.version(), 0);
        assert_eq!(loaded.active_image(), None);
        assert_eq!(loaded.title(), "Our tree");
        assert_eq!(loaded.quality(), QualityTier::Low);
        assert_eq!(loaded.images(), config.images());
        assert_eq!(loaded.music(), config.music());
    }

    #[test]
    fn partial_and_oversized_file_test() {
        let path = temp_path("partial.ron");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            r#"(title: "Short", images: ["1", "2", "3", "4", "5", "6", "7"])"#,
        )
        .unwrap();

        let loaded = TreeConfig::try_from_file(&path).unwrap();
        assert_eq!(loaded.title(), "Short");
        assert_eq!(loaded.images().len(), MAX_IMAGES);
        assert_eq!(loaded.images()[4], ImageRef::new("5"));
        assert_eq!(loaded.quality(), QualityTier::High);
        assert!(loaded.show_snow());
    }

    #[test]
    fn from_file_falls_back_to_default_test() {
        let missing = temp_path("nested/missing.ron");
        assert!(matches!(
            TreeConfig::try_from_file(&missing),
            Err(ConfigError::Io(_))
        ));
        assert_eq!(TreeConfig::from_file(&missing), TreeConfig::default());
        // The default gets written for next time
        assert_eq!(
            TreeConfig::try_from_file(&missing).unwrap(),
            TreeConfig::default()
        );

        let invalid = temp_path("invalid.ron");
        fs::create_dir_all(invalid.parent().unwrap()).unwrap();
        fs::write(&invalid, "this is not ron (").unwrap();
        assert!(matches!(
            TreeConfig::try_from_file(&invalid),
            Err(ConfigError::Parse(_))
        ));
        assert_eq!(TreeConfig::from_file(&invalid), TreeConfig::default());
        assert_eq!(
            TreeConfig::try_from_file(&invalid).unwrap(),
            TreeConfig::default()
        );
    }
}
