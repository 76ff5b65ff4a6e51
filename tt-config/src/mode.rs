//! This module contains the edit and play modes.

use serde::{Deserialize, Serialize};

/// Whether the user is setting the tree up or just looking at it.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
pub enum AppMode {
    /// Photos can be added and removed, and the camera can be zoomed and panned.
    #[default]
    Edit,

    /// The finished tree, with only the automatic orbit.
    Play,
}

impl AppMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            Self::Edit => Self::Play,
            Self::Play => Self::Edit,
        }
    }

    /// Whether the camera can be zoomed and panned by the user.
    pub fn allows_camera_zoom_and_pan(self) -> bool {
        self == Self::Edit
    }
}

/// Get the title to show in the given mode, if any.
///
/// In edit mode the title is always shown, even when it's empty, so that there's something to
/// edit. In play mode an empty title is hidden.
pub fn visible_title(mode: AppMode, title: &str) -> Option<&str> {
    match mode {
        AppMode::Edit => Some(title),
        AppMode::Play if title.is_empty() => None,
        AppMode::Play => Some(title),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visible_title_test() {
        assert_eq!(visible_title(AppMode::Edit, "Hi"), Some("Hi"));
        assert_eq!(visible_title(AppMode::Edit, ""), Some(""));
        assert_eq!(visible_title(AppMode::Play, "Hi"), Some("Hi"));
        assert_eq!(visible_title(AppMode::Play, ""), None);
    }

    #[test]
    fn app_mode_test() {
        assert_eq!(AppMode::default(), AppMode::Edit);
        assert_eq!(AppMode::Edit.toggled(), AppMode::Play);
        assert_eq!(AppMode::Play.toggled(), AppMode::Edit);
        assert!(AppMode::Edit.allows_camera_zoom_and_pan());
        assert!(!AppMode::Play.allows_camera_zoom_and_pan());
    }
}
