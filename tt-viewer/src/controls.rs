//! This module turns key presses into config edits, and keeps the window in step with the config.

use crate::scene::{collect_changes, ConfigEdits, SceneChanged, SceneState};
use bevy::prelude::*;
use std::path::PathBuf;
use tracing::{debug, error, info, instrument, warn};
use tt_config::{AppMode, QualityTier, TreeConfig};
use tt_scene::SceneChanges;

/// The window title when there's no visible title.
pub const DEFAULT_WINDOW_TITLE: &str = "Twinkle Tree";

/// Where to save the config, if anywhere.
#[derive(Resource, Clone, Debug, Default)]
pub struct ConfigPath(pub Option<PathBuf>);

/// A key press that edits the config.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shortcut {
    /// Switch between edit and play mode.
    ToggleMode,

    /// Switch between high and low quality.
    ToggleQuality,

    /// Start or stop the snow.
    ToggleSnow,

    /// Take the last photo off the tree.
    RemoveLastPhoto,
}

impl Shortcut {
    /// The shortcut bound to the given key, if any.
    pub fn for_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::Tab => Some(Self::ToggleMode),
            KeyCode::Q => Some(Self::ToggleQuality),
            KeyCode::N => Some(Self::ToggleSnow),
            KeyCode::Back => Some(Self::RemoveLastPhoto),
            _ => None,
        }
    }

    /// The config after this shortcut is applied to the given one, if it changes anything.
    ///
    /// Photos can only be removed in edit mode.
    pub fn edit(self, config: &TreeConfig) -> Option<TreeConfig> {
        match self {
            Self::ToggleMode => Some(config.with_mode(config.mode().toggled())),
            Self::ToggleQuality => Some(config.with_quality(config.quality().toggled())),
            Self::ToggleSnow => Some(config.with_show_snow(!config.show_snow())),
            Self::RemoveLastPhoto => match config.mode() {
                AppMode::Edit => config.without_image(config.images().len().checked_sub(1)?),
                AppMode::Play => None,
            },
        }
    }
}

/// The text to show in the window title for the given config.
pub fn window_title(config: &TreeConfig) -> String {
    match config.visible_title() {
        Some(title) if !title.is_empty() => format!("{title} - {DEFAULT_WINDOW_TITLE}"),
        _ => DEFAULT_WINDOW_TITLE.to_string(),
    }
}

/// Edit the config with the keyboard shortcuts, and save it with Ctrl+S.
#[instrument(skip_all)]
pub fn keyboard_shortcuts(
    keyboard: Res<Input<KeyCode>>,
    scene: Res<SceneState>,
    path: Res<ConfigPath>,
    mut edits: ResMut<ConfigEdits>,
) {
    let ctrl = keyboard.any_pressed([KeyCode::LControl, KeyCode::RControl]);

    if ctrl && keyboard.just_pressed(KeyCode::S) {
        save_config(edits.latest(&scene), &path);
        return;
    }

    for &key in keyboard.get_just_pressed() {
        let Some(shortcut) = Shortcut::for_key(key) else {
            continue;
        };

        if edits.edit(&scene, |config| shortcut.edit(config)) {
            debug!(?shortcut, "Edited config");
        } else {
            debug!(?shortcut, "Shortcut did nothing");
        }
    }
}

/// Save the config to the config file, if there is one.
fn save_config(config: &TreeConfig, path: &ConfigPath) {
    let Some(path) = &path.0 else {
        warn!("There's no config file to save to");
        return;
    };

    match config.save_to_file(path) {
        Ok(()) => info!(?path, "Saved config"),
        Err(error) => error!(?error, ?path, "Unable to save config"),
    }
}

/// Drop to low quality once on startup if the window is narrow.
pub fn pick_quality_for_window(
    mut done: Local<bool>,
    windows: Res<Windows>,
    scene: Res<SceneState>,
    mut edits: ResMut<ConfigEdits>,
) {
    if *done {
        return;
    }
    let Some(window) = windows.get_primary() else {
        return;
    };
    *done = true;

    let quality = QualityTier::for_viewport_width(window.width());
    let narrowed = edits.edit(&scene, |config| {
        (quality == QualityTier::Low && config.quality() == QualityTier::High)
            .then(|| config.with_quality(quality))
    });
    if narrowed {
        info!(width = window.width(), "Narrow window, using low quality");
    }
}

/// Keep the window title in step with the visible title, and report mode and music changes.
pub fn update_window(
    mut changed: EventReader<SceneChanged>,
    scene: Res<SceneState>,
    mut windows: ResMut<Windows>,
) {
    let changes = collect_changes(&mut changed);

    if changes.contains(SceneChanges::TITLE) {
        if let Some(window) = windows.get_primary_mut() {
            window.set_title(window_title(scene.config()));
        }
    }

    if changes.contains(SceneChanges::MODE) {
        info!(mode = %scene.config().mode(), "Changed mode");
    }

    // Nothing plays the music, but the reference is kept in the config for whatever does
    if changes.contains(SceneChanges::MUSIC) {
        info!(music = ?scene.config().music(), "Changed music");
    }
}
