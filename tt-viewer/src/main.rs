//! This crate provides the interactive 3D viewer for Twinkle Tree: a glowing particle tree with
//! the user's photos hanging on it and a star on top.

mod camera;
mod controls;
mod floating;
mod particles;
mod photos;
mod scene;
mod star;
mod zoom;

use self::{
    camera::{auto_rotate_camera, camera_input},
    controls::{
        keyboard_shortcuts, pick_quality_for_window, update_window, window_title, ConfigPath,
    },
    floating::animate_floating,
    particles::{update_particle_uniform, ParticlePlugin},
    photos::{pick_photos, remount_photos, PhotoAssets, PhotoSelected},
    scene::{
        advance_scene, ambient_light, apply_config_edits, background_colour, rebuild_particles,
        setup_scene, spin_tree, update_quality, ConfigEdits, SceneChanged, SceneState,
    },
    zoom::{close_zoom, update_zoom_overlay, zoom_on_selected_photo},
};
use bevy::{log::LogPlugin, prelude::*, DefaultPlugins};
use smooth_bevy_cameras::{controllers::orbit::OrbitCameraPlugin, LookTransformPlugin};
use std::path::PathBuf;
use tracing::{info, instrument};
use tt_config::TreeConfig;
use tt_scene::TreeScene;

#[cfg(not(target_family = "wasm"))]
mod cli {
    use clap::Parser;
    use std::path::PathBuf;
    use tt_config::DEFAULT_CONFIG_FILENAME;

    /// View the Twinkle Tree.
    #[derive(Debug, Parser)]
    #[command(version, about)]
    pub(super) struct Args {
        /// The RON file to load the tree config from and save it to.
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILENAME)]
        pub(super) config: PathBuf,
    }
}

#[cfg(not(target_family = "wasm"))]
fn main() -> color_eyre::Result<()> {
    use clap::Parser;
    use tracing_subscriber::{filter::LevelFilter, fmt::Layer, prelude::*, EnvFilter};

    color_eyre::install()?;
    tracing::subscriber::set_global_default(
        tracing_subscriber::registry().with(
            Layer::new()
                .with_writer(std::io::stdout)
                .with_ansi(true)
                .with_filter(
                    EnvFilter::builder()
                        .with_default_directive(LevelFilter::INFO.into())
                        .from_env_lossy(),
                ),
        ),
    )?;

    let args = cli::Args::parse();
    let config = TreeConfig::from_file(&args.config);

    run_viewer(config, Some(args.config));
    Ok(())
}

#[cfg(target_family = "wasm")]
fn main() {
    cfg_if::cfg_if! {
        if #[cfg(debug_assertions)] {
            const MAX_TRACING_LEVEL: tracing::Level = tracing::Level::DEBUG;
        } else {
            const MAX_TRACING_LEVEL: tracing::Level = tracing::Level::INFO;
        }
    }

    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(MAX_TRACING_LEVEL)
            .build(),
    );

    // There's no file system to load a config from or save it to
    run_viewer(TreeConfig::default(), None);
}

/// Run the viewer with Bevy.
#[instrument(skip(config))]
fn run_viewer(config: TreeConfig, config_path: Option<PathBuf>) {
    let title = window_title(&config);

    // Logging is handled by our own subscriber, not Bevy's
    info!("Starting bevy app");
    App::new()
        .insert_resource(Msaa { samples: 4 })
        .insert_resource(ClearColor(background_colour()))
        .insert_resource(ambient_light())
        .insert_resource(SceneState(TreeScene::new(config)))
        .insert_resource(ConfigPath(config_path))
        .add_plugins(
            DefaultPlugins
                .build()
                .disable::<LogPlugin>()
                .set(WindowPlugin {
                    window: WindowDescriptor {
                        title,
                        fit_canvas_to_parent: true,
                        ..default()
                    },
                    ..default()
                }),
        )
        .add_plugin(LookTransformPlugin)
        .add_plugin(OrbitCameraPlugin::new(true))
        .add_plugin(ParticlePlugin)
        .init_resource::<PhotoAssets>()
        .init_resource::<ConfigEdits>()
        .add_event::<SceneChanged>()
        .add_event::<PhotoSelected>()
        .add_startup_system(setup_scene)
        // Per-frame animation
        .add_system(advance_scene)
        .add_system(spin_tree.after(advance_scene))
        .add_system(animate_floating.after(advance_scene))
        .add_system(update_particle_uniform.after(advance_scene))
        .add_system(auto_rotate_camera)
        // Input, which only ever edits the config
        .add_system(pick_photos.after(spin_tree).after(animate_floating))
        .add_system(camera_input.after(pick_photos))
        .add_system(close_zoom.before(zoom_on_selected_photo))
        .add_system(zoom_on_selected_photo.after(pick_photos))
        .add_system(keyboard_shortcuts.before(apply_config_edits))
        .add_system(pick_quality_for_window.before(apply_config_edits))
        // Applying edits and reacting to what they changed
        .add_system(apply_config_edits.after(zoom_on_selected_photo))
        .add_system(rebuild_particles.after(apply_config_edits))
        .add_system(remount_photos.after(apply_config_edits))
        .add_system(update_quality.after(apply_config_edits))
        .add_system(update_zoom_overlay.after(apply_config_edits))
        .add_system(update_window.after(apply_config_edits))
        .run();
}
