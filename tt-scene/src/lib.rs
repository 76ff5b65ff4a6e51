//! This crate provides [`TreeScene`], which owns everything the renderer needs to draw the tree
//! and keeps it in step with the [`TreeConfig`].
//!
//! The renderer never looks at the config directly. It hands each new config to
//! [`TreeScene::apply`] and then only redoes the work named in the returned [`SceneChanges`].

use bitflags::bitflags;
use glam::Vec3;
use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, instrument, trace};
use tt_config::{ImageRef, TreeConfig};
use tt_geometry::{
    generate_with_rng, mount_photos, photo_slots, sparkle_field, FloatMotion, MountedPhoto,
    ParticleSet, PhotoSlotConfig, SparkleStyle, TreeDimensions, GOLD, PHOTO_SLOT_COUNT, WHITE,
};
use tt_shading::ShadingState;

/// The look of the snow hanging in the air around the whole scene.
pub const SNOW_STYLE: SparkleStyle = SparkleStyle {
    colour: WHITE,
    size: 0.4,
    opacity: 0.5,
    extent: Vec3::new(50., 50., 50.),
};

/// The number of sparkles around the star.
pub const STAR_SPARKLE_COUNT: usize = 40;

/// The look of the sparkles around the star.
pub const STAR_SPARKLE_STYLE: SparkleStyle = SparkleStyle {
    colour: GOLD,
    size: 1.,
    opacity: 1.,
    extent: Vec3::new(5., 5., 5.),
};

bitflags! {
    /// What changed in the scene when a config was applied.
    #[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
    pub struct SceneChanges: u16 {
        /// The tree particles were regenerated.
        const PARTICLES = 1 << 0;

        /// The photos were remounted.
        const PHOTOS = 1 << 1;

        /// The quality tier changed, so shadows and bloom need updating.
        const QUALITY = 1 << 2;

        /// The snow was regenerated or turned on or off.
        const SNOW = 1 << 3;

        /// The visible title changed.
        const TITLE = 1 << 4;

        /// The mode changed, so the camera controls need updating.
        const MODE = 1 << 5;

        /// A photo was zoomed in on or the zoom was closed.
        const ZOOM = 1 << 6;

        /// The background music changed.
        const MUSIC = 1 << 7;
    }
}

/// The state of the whole tree scene.
#[derive(Clone, Debug)]
pub struct TreeScene {
    /// The most recently applied config.
    config: TreeConfig,

    /// The size of the tree.
    dimensions: TreeDimensions,

    /// The particles that make up the tree.
    particles: ParticleSet,

    /// The snow, which exists even when it isn't shown.
    snow: ParticleSet,

    /// The sparkles around the star.
    star_sparkles: ParticleSet,

    /// The slots that photos can be mounted in.
    slots: [PhotoSlotConfig; PHOTO_SLOT_COUNT],

    /// The currently mounted photos.
    photos: Vec<MountedPhoto<ImageRef>>,

    /// The floating motion of the star.
    star_motion: FloatMotion,

    /// The per-frame shading state.
    shading: ShadingState,

    /// The source of all randomness in the scene.
    rng: StdRng,
}

impl TreeScene {
    /// Build the scene for the given config, with fresh randomness.
    pub fn new(config: TreeConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Build the scene for the given config, drawing all randomness from `rng`.
    #[instrument(skip_all, fields(version = config.version()))]
    pub fn with_rng(config: TreeConfig, mut rng: StdRng) -> Self {
        let dimensions = TreeDimensions::DEFAULT;
        let slots = photo_slots(dimensions);

        let particles =
            generate_with_rng(config.quality().particle_count(), dimensions, &mut rng);
        let snow = sparkle_field(config.quality().snow_count(), SNOW_STYLE, &mut rng);
        let star_sparkles = sparkle_field(STAR_SPARKLE_COUNT, STAR_SPARKLE_STYLE, &mut rng);
        let photos = mount_photos(config.images(), &slots, &mut rng);
        let star_motion = FloatMotion::star(&mut rng);

        debug!(
            particles = particles.len(),
            photos = photos.len(),
            "Built tree scene"
        );

        Self {
            config,
            dimensions,
            particles,
            snow,
            star_sparkles,
            slots,
            photos,
            star_motion,
            shading: ShadingState::MOUNTED,
            rng,
        }
    }

    /// The most recently applied config.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// The size of the tree.
    pub fn dimensions(&self) -> TreeDimensions {
        self.dimensions
    }

    /// The particles that make up the tree.
    pub fn particles(&self) -> &ParticleSet {
        &self.particles
    }

    /// The snow particles. Check [`TreeConfig::show_snow`] before drawing them.
    pub fn snow(&self) -> &ParticleSet {
        &self.snow
    }

    /// The sparkles around the star.
    pub fn star_sparkles(&self) -> &ParticleSet {
        &self.star_sparkles
    }

    /// The currently mounted photos, in slot order.
    pub fn photos(&self) -> &[MountedPhoto<ImageRef>] {
        &self.photos
    }

    /// The floating motion of the star.
    pub fn star_motion(&self) -> FloatMotion {
        self.star_motion
    }

    /// The current shading state.
    pub fn shading(&self) -> ShadingState {
        self.shading
    }

    /// Bring the scene up to date with the given config and report what changed.
    ///
    /// A config which isn't newer than the current one is ignored. The particles are only
    /// regenerated when the particle count changes, and the photos are only remounted when the
    /// image list changes.
    #[instrument(skip_all, fields(version = config.version()))]
    pub fn apply(&mut self, config: &TreeConfig) -> SceneChanges {
        if !config.is_newer_than(&self.config) {
            debug!(current = self.config.version(), "Ignoring stale config");
            return SceneChanges::empty();
        }

        let old = std::mem::replace(&mut self.config, config.clone());
        let mut changes = SceneChanges::empty();

        if old.quality() != config.quality() {
            changes |= SceneChanges::QUALITY;
        }

        let count = config.quality().particle_count();
        if old.quality().particle_count() != count {
            self.particles = generate_with_rng(count, self.dimensions, &mut self.rng);
            changes |= SceneChanges::PARTICLES;
        }

        let snow_count = config.quality().snow_count();
        if old.quality().snow_count() != snow_count {
            self.snow = sparkle_field(snow_count, SNOW_STYLE, &mut self.rng);
            changes |= SceneChanges::SNOW;
        }
        if old.show_snow() != config.show_snow() {
            changes |= SceneChanges::SNOW;
        }

        if old.images() != config.images() {
            self.photos = mount_photos(config.images(), &self.slots, &mut self.rng);
            changes |= SceneChanges::PHOTOS;
        }

        if old.visible_title() != config.visible_title() {
            changes |= SceneChanges::TITLE;
        }
        if old.mode() != config.mode() {
            changes |= SceneChanges::MODE;
        }
        if old.active_image() != config.active_image() {
            changes |= SceneChanges::ZOOM;
        }
        if old.music() != config.music() {
            changes |= SceneChanges::MUSIC;
        }

        debug!(?changes, "Applied config");
        changes
    }

    /// Advance the shading state to the given number of seconds since the scene was mounted.
    pub fn advance(&mut self, elapsed: f32) -> ShadingState {
        self.shading = self.shading.advance(elapsed);
        trace!(shading = ?self.shading);
        self.shading
    }

    /// The image mounted in the given slot, if any.
    pub fn photo_in_slot(&self, slot: usize) -> Option<&ImageRef> {
        self.photos
            .iter()
            .find(|photo| photo.slot_index == slot)
            .map(|photo| &photo.image)
    }

    /// The config to apply when the photo in the given slot is selected, which zooms in on it.
    ///
    /// Returns `None` if there's no photo in that slot.
    pub fn select_photo(&self, slot: usize) -> Option<TreeConfig> {
        zoomed_in(&self.config, self.photo_in_slot(slot)?)
    }

    /// The config to apply to close the zoomed photo.
    ///
    /// Returns `None` if no photo is zoomed in on.
    pub fn dismiss_zoom(&self) -> Option<TreeConfig> {
        zoomed_out(&self.config)
    }
}

fn zoomed_in(config: &TreeConfig, image: &ImageRef) -> Option<TreeConfig> {
    debug!(%image, "Selected photo");
    Some(config.with_active_image(Some(image.clone())))
}

fn zoomed_out(config: &TreeConfig) -> Option<TreeConfig> {
    config.active_image()?;
    Some(config.with_active_image(None))
}

/// The edits made to the config since it was last applied to a [`TreeScene`].
///
/// Every edit builds on the one before it, so several edits made before the next
/// [`TreeScene::apply`] all survive. Building each of them from the scene's config would give
/// them all the same version, and all but the first would be ignored as stale.
#[derive(Clone, Debug, Default)]
pub struct PendingConfig {
    /// The latest edited config, if there have been any edits.
    pending: Option<TreeConfig>,
}

impl PendingConfig {
    /// The config that the next edit builds on.
    pub fn latest<'a>(&'a self, scene: &'a TreeScene) -> &'a TreeConfig {
        self.pending.as_ref().unwrap_or(&scene.config)
    }

    /// Edit the latest config, returning whether the edit changed anything.
    pub fn edit(
        &mut self,
        scene: &TreeScene,
        edit: impl FnOnce(&TreeConfig) -> Option<TreeConfig>,
    ) -> bool {
        match edit(self.latest(scene)) {
            Some(config) => {
                trace!(version = config.version(), "Edited pending config");
                self.pending = Some(config);
                true
            }
            None => false,
        }
    }

    /// Zoom in on the photo in the given slot of the scene.
    pub fn select_photo(&mut self, scene: &TreeScene, slot: usize) -> bool {
        let Some(image) = scene.photo_in_slot(slot) else {
            return false;
        };
        self.edit(scene, |config| zoomed_in(config, image))
    }

    /// Close the zoomed photo.
    pub fn dismiss_zoom(&mut self, scene: &TreeScene) -> bool {
        self.edit(scene, zoomed_out)
    }

    /// Are there no edits waiting to be applied?
    pub fn is_empty(&self) -> bool {
        self.pending.is_none()
    }

    /// Take the combined result of every edit, leaving nothing pending.
    pub fn take(&mut self) -> Option<TreeConfig> {
        self.pending.take()
    }
}
