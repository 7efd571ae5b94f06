use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

use crate::geometry::ResponsiveGeometry;

pub use carousel_model::{Slide, SlideDeck};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct TransitionConfig {
    /// Duration of the external slide transition.
    #[serde(with = "humantime_serde")]
    pub duration: Duration,
    /// CSS easing keyword or function applied to the transition.
    pub easing: String,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(500),
            easing: "ease-in-out".to_string(),
        }
    }
}

impl TransitionConfig {
    fn validate(&self) -> Result<()> {
        ensure!(
            !self.easing.trim().is_empty(),
            "transition.easing must not be blank"
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Gap trailing every slide, in logical pixels.
    pub gap_px: f32,
    /// Slides sharing the strip below the desktop breakpoint.
    pub slides_per_view_narrow: u32,
    /// Slides sharing the strip at or above the desktop breakpoint.
    pub slides_per_view_wide: u32,
    /// Fixed width:height of every slide box.
    pub aspect_ratio: [u32; 2],
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            gap_px: 16.0,
            slides_per_view_narrow: 1,
            slides_per_view_wide: 3,
            aspect_ratio: [16, 9],
        }
    }
}

impl LayoutConfig {
    fn validate(&self) -> Result<()> {
        ensure!(
            self.gap_px.is_finite() && self.gap_px >= 0.0,
            "layout.gap-px must be non-negative"
        );
        ensure!(
            self.slides_per_view_narrow >= 1,
            "layout.slides-per-view-narrow must be >= 1"
        );
        ensure!(
            self.slides_per_view_wide >= 1,
            "layout.slides-per-view-wide must be >= 1"
        );
        ensure!(
            self.aspect_ratio.iter().all(|term| *term > 0),
            "layout.aspect-ratio terms must be greater than zero"
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Configuration {
    /// Slides declared inline in the config file.
    pub slides: SlideDeck,
    /// Optional external deck appended after the inline slides.
    pub slides_file: Option<PathBuf>,
    /// Period between automatic advances.
    #[serde(with = "humantime_serde")]
    pub autoplay_interval: Duration,
    /// How long manual navigation keeps autoplay suppressed.
    #[serde(with = "humantime_serde")]
    pub interaction_cooldown: Duration,
    /// Delay after mount before the first geometry measurement.
    #[serde(with = "humantime_serde")]
    pub initial_measure_delay: Duration,
    /// Viewports at least this wide react to pointer hover.
    pub desktop_breakpoint_px: f32,
    /// Minimum intersection ratio that counts as visible.
    pub visibility_threshold: f32,
    /// Viewport width assumed until the first resize event.
    pub initial_viewport_width: f32,
    pub transition: TransitionConfig,
    pub layout: LayoutConfig,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            slides: SlideDeck::default(),
            slides_file: None,
            autoplay_interval: Duration::from_secs(3),
            interaction_cooldown: Duration::from_secs(3),
            initial_measure_delay: Duration::from_millis(100),
            desktop_breakpoint_px: 768.0,
            visibility_threshold: 0.1,
            initial_viewport_width: 1280.0,
            transition: TransitionConfig::default(),
            layout: LayoutConfig::default(),
        }
    }
}

impl Configuration {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&s)?)
    }

    /// Validate runtime invariants and merge `slides-file` into the deck.
    ///
    /// A relative `slides-file` resolves against `base_dir` when one is given.
    pub fn validated(mut self, base_dir: Option<&Path>) -> Result<Self> {
        ensure!(
            !self.autoplay_interval.is_zero(),
            "autoplay-interval must be greater than zero"
        );
        ensure!(
            !self.interaction_cooldown.is_zero(),
            "interaction-cooldown must be greater than zero"
        );
        ensure!(
            self.desktop_breakpoint_px.is_finite() && self.desktop_breakpoint_px >= 0.0,
            "desktop-breakpoint-px must be non-negative"
        );
        ensure!(
            (0.0..=1.0).contains(&self.visibility_threshold),
            "visibility-threshold must be within [0, 1]"
        );
        ensure!(
            self.initial_viewport_width.is_finite() && self.initial_viewport_width >= 0.0,
            "initial-viewport-width must be non-negative"
        );
        self.transition
            .validate()
            .context("invalid transition options")?;
        self.layout.validate().context("invalid layout options")?;

        if let Some(file) = self.slides_file.take() {
            let path = match base_dir {
                Some(dir) if file.is_relative() => dir.join(&file),
                _ => file,
            };
            let extra = SlideDeck::from_path(&path)?;
            self.slides.extend(extra);
        }
        Ok(self)
    }

    /// Whether a viewport of `width` counts as desktop for hover handling.
    pub fn is_wide(&self, width: f32) -> bool {
        width >= self.desktop_breakpoint_px
    }

    pub fn geometry(&self) -> ResponsiveGeometry {
        ResponsiveGeometry {
            gap_px: self.layout.gap_px,
            slides_per_view_narrow: self.layout.slides_per_view_narrow,
            slides_per_view_wide: self.layout.slides_per_view_wide,
            desktop_breakpoint_px: self.desktop_breakpoint_px,
        }
    }
}
