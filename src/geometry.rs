//! Slide width measurement.
//!
//! The playback machine only needs one number: how far the strip moves per
//! logical slide. Providers turn the current layout into that number.

/// What a provider can see of the current layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutContext {
    pub viewport_width: f32,
    pub rendered_slides: usize,
}

pub trait GeometryProvider: Send {
    /// Width of one slide plus its trailing gap, or `None` when no slide is
    /// rendered.
    fn measure_slide(&mut self, layout: &LayoutContext) -> Option<f32>;
}

/// Always reports the same width; used for headless runs and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedGeometry(pub f32);

impl GeometryProvider for FixedGeometry {
    fn measure_slide(&mut self, layout: &LayoutContext) -> Option<f32> {
        (layout.rendered_slides > 0).then_some(self.0)
    }
}

/// Sizes slides the way the strip's stylesheet lays them out: a fixed number
/// of slides per view on each side of the desktop breakpoint, separated by a
/// constant gap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResponsiveGeometry {
    pub gap_px: f32,
    pub slides_per_view_narrow: u32,
    pub slides_per_view_wide: u32,
    pub desktop_breakpoint_px: f32,
}

impl ResponsiveGeometry {
    fn slides_per_view(&self, viewport_width: f32) -> u32 {
        if viewport_width >= self.desktop_breakpoint_px {
            self.slides_per_view_wide
        } else {
            self.slides_per_view_narrow
        }
        .max(1)
    }
}

impl GeometryProvider for ResponsiveGeometry {
    fn measure_slide(&mut self, layout: &LayoutContext) -> Option<f32> {
        if layout.rendered_slides == 0 {
            return None;
        }
        let per_view = self.slides_per_view(layout.viewport_width) as f32;
        let gaps = (per_view - 1.0) * self.gap_px;
        let slide = ((layout.viewport_width - gaps) / per_view).max(0.0);
        Some(slide + self.gap_px)
    }
}

impl<G: GeometryProvider + ?Sized> GeometryProvider for Box<G> {
    fn measure_slide(&mut self, layout: &LayoutContext) -> Option<f32> {
        (**self).measure_slide(layout)
    }
}

/// Clamp a raw measurement to a usable pixel width; anything non-finite or
/// negative reads as zero.
pub fn sanitize_width(raw: f32) -> f32 {
    if raw.is_finite() && raw > 0.0 { raw } else { 0.0 }
}
