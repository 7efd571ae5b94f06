use std::time::Duration;

/// Signals delivered to a mounted carousel by its host environment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CarouselInput {
    /// "Next image" control pressed.
    Next,
    /// "Previous image" control pressed.
    Prev,
    /// Intersection observer report for the container.
    Visibility { intersection_ratio: f32 },
    PointerEnter,
    PointerLeave,
    /// Viewport resized; triggers a fresh measurement.
    Resize { viewport_width: f32 },
}

/// One line of a host script: either a carousel signal or host-side pacing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScriptCommand {
    Input(CarouselInput),
    Wait(Duration),
    Quit,
}
