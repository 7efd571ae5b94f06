//! Turns playback state into something a host can draw.
//!
//! The strip always holds the deck twice. Translation is computed from the
//! logical index into the first copy; the second copy only trails behind it
//! so the step from the last slide back to the first never shows a gap.

use std::fmt::Write as _;

use serde::Serialize;

use crate::config::{Configuration, SlideDeck};
use crate::playback::PlaybackState;

pub const PREVIOUS_LABEL: &str = "Previous image";
pub const NEXT_LABEL: &str = "Next image";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    Previous,
    Next,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct NavControl {
    pub direction: Direction,
    pub label: &'static str,
    /// Controls only show on narrow viewports.
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case", rename_all_fields = "kebab-case")]
pub enum SlideView {
    Image {
        logical_index: usize,
        src: String,
        alt: String,
    },
    /// Image wrapped in a link that opens in a new browsing context.
    Link {
        logical_index: usize,
        src: String,
        alt: String,
        href: String,
    },
}

impl SlideView {
    pub fn logical_index(&self) -> usize {
        match self {
            SlideView::Image { logical_index, .. } | SlideView::Link { logical_index, .. } => {
                *logical_index
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TransitionStyle {
    pub duration_ms: u64,
    pub easing: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Frame {
    pub current_index: usize,
    pub paused: bool,
    pub slide_px_width: f32,
    pub translate_x: f32,
    pub transition: TransitionStyle,
    pub aspect_ratio: [u32; 2],
    pub controls: [NavControl; 2],
    pub slides: Vec<SlideView>,
}

/// Holds everything about a frame that does not change while mounted.
#[derive(Debug, Clone)]
pub struct Composer {
    strip: Vec<SlideView>,
    transition: TransitionStyle,
    aspect_ratio: [u32; 2],
}

impl Composer {
    pub fn new(deck: &SlideDeck, cfg: &Configuration) -> Self {
        let strip = deck
            .duplicated()
            .map(|(logical_index, slide)| {
                let src = slide.src.clone();
                let alt = slide.alt.clone();
                match slide.link_target() {
                    Some(href) => SlideView::Link {
                        logical_index,
                        src,
                        alt,
                        href: href.to_string(),
                    },
                    None => SlideView::Image {
                        logical_index,
                        src,
                        alt,
                    },
                }
            })
            .collect();
        Self {
            strip,
            transition: TransitionStyle {
                duration_ms: cfg.transition.duration.as_millis() as u64,
                easing: cfg.transition.easing.trim().to_string(),
            },
            aspect_ratio: cfg.layout.aspect_ratio,
        }
    }

    pub fn strip(&self) -> &[SlideView] {
        &self.strip
    }

    pub fn compose(&self, state: &PlaybackState, wide: bool) -> Frame {
        let control = |direction, label| NavControl {
            direction,
            label,
            visible: !wide,
        };
        Frame {
            current_index: state.current_index,
            paused: state.paused,
            slide_px_width: state.slide_px_width,
            translate_x: state.translation(),
            transition: self.transition.clone(),
            aspect_ratio: self.aspect_ratio,
            controls: [
                control(Direction::Previous, PREVIOUS_LABEL),
                control(Direction::Next, NEXT_LABEL),
            ],
            slides: self.strip.clone(),
        }
    }
}

impl Frame {
    /// Renders the frame as a self-contained HTML fragment.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<div class="carousel" data-index="{}" data-paused="{}">"#,
            self.current_index, self.paused
        );
        let [prev, next] = &self.controls;
        write_control(&mut out, prev);
        let _ = writeln!(
            out,
            r#"  <div class="carousel-track" style="transform: translateX({}px); transition: transform {}ms {};">"#,
            self.translate_x,
            self.transition.duration_ms,
            escape_attr(&self.transition.easing)
        );
        let [w, h] = self.aspect_ratio;
        for slide in &self.slides {
            let _ = write!(
                out,
                r#"    <div class="carousel-slide" style="aspect-ratio: {w} / {h};">"#
            );
            match slide {
                SlideView::Image { src, alt, .. } => {
                    let _ = write!(
                        out,
                        r#"<img src="{}" alt="{}">"#,
                        escape_attr(src),
                        escape_attr(alt)
                    );
                }
                SlideView::Link { src, alt, href, .. } => {
                    let _ = write!(
                        out,
                        r#"<a href="{}" target="_blank" rel="noopener noreferrer"><img src="{}" alt="{}"></a>"#,
                        escape_attr(href),
                        escape_attr(src),
                        escape_attr(alt)
                    );
                }
            }
            out.push_str("</div>\n");
        }
        out.push_str("  </div>\n");
        write_control(&mut out, next);
        out.push_str("</div>\n");
        out
    }
}

fn write_control(out: &mut String, control: &NavControl) {
    let class = match control.direction {
        Direction::Previous => "carousel-prev",
        Direction::Next => "carousel-next",
    };
    let hidden = if control.visible { "" } else { " hidden" };
    let _ = writeln!(
        out,
        r#"  <button type="button" class="{class}" aria-label="{}"{hidden}></button>"#,
        control.label
    );
}

fn escape_attr(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
