//! Capabilities the page behaviors need from the rendering surface.
//!
//! Each behavior takes only the trait it uses. The browser implements these
//! in `browser`; tests use an in-memory page.

use std::time::Duration;

/// Reads the rendered height of the fixed header.
pub trait HeaderProbe {
    /// `None` while the header element is not in the rendered tree.
    fn header_height(&self) -> Option<f64>;
}

/// Window scroll position, read and write.
pub trait Viewport {
    fn scroll_y(&self) -> f64;

    /// Smoothly scrolls the window so that `top` is at the viewport origin.
    fn scroll_to(&self, top: f64);
}

/// A scroll target that may or may not be attached to a rendered element.
pub trait Anchor {
    /// Top edge relative to the viewport, or `None` when detached.
    fn viewport_top(&self) -> Option<f64>;
}

/// Global window events a behavior can subscribe to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PageEvent {
    Resize,
    Scroll,
}

impl PageEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Resize => "resize",
            Self::Scroll => "scroll",
        }
    }

    /// Scroll handlers never call `preventDefault`, so they register passive.
    pub fn passive(self) -> bool {
        matches!(self, Self::Scroll)
    }
}

/// Registration of listeners and deferred callbacks.
///
/// Every registration returns a guard. Dropping the guard releases the
/// listener or cancels the pending callback; a released handler never runs.
pub trait EventSource {
    type Guard;

    fn listen(&self, event: PageEvent, handler: Box<dyn Fn()>) -> Self::Guard;

    /// Document-level `keydown`; the handler receives `KeyboardEvent.key`.
    fn listen_keys(&self, handler: Box<dyn Fn(&str)>) -> Self::Guard;

    fn after(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> Self::Guard;

    /// Runs `callback` once web fonts have finished loading.
    fn when_fonts_ready(&self, callback: Box<dyn FnOnce()>) -> Self::Guard;
}
