//! Fixed-header measurement.

use std::{rc::Rc, time::Duration};

use tracing::debug;

use crate::surface::{EventSource, HeaderProbe, PageEvent};

pub const HEADER_ID: &str = "site-header";
pub const BREATHING_ROOM_PX: f64 = 16.0;
pub const FALLBACK_SCROLL_OFFSET_PX: f64 = 96.0;
pub const CONTENT_PADDING_EXTRA_PX: f64 = 32.0;
pub const FALLBACK_CONTENT_PADDING_PX: f64 = 300.0;
pub const REMEASURE_DELAY: Duration = Duration::from_millis(300);

/// Last successful measurement of the fixed header, if any.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HeaderHeight(Option<f64>);

impl HeaderHeight {
    pub fn unmeasured() -> Self {
        Self(None)
    }

    pub fn measured(pixels: f64) -> Self {
        Self(Some(pixels))
    }

    pub fn pixels(self) -> Option<f64> {
        self.0
    }

    /// Distance from the viewport top at which a scrolled-to section lands.
    pub fn scroll_offset(self) -> f64 {
        self.0
            .map(|height| height + BREATHING_ROOM_PX)
            .unwrap_or(FALLBACK_SCROLL_OFFSET_PX)
    }

    /// Top padding reserved on the content area below the header.
    pub fn content_padding(self) -> f64 {
        match self.0 {
            Some(height) if height > 0.0 => height + CONTENT_PADDING_EXTRA_PX,
            _ => FALLBACK_CONTENT_PADDING_PX,
        }
    }
}

/// Reads the header once. Returns `None` and leaves state alone when the
/// header is not rendered yet.
pub fn measure<P: HeaderProbe + ?Sized>(probe: &P) -> Option<HeaderHeight> {
    let height = probe.header_height();
    if height.is_none() {
        debug!(event = "header_measure_skipped", "header element not mounted");
    }
    height.map(HeaderHeight::measured)
}

/// Keeps the header measurement current for as long as it is alive.
///
/// Holds the resize listener, the deferred re-measure and the font-load
/// re-measure. Dropping it releases all three.
pub struct HeaderWatch<G> {
    _registrations: Vec<G>,
}

pub fn watch_header<P, E>(probe: Rc<P>, events: &E, on_measure: Rc<dyn Fn(HeaderHeight)>) -> HeaderWatch<E::Guard>
where
    P: HeaderProbe + 'static,
    E: EventSource,
{
    let update: Rc<dyn Fn()> = Rc::new(move || {
        if let Some(height) = measure(&*probe) {
            debug!(event = "header_measured", height = ?height.pixels());
            on_measure(height);
        }
    });

    update();

    let on_resize = Rc::clone(&update);
    let on_timer = Rc::clone(&update);
    let on_fonts = update;

    HeaderWatch {
        _registrations: vec![
            events.listen(PageEvent::Resize, Box::new(move || on_resize())),
            events.after(REMEASURE_DELAY, Box::new(move || on_timer())),
            events.when_fonts_ready(Box::new(move || on_fonts())),
        ],
    }
}
