//! Full-screen image overlay.

use std::rc::Rc;

use tracing::debug;

use crate::surface::EventSource;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Lightbox {
    #[default]
    Closed,
    Open(String),
}

/// Where inside the open overlay a click landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayClick {
    Backdrop,
    Image,
    CloseButton,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LightboxAction {
    Select(String),
    Click(OverlayClick),
    Key(String),
}

pub fn is_dismiss_key(key: &str) -> bool {
    matches!(key, "Escape" | "Esc")
}

impl Lightbox {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }

    pub fn image(&self) -> Option<&str> {
        match self {
            Self::Open(url) => Some(url),
            Self::Closed => None,
        }
    }

    /// Next state after `action`.
    ///
    /// Selecting while open replaces the image, so at most one is shown.
    /// A click on the image itself keeps the overlay open.
    pub fn apply(&self, action: LightboxAction) -> Lightbox {
        let next = match (self, action) {
            (_, LightboxAction::Select(url)) => Self::Open(url),
            (Self::Open(_), LightboxAction::Click(OverlayClick::Backdrop | OverlayClick::CloseButton)) => Self::Closed,
            (Self::Open(_), LightboxAction::Key(key)) if is_dismiss_key(&key) => Self::Closed,
            (current, _) => current.clone(),
        };

        if next != *self {
            debug!(event = "lightbox_transition", open = next.is_open());
        }
        next
    }
}

/// Keeps a document `keydown` listener only while the lightbox is open.
///
/// Returns `None` for a closed lightbox; the caller drops the guard when the
/// lightbox leaves the open state.
pub fn watch_escape<E: EventSource>(state: &Lightbox, events: &E, on_dismiss: Rc<dyn Fn()>) -> Option<E::Guard> {
    if !state.is_open() {
        return None;
    }

    Some(events.listen_keys(Box::new(move |key| {
        if is_dismiss_key(key) {
            on_dismiss();
        }
    })))
}
