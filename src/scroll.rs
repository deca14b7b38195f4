//! Section navigation and the back-to-top indicator.

use std::rc::Rc;

use tracing::debug;

use crate::{
    layout::HeaderHeight,
    surface::{Anchor, EventSource, PageEvent, Viewport},
};

pub const SHOW_TOP_THRESHOLD_PX: f64 = 300.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Section {
    About,
    Skills,
    Experience,
    Projects,
    Contact,
}

impl Section {
    /// Navigation order.
    pub const ALL: [Section; 5] = [
        Section::About,
        Section::Skills,
        Section::Experience,
        Section::Projects,
        Section::Contact,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::About => "about",
            Self::Skills => "skills",
            Self::Experience => "experience",
            Self::Projects => "projects",
            Self::Contact => "contact",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::About => "About",
            Self::Skills => "Skills",
            Self::Experience => "Experience",
            Self::Projects => "Projects",
            Self::Contact => "Contact",
        }
    }
}

pub fn show_top(scroll_y: f64) -> bool {
    scroll_y > SHOW_TOP_THRESHOLD_PX
}

/// Window offset that puts a section's top edge `header.scroll_offset()`
/// below the viewport top.
pub fn section_target(viewport_top: f64, scroll_y: f64, header: HeaderHeight) -> f64 {
    viewport_top + scroll_y - header.scroll_offset()
}

/// Returns the offset scrolled to, or `None` when the anchor is detached.
pub fn scroll_to_section<A, V>(anchor: &A, viewport: &V, header: HeaderHeight) -> Option<f64>
where
    A: Anchor + ?Sized,
    V: Viewport + ?Sized,
{
    let Some(viewport_top) = anchor.viewport_top() else {
        debug!(event = "section_scroll_skipped", "anchor not attached");
        return None;
    };

    let target = section_target(viewport_top, viewport.scroll_y(), header);
    viewport.scroll_to(target);
    Some(target)
}

/// Scrolls to the document origin. Returns `false` when already there.
pub fn scroll_to_top<V: Viewport + ?Sized>(viewport: &V) -> bool {
    if viewport.scroll_y() <= 0.0 {
        return false;
    }
    viewport.scroll_to(0.0);
    true
}

pub fn watch_scroll<V, E>(viewport: Rc<V>, events: &E, on_change: Rc<dyn Fn(bool)>) -> E::Guard
where
    V: Viewport + 'static,
    E: EventSource,
{
    let update = move || on_change(show_top(viewport.scroll_y()));
    update();
    events.listen(PageEvent::Scroll, Box::new(update))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeAnchor, FakePage};
    use std::cell::Cell;

    #[test]
    fn threshold_is_strict() {
        assert!(!show_top(0.0));
        assert!(!show_top(299.9));
        assert!(!show_top(300.0));
        assert!(show_top(300.5));
        assert!(show_top(4_000.0));
    }

    #[test]
    fn section_lands_below_measured_header() {
        let page = FakePage::new();
        page.user_scroll(500.0);
        let anchor = FakeAnchor {
            document_top: Some(2_000.0),
            page: page.clone(),
        };

        let target = scroll_to_section(&anchor, &page, HeaderHeight::measured(184.0));

        assert_eq!(target, Some(2_000.0 - 200.0));
        assert_eq!(page.scroll_calls(), vec![1_800.0]);
        assert_eq!(anchor.viewport_top(), Some(200.0));
    }

    #[test]
    fn section_uses_fallback_offset_before_measurement() {
        let page = FakePage::new();
        let anchor = FakeAnchor {
            document_top: Some(1_000.0),
            page: page.clone(),
        };

        scroll_to_section(&anchor, &page, HeaderHeight::unmeasured());

        assert_eq!(page.scroll_calls(), vec![904.0]);
    }

    #[test]
    fn detached_anchor_is_a_no_op() {
        let page = FakePage::new();
        let anchor = FakeAnchor {
            document_top: None,
            page: page.clone(),
        };

        assert_eq!(scroll_to_section(&anchor, &page, HeaderHeight::measured(120.0)), None);
        assert!(page.scroll_calls().is_empty());
    }

    #[test]
    fn back_to_top_ignores_header_height() {
        let page = FakePage::new();
        page.user_scroll(1_250.0);

        assert!(scroll_to_top(&page));
        assert_eq!(page.scroll_calls(), vec![0.0]);
    }

    #[test]
    fn back_to_top_at_origin_emits_no_scroll() {
        let page = FakePage::new();
        let before = page.scroll_events();

        assert!(!scroll_to_top(&page));
        assert!(page.scroll_calls().is_empty());
        assert_eq!(page.scroll_events(), before);
    }

    #[test]
    fn indicator_evaluates_eagerly_and_on_scroll() {
        let page = FakePage::new();
        page.user_scroll(450.0);
        let shown = Rc::new(Cell::new(false));
        let sink = Rc::clone(&shown);

        let _guard = watch_scroll(Rc::new(page.clone()), &page, Rc::new(move |value: bool| sink.set(value)));
        assert!(shown.get());
        assert!(page.registered_passive(PageEvent::Scroll));

        page.user_scroll(300.0);
        assert!(!shown.get());
        page.user_scroll(301.0);
        assert!(shown.get());
    }

    #[test]
    fn indicator_stops_after_unmount() {
        let page = FakePage::new();
        let shown = Rc::new(Cell::new(false));
        let sink = Rc::clone(&shown);
        let guard = watch_scroll(Rc::new(page.clone()), &page, Rc::new(move |value: bool| sink.set(value)));

        drop(guard);
        page.user_scroll(900.0);

        assert!(!shown.get());
        assert_eq!(page.live_registrations(), 0);
    }

    #[test]
    fn sections_have_unique_ids_in_nav_order() {
        let ids: Vec<_> = Section::ALL.iter().map(|section| section.id()).collect();
        assert_eq!(ids, ["about", "skills", "experience", "projects", "contact"]);
    }
}
