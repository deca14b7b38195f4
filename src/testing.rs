//! In-memory rendering surface for unit tests.

use std::{
    cell::RefCell,
    rc::{Rc, Weak},
    time::Duration,
};

use crate::surface::{Anchor, EventSource, HeaderProbe, PageEvent, Viewport};

struct Timer {
    id: u64,
    due: Duration,
    callback: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct PageState {
    header_height: Option<f64>,
    scroll_y: f64,
    scroll_calls: Vec<f64>,
    scroll_events: usize,
    elapsed: Duration,
    next_id: u64,
    listeners: Vec<(u64, PageEvent, Rc<dyn Fn()>)>,
    passive: Vec<PageEvent>,
    key_listeners: Vec<(u64, Rc<dyn Fn(&str)>)>,
    timers: Vec<Timer>,
    font_waiters: Vec<(u64, Box<dyn FnOnce()>)>,
}

impl PageState {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn release(&mut self, id: u64) {
        self.listeners.retain(|(listener_id, _, _)| *listener_id != id);
        self.key_listeners.retain(|(listener_id, _)| *listener_id != id);
        self.timers.retain(|timer| timer.id != id);
        self.font_waiters.retain(|(waiter_id, _)| *waiter_id != id);
    }
}

#[derive(Clone, Default)]
pub struct FakePage {
    state: Rc<RefCell<PageState>>,
}

pub struct FakeGuard {
    id: u64,
    state: Weak<RefCell<PageState>>,
}

impl Drop for FakeGuard {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            state.borrow_mut().release(self.id);
        }
    }
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_header_height(&self, height: Option<f64>) {
        self.state.borrow_mut().header_height = height;
    }

    /// Moves the window as a user would and dispatches `scroll`.
    pub fn user_scroll(&self, y: f64) {
        self.state.borrow_mut().scroll_y = y;
        self.fire(PageEvent::Scroll);
    }

    pub fn fire(&self, event: PageEvent) {
        let handlers: Vec<Rc<dyn Fn()>> = {
            let mut state = self.state.borrow_mut();
            if event == PageEvent::Scroll {
                state.scroll_events += 1;
            }
            state
                .listeners
                .iter()
                .filter(|(_, registered, _)| *registered == event)
                .map(|(_, _, handler)| Rc::clone(handler))
                .collect()
        };

        for handler in handlers {
            handler();
        }
    }

    pub fn press(&self, key: &str) {
        let handlers: Vec<Rc<dyn Fn(&str)>> = self
            .state
            .borrow()
            .key_listeners
            .iter()
            .map(|(_, handler)| Rc::clone(handler))
            .collect();

        for handler in handlers {
            handler(key);
        }
    }

    /// Advances the clock, running every timer that comes due.
    pub fn elapse(&self, delta: Duration) {
        let due = {
            let mut state = self.state.borrow_mut();
            state.elapsed += delta;
            let now = state.elapsed;
            let (due, pending): (Vec<Timer>, Vec<Timer>) =
                state.timers.drain(..).partition(|timer| timer.due <= now);
            state.timers = pending;
            due
        };

        for timer in due {
            (timer.callback)();
        }
    }

    pub fn finish_font_loading(&self) {
        let waiters: Vec<(u64, Box<dyn FnOnce()>)> =
            self.state.borrow_mut().font_waiters.drain(..).collect();

        for (_, callback) in waiters {
            callback();
        }
    }

    pub fn scroll_calls(&self) -> Vec<f64> {
        self.state.borrow().scroll_calls.clone()
    }

    pub fn scroll_events(&self) -> usize {
        self.state.borrow().scroll_events
    }

    /// Listeners, key listeners, timers and font waiters still registered.
    pub fn live_registrations(&self) -> usize {
        let state = self.state.borrow();
        state.listeners.len() + state.key_listeners.len() + state.timers.len() + state.font_waiters.len()
    }

    pub fn key_listener_count(&self) -> usize {
        self.state.borrow().key_listeners.len()
    }

    pub fn registered_passive(&self, event: PageEvent) -> bool {
        self.state.borrow().passive.contains(&event)
    }

    fn guard(&self, id: u64) -> FakeGuard {
        FakeGuard {
            id,
            state: Rc::downgrade(&self.state),
        }
    }
}

impl HeaderProbe for FakePage {
    fn header_height(&self) -> Option<f64> {
        self.state.borrow().header_height
    }
}

impl Viewport for FakePage {
    fn scroll_y(&self) -> f64 {
        self.state.borrow().scroll_y
    }

    fn scroll_to(&self, top: f64) {
        let top = top.max(0.0);
        let moved = {
            let mut state = self.state.borrow_mut();
            state.scroll_calls.push(top);
            let moved = state.scroll_y != top;
            state.scroll_y = top;
            moved
        };

        if moved {
            self.fire(PageEvent::Scroll);
        }
    }
}

impl EventSource for FakePage {
    type Guard = FakeGuard;

    fn listen(&self, event: PageEvent, handler: Box<dyn Fn()>) -> FakeGuard {
        let id = {
            let mut state = self.state.borrow_mut();
            let id = state.allocate_id();
            state.listeners.push((id, event, Rc::from(handler)));
            if event.passive() {
                state.passive.push(event);
            }
            id
        };
        self.guard(id)
    }

    fn listen_keys(&self, handler: Box<dyn Fn(&str)>) -> FakeGuard {
        let id = {
            let mut state = self.state.borrow_mut();
            let id = state.allocate_id();
            state.key_listeners.push((id, Rc::from(handler)));
            id
        };
        self.guard(id)
    }

    fn after(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> FakeGuard {
        let id = {
            let mut state = self.state.borrow_mut();
            let id = state.allocate_id();
            let due = state.elapsed + delay;
            state.timers.push(Timer { id, due, callback });
            id
        };
        self.guard(id)
    }

    fn when_fonts_ready(&self, callback: Box<dyn FnOnce()>) -> FakeGuard {
        let id = {
            let mut state = self.state.borrow_mut();
            let id = state.allocate_id();
            state.font_waiters.push((id, callback));
            id
        };
        self.guard(id)
    }
}

/// A section heading placed at a fixed document offset.
pub struct FakeAnchor {
    pub document_top: Option<f64>,
    pub page: FakePage,
}

impl Anchor for FakeAnchor {
    fn viewport_top(&self) -> Option<f64> {
        self.document_top.map(|top| top - self.page.scroll_y())
    }
}
