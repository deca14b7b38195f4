//! `web_sys` implementations of the surface capabilities.

use std::{cell::Cell, rc::Rc, time::Duration};

use chrono::NaiveDate;
use js_sys::Date;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    window, AddEventListenerOptions, Element, Event, EventTarget, HtmlElement, KeyboardEvent, ScrollBehavior,
    ScrollToOptions, Window,
};
use yew::NodeRef;

use crate::surface::{Anchor, EventSource, HeaderProbe, PageEvent, Viewport};

/// Live registration on the page. Dropping it unregisters.
pub enum Registration {
    Listener {
        target: EventTarget,
        event: &'static str,
        callback: Closure<dyn FnMut(Event)>,
    },
    Timeout {
        window: Window,
        handle: i32,
        _callback: Closure<dyn FnMut()>,
    },
    Pending(Rc<Cell<bool>>),
    Inert,
}

impl Drop for Registration {
    fn drop(&mut self) {
        match self {
            Self::Listener {
                target,
                event,
                callback,
            } => {
                let _ = target.remove_event_listener_with_callback(*event, callback.as_ref().unchecked_ref());
            }
            Self::Timeout { window, handle, .. } => window.clear_timeout_with_handle(*handle),
            Self::Pending(cancelled) => cancelled.set(true),
            Self::Inert => {}
        }
    }
}

fn add_listener(
    target: EventTarget,
    event: &'static str,
    passive: bool,
    handler: impl FnMut(Event) + 'static,
) -> Registration {
    let callback = Closure::<dyn FnMut(Event)>::new(handler);
    let options = AddEventListenerOptions::new();
    options.set_passive(passive);

    match target.add_event_listener_with_callback_and_add_event_listener_options(
        event,
        callback.as_ref().unchecked_ref(),
        &options,
    ) {
        Ok(()) => Registration::Listener {
            target,
            event,
            callback,
        },
        Err(_) => Registration::Inert,
    }
}

#[derive(Clone)]
pub struct BrowserPage {
    window: Window,
}

impl BrowserPage {
    pub fn current() -> Option<Self> {
        window().map(|window| Self { window })
    }
}

impl Viewport for BrowserPage {
    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn scroll_to(&self, top: f64) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }
}

impl EventSource for BrowserPage {
    type Guard = Registration;

    fn listen(&self, event: PageEvent, handler: Box<dyn Fn()>) -> Registration {
        let target: EventTarget = self.window.clone().into();
        add_listener(target, event.as_str(), event.passive(), move |_| handler())
    }

    fn listen_keys(&self, handler: Box<dyn Fn(&str)>) -> Registration {
        let Some(document) = self.window.document() else {
            return Registration::Inert;
        };

        add_listener(document.into(), "keydown", false, move |event: Event| {
            if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                handler(event.key().as_str());
            }
        })
    }

    fn after(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> Registration {
        let mut callback = Some(callback);
        let closure = Closure::<dyn FnMut()>::new(move || {
            if let Some(callback) = callback.take() {
                callback();
            }
        });
        let delay_ms = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);

        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(closure.as_ref().unchecked_ref(), delay_ms)
        {
            Ok(handle) => Registration::Timeout {
                window: self.window.clone(),
                handle,
                _callback: closure,
            },
            Err(_) => Registration::Inert,
        }
    }

    fn when_fonts_ready(&self, callback: Box<dyn FnOnce()>) -> Registration {
        let Some(ready) = self.window.document().and_then(|document| document.fonts().ready().ok()) else {
            return Registration::Inert;
        };

        let cancelled = Rc::new(Cell::new(false));
        let observed = Rc::clone(&cancelled);
        spawn_local(async move {
            if JsFuture::from(ready).await.is_ok() && !observed.get() {
                callback();
            }
        });
        Registration::Pending(cancelled)
    }
}

/// Looks the element up on every read so late mounts are picked up.
pub struct ElementById(pub &'static str);

impl HeaderProbe for ElementById {
    fn header_height(&self) -> Option<f64> {
        let element = window()?.document()?.get_element_by_id(self.0)?;
        let element = element.dyn_into::<HtmlElement>().ok()?;
        Some(f64::from(element.offset_height()))
    }
}

pub struct NodeAnchor<'a>(pub &'a NodeRef);

impl Anchor for NodeAnchor<'_> {
    fn viewport_top(&self) -> Option<f64> {
        self.0
            .cast::<Element>()
            .map(|element| element.get_bounding_client_rect().top())
    }
}

/// Local calendar date, as the visitor's clock reports it.
pub fn today() -> Option<NaiveDate> {
    let now = Date::new_0();
    let year = i32::try_from(now.get_full_year()).ok()?;
    NaiveDate::from_ymd_opt(year, now.get_month() + 1, now.get_date())
}

pub fn log_error(message: &str) {
    web_sys::console::error_1(&JsValue::from_str(message));
}
