use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{
    window, Element, Event, EventTarget, MouseEvent, ScrollBehavior, ScrollIntoViewOptions,
};

use crate::events::{BrowserEvents, Click, PointerMove, PointerOver, Subscription, Viewport};
use crate::pointer::{is_interactive, TargetTraits};
use crate::scene::ScreenRect;

/// Adds a DOM listener that is removed again when the returned subscription
/// is released or dropped.
pub fn listen<E>(target: &EventTarget, kind: &'static str, handler: impl FnMut(E) + 'static) -> Subscription
where
    E: JsCast + 'static,
{
    let mut handler = handler;
    let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        if let Ok(event) = event.dyn_into::<E>() {
            handler(event);
        }
    });

    if target
        .add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())
        .is_err()
    {
        log::warn!("could not listen for `{kind}`");
        return Subscription::new(|| ());
    }

    let target = target.clone();
    Subscription::new(move || {
        let _ = target.remove_event_listener_with_callback(kind, callback.as_ref().unchecked_ref());
    })
}

/// Installs the single window listener per event type and republishes into
/// `events`. Dropping the returned handles detaches them.
pub fn install_bridge(events: &BrowserEvents) -> Vec<Subscription> {
    let Some(win) = window() else {
        return Vec::new();
    };
    let target: &EventTarget = win.as_ref();

    let pointer_move = events.pointer_move.clone();
    let pointer_over = events.pointer_over.clone();
    let click = events.click.clone();
    let resize = events.resize.clone();

    vec![
        listen(target, "mousemove", move |event: MouseEvent| {
            pointer_move.publish(&PointerMove {
                client_x: f64::from(event.client_x()),
                client_y: f64::from(event.client_y()),
                target_interactive: target_is_interactive(event.target()),
            });
        }),
        listen(target, "mouseover", move |event: MouseEvent| {
            pointer_over.publish(&PointerOver {
                target_interactive: target_is_interactive(event.target()),
            });
        }),
        listen(target, "click", move |event: MouseEvent| {
            click.publish(&Click {
                client_x: f64::from(event.client_x()),
                client_y: f64::from(event.client_y()),
                timestamp_ms: event.time_stamp(),
            });
        }),
        listen(target, "resize", move |_: Event| {
            resize.publish(&viewport_size());
        }),
    ]
}

fn target_is_interactive(target: Option<EventTarget>) -> bool {
    let Some(element) = target.and_then(|target| target.dyn_into::<Element>().ok()) else {
        return false;
    };

    let cursor = window()
        .and_then(|w| w.get_computed_style(&element).ok().flatten())
        .and_then(|style| style.get_property_value("cursor").ok())
        .unwrap_or_default();
    let tag_name = element.tag_name();
    let role = element.get_attribute("role");

    is_interactive(TargetTraits {
        cursor: &cursor,
        tag_name: &tag_name,
        role: role.as_deref(),
    })
}

pub fn viewport_size() -> Viewport {
    let Some(win) = window() else {
        return Viewport {
            width: 1280,
            height: 720,
        };
    };

    let width = win
        .inner_width()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(1280.0);
    let height = win
        .inner_height()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(720.0);

    Viewport {
        width: width.max(0.0) as u32,
        height: height.max(0.0) as u32,
    }
}

pub fn device_pixel_ratio() -> f64 {
    window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0)
}

pub fn prefers_reduced_motion() -> bool {
    window()
        .and_then(|w| {
            w.match_media("(prefers-reduced-motion: reduce)")
                .ok()
                .flatten()
        })
        .map(|mq| mq.matches())
        .unwrap_or(false)
}

pub fn element_rect(element: &Element) -> ScreenRect {
    let rect = element.get_bounding_client_rect();
    ScreenRect {
        left: rect.left(),
        top: rect.top(),
        width: rect.width(),
        height: rect.height(),
    }
}

pub fn scroll_to_section(id: &str) {
    let Some(section) = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
    else {
        return;
    };

    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    section.scroll_into_view_with_scroll_into_view_options(&options);
}
