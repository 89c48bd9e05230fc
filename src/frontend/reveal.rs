use js_sys::Array;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};
use yew::prelude::*;

use crate::reveal::{RevealLatch, REVEAL_THRESHOLD};

struct RevealObserver {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array)>,
}

impl Drop for RevealObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

fn observe(element: &Element, on_reveal: impl Fn() + 'static) -> Option<RevealObserver> {
    let mut latch = RevealLatch::new();
    let callback = Closure::<dyn FnMut(Array)>::new(move |entries: Array| {
        for entry in entries.iter() {
            let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                continue;
            };

            if latch.observe(entry.is_intersecting()) {
                on_reveal();
            }
        }
    });

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(REVEAL_THRESHOLD));

    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options).ok()?;
    observer.observe(element);

    Some(RevealObserver {
        observer,
        _callback: callback,
    })
}

/// Latches to `true` once the referenced element first intersects the viewport.
/// The observer is disconnected when the component unmounts.
#[hook]
pub fn use_reveal(node: NodeRef) -> bool {
    let visible = use_state(|| false);

    {
        let visible = visible.clone();
        use_effect_with(node, move |node| {
            let observer = node.cast::<Element>().and_then(|element| {
                let id = element.id();
                observe(&element, move || {
                    log::debug!("section `{id}` revealed");
                    visible.set(true);
                })
            });

            move || drop(observer)
        });
    }

    *visible
}
