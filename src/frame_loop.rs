use std::cell::Cell;
use std::rc::Rc;

/// Shared stop flag for one scene's render loop.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::start;

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::CancellationToken;
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::{closure::Closure, JsCast};
    use web_sys::window;

    type Tick = Rc<RefCell<dyn FnMut(f64)>>;

    /// Runs `tick` once per animation frame until `token` is cancelled. The
    /// token is checked before every frame, so cancelling takes effect before
    /// the next callback does any work.
    pub fn start(token: CancellationToken, tick: impl FnMut(f64) + 'static) {
        let tick: Tick = Rc::new(RefCell::new(tick));
        schedule(token, tick);
    }

    fn schedule(token: CancellationToken, tick: Tick) {
        let Some(win) = window() else {
            return;
        };

        let callback = Closure::once_into_js(move |time: f64| {
            if token.is_cancelled() {
                return;
            }

            if let Ok(mut tick_fn) = tick.try_borrow_mut() {
                (*tick_fn)(time);
            }

            schedule(token, tick);
        });

        if win
            .request_animation_frame(callback.unchecked_ref())
            .is_err()
        {
            log::warn!("requestAnimationFrame rejected; render loop stopped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_cancellation() {
        let token = CancellationToken::new();
        let observer = token.clone();

        assert!(!observer.is_cancelled());
        token.cancel();
        token.cancel();
        assert!(observer.is_cancelled());
    }
}
