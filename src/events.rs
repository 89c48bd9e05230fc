use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

type Listener<T> = Rc<dyn Fn(&T)>;

struct ChannelInner<T> {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(u64, Listener<T>)>>,
}

pub struct EventChannel<T> {
    inner: Rc<ChannelInner<T>>,
}

impl<T> Clone for EventChannel<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> PartialEq for EventChannel<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: 'static> Default for EventChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> EventChannel<T> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(ChannelInner {
                next_id: Cell::new(0),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));

        let channel: Weak<ChannelInner<T>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(channel) = channel.upgrade() {
                channel
                    .listeners
                    .borrow_mut()
                    .retain(|(listener_id, _)| *listener_id != id);
            }
        })
    }

    /// Delivers `event` to every listener registered at the time of the call.
    /// Listeners may subscribe or unsubscribe while being notified.
    pub fn publish(&self, event: &T) {
        let snapshot: Vec<Listener<T>> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        for listener in snapshot {
            listener(event);
        }
    }

    #[cfg(test)]
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }
}

/// Releases a registration when dropped or when [`Subscription::release`] is called.
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    pub fn release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerMove {
    pub client_x: f64,
    pub client_y: f64,
    pub target_interactive: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerOver {
    pub target_interactive: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Click {
    pub client_x: f64,
    pub client_y: f64,
    pub timestamp_ms: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn aspect(self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }
}

#[derive(Clone, Default, PartialEq)]
pub struct BrowserEvents {
    pub pointer_move: EventChannel<PointerMove>,
    pub pointer_over: EventChannel<PointerOver>,
    pub click: EventChannel<Click>,
    pub resize: EventChannel<Viewport>,
}

impl BrowserEvents {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn listener_counts(&self) -> [usize; 4] {
        [
            self.pointer_move.listener_count(),
            self.pointer_over.listener_count(),
            self.click.listener_count(),
            self.resize.listener_count(),
        ]
    }
}
