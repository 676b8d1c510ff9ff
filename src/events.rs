// In-process publish/subscribe between the surface, the host window and the dropper.
// Single-threaded: handlers run synchronously inside `publish`, in subscription order.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::mem;
use std::rc::{Rc, Weak};

use crate::color::HexColor;

/// Square block of sampled colors around the cursor, row-major, `grid_size²` long.
pub type Neighborhood = Vec<HexColor>;

/// What the surface emits once per pointer move over it.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleEvent {
    pub neighborhood: Neighborhood,
    pub center_color: HexColor,
}

/// Document-level pointer position in viewport coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerMove {
    pub x: f32,
    pub y: f32,
}

/// The pointer crossed the surface boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Crossing {
    Enter,
    Leave,
}

/// Click/tap on the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Confirm;

type Handler<T> = Box<dyn FnMut(&T)>;

struct Registry<T> {
    next_id: u64,
    handlers: Vec<(u64, Handler<T>)>,
    depth: usize,                 // dispatches in flight
    released_in_flight: Vec<u64>, // ids released while their handler list was taken
    queued: VecDeque<T>,          // published by a handler, delivered after the current event
}

impl<T> Registry<T> {
    fn release(&mut self, id: u64) {
        if self.depth > 0 {
            self.released_in_flight.push(id);
        }
        self.handlers.retain(|(h, _)| *h != id);
    }
}

/// A typed channel. Cloning yields another handle to the same channel.
pub struct Topic<T> {
    inner: Rc<RefCell<Registry<T>>>,
}

impl<T> Clone for Topic<T> {
    fn clone(&self) -> Self {
        Self { inner: Rc::clone(&self.inner) }
    }
}

impl<T: 'static> Default for Topic<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Topic<T> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Registry {
                next_id: 0,
                handlers: Vec::new(),
                depth: 0,
                released_in_flight: Vec::new(),
                queued: VecDeque::new(),
            })),
        }
    }

    /// Register `handler`. It stays live until the returned handle is released or dropped.
    pub fn subscribe(&self, handler: impl FnMut(&T) + 'static) -> Subscription {
        let id = {
            let mut reg = self.inner.borrow_mut();
            let id = reg.next_id;
            reg.next_id += 1;
            reg.handlers.push((id, Box::new(handler)));
            id
        };

        let weak: Weak<RefCell<Registry<T>>> = Rc::downgrade(&self.inner);
        Subscription {
            release: Some(Box::new(move || {
                if let Some(reg) = weak.upgrade() {
                    reg.borrow_mut().release(id);
                }
            })),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().handlers.len()
    }
}

impl<T: Clone + 'static> Topic<T> {
    /// Deliver `event` to every live handler before returning.
    ///
    /// Handlers may release subscriptions (their own included) while running;
    /// a handler released mid-dispatch is not called afterwards. An event a
    /// handler publishes on the same topic is queued and delivered to every
    /// handler once the current event has been seen by all of them.
    pub fn publish(&self, event: &T) {
        {
            let mut reg = self.inner.borrow_mut();
            if reg.depth > 0 {
                reg.queued.push_back(event.clone());
                return;
            }
        }

        self.dispatch(event);
        loop {
            let next = self.inner.borrow_mut().queued.pop_front();
            match next {
                Some(queued) => self.dispatch(&queued),
                None => break,
            }
        }
    }

    fn dispatch(&self, event: &T) {
        let mut active = {
            let mut reg = self.inner.borrow_mut();
            reg.depth += 1;
            mem::take(&mut reg.handlers)
        };

        for (id, handler) in active.iter_mut() {
            if self.inner.borrow().released_in_flight.contains(id) {
                continue;
            }
            handler(event);
        }

        let mut reg = self.inner.borrow_mut();
        reg.depth -= 1;
        let released = &reg.released_in_flight;
        active.retain(|(id, _)| !released.contains(id));
        let added = mem::replace(&mut reg.handlers, active);
        reg.handlers.extend(added);
        if reg.depth == 0 {
            reg.released_in_flight.clear();
        }
    }
}

/// Handle returned by [`Topic::subscribe`]. Releasing (or dropping) it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn release(mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

/// Notifications the host UI layer delivers (document pointer, surface boundary, clicks).
#[derive(Clone, Default)]
pub struct HostEvents {
    pub pointer_moves: Topic<PointerMove>,
    pub crossings: Topic<Crossing>,
    pub confirms: Topic<Confirm>,
}

impl HostEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total live subscriptions across all host channels.
    pub fn subscriber_count(&self) -> usize {
        self.pointer_moves.subscriber_count()
            + self.crossings.subscriber_count()
            + self.confirms.subscriber_count()
    }
}
