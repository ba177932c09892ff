use std::cell::RefCell;
use std::rc::Rc;

use crate::dispose::Dispose;
use crate::element::{ElementRef, is_layout_ready};
use crate::scheduler::Scheduler;

type ReadyFn = Box<dyn FnOnce()>;

struct Pending {
    token: u64,
    on_ready: ReadyFn,
    subscription: Option<Dispose>,
}

#[derive(Default)]
struct GateState {
    pending: Option<Pending>,
    next_token: u64,
}

/// Waits until an element is attached and measured with a positive size.
///
/// Holds at most one registration; a new `check` replaces the previous one.
#[derive(Default)]
pub struct LayoutGate {
    state: Rc<RefCell<GateState>>,
}

impl LayoutGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// One-shot readiness query. Registers nothing.
    pub fn check_ready(&self, element: &ElementRef) -> bool {
        is_layout_ready(&**element)
    }

    pub fn is_pending(&self) -> bool {
        self.state.borrow().pending.is_some()
    }

    /// Fires `on_ready` once `element` is ready. An already-ready element is
    /// reported on the scheduler's next turn; otherwise every layout pass
    /// re-evaluates until the condition holds.
    pub fn check(
        &self,
        element: &ElementRef,
        scheduler: &dyn Scheduler,
        on_ready: impl FnOnce() + 'static,
    ) {
        self.destroy();

        let token = {
            let mut st = self.state.borrow_mut();
            st.next_token += 1;
            let token = st.next_token;
            st.pending = Some(Pending {
                token,
                on_ready: Box::new(on_ready),
                subscription: None,
            });
            token
        };

        if self.check_ready(element) {
            let state = Rc::downgrade(&self.state);
            scheduler.post(Box::new(move || {
                if let Some(state) = state.upgrade() {
                    fire(&state, token);
                }
            }));
            return;
        }

        log::debug!("layout gate: waiting for a measured, attached element");
        let weak_element = Rc::downgrade(element);
        let state = Rc::downgrade(&self.state);
        let subscription = element.on_layout_pass(Rc::new(move || {
            let (Some(element), Some(state)) = (weak_element.upgrade(), state.upgrade()) else {
                return;
            };
            if is_layout_ready(&*element) {
                fire(&state, token);
            }
        }));

        let mut st = self.state.borrow_mut();
        let stale = match st.pending.as_mut() {
            Some(pending) if pending.token == token => {
                pending.subscription = Some(subscription);
                None
            }
            // Already fired during subscription.
            _ => Some(subscription),
        };
        drop(st);
        if let Some(subscription) = stale {
            subscription.run();
        }
    }

    /// Drops the pending registration without firing it. Idempotent.
    pub fn destroy(&self) {
        let pending = self.state.borrow_mut().pending.take();
        if let Some(pending) = pending {
            log::trace!("layout gate: dropping registration {}", pending.token);
            if let Some(sub) = pending.subscription {
                sub.run();
            }
        }
    }
}

impl Drop for LayoutGate {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn fire(state: &Rc<RefCell<GateState>>, token: u64) {
    let pending = {
        let mut st = state.borrow_mut();
        if st.pending.as_ref().is_some_and(|p| p.token == token) {
            st.pending.take()
        } else {
            None
        }
    };
    let Some(pending) = pending else {
        return;
    };
    if let Some(sub) = pending.subscription {
        sub.run();
    }
    (pending.on_ready)();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Size;
    use crate::headless::HeadlessElement;
    use crate::scheduler::TaskQueue;
    use std::cell::Cell;

    fn counter() -> (Rc<Cell<u32>>, impl FnOnce() + 'static) {
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        (hits, move || h.set(h.get() + 1))
    }

    #[test]
    fn test_ready_element_fires_on_next_turn() {
        let el = HeadlessElement::new();
        el.attach();
        el.set_size(Size::new(100.0, 50.0));
        let el_ref: ElementRef = el.clone();

        let q = TaskQueue::new();
        let gate = LayoutGate::new();
        let (hits, on_ready) = counter();
        gate.check(&el_ref, &q, on_ready);

        assert_eq!(hits.get(), 0);
        assert!(gate.is_pending());
        q.run_pending();
        assert_eq!(hits.get(), 1);
        assert!(!gate.is_pending());
    }

    #[test]
    fn test_waits_for_layout_pass() {
        let el = HeadlessElement::new();
        let el_ref: ElementRef = el.clone();
        let q = TaskQueue::new();
        let gate = LayoutGate::new();
        let (hits, on_ready) = counter();
        gate.check(&el_ref, &q, on_ready);

        assert_eq!(q.run_pending(), 0);
        assert_eq!(el.layout_listener_count(), 1);

        el.attach();
        el.layout();
        assert_eq!(hits.get(), 0);

        el.set_size(Size::new(20.0, 20.0));
        el.layout();
        assert_eq!(hits.get(), 1);
        assert_eq!(el.layout_listener_count(), 0);

        el.layout();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_check_replaces_previous_registration() {
        let el = HeadlessElement::new();
        let el_ref: ElementRef = el.clone();
        let q = TaskQueue::new();
        let gate = LayoutGate::new();
        let (first, first_ready) = counter();
        let (second, second_ready) = counter();

        gate.check(&el_ref, &q, first_ready);
        gate.check(&el_ref, &q, second_ready);
        assert_eq!(el.layout_listener_count(), 1);

        el.attach();
        el.set_size(Size::new(1.0, 1.0));
        el.layout();
        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 1);
    }

    #[test]
    fn test_destroy_cancels_without_firing() {
        let el = HeadlessElement::new();
        el.attach();
        el.set_size(Size::new(5.0, 5.0));
        let el_ref: ElementRef = el.clone();
        let q = TaskQueue::new();
        let gate = LayoutGate::new();

        let (posted, on_ready) = counter();
        gate.check(&el_ref, &q, on_ready);
        gate.destroy();
        gate.destroy();
        q.run_pending();
        assert_eq!(posted.get(), 0);

        el.set_size(Size::ZERO);
        let (waiting, on_ready) = counter();
        gate.check(&el_ref, &q, on_ready);
        gate.destroy();
        assert_eq!(el.layout_listener_count(), 0);
        el.set_size(Size::new(5.0, 5.0));
        el.layout();
        assert_eq!(waiting.get(), 0);
    }

    #[test]
    fn test_detach_keeps_waiting() {
        let el = HeadlessElement::new();
        el.attach();
        let el_ref: ElementRef = el.clone();
        let q = TaskQueue::new();
        let gate = LayoutGate::new();
        let (hits, on_ready) = counter();
        gate.check(&el_ref, &q, on_ready);

        el.detach();
        assert!(gate.is_pending());

        el.attach();
        el.set_size(Size::new(3.0, 4.0));
        el.layout();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_check_ready_is_one_shot() {
        let el = HeadlessElement::new();
        let el_ref: ElementRef = el.clone();
        let gate = LayoutGate::new();
        assert!(!gate.check_ready(&el_ref));
        assert!(!gate.is_pending());
        assert_eq!(el.layout_listener_count(), 0);

        el.attach();
        el.set_size(Size::new(100.0, 50.0));
        assert!(gate.check_ready(&el_ref));
    }
}
