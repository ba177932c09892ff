use std::collections::HashMap;
use std::rc::Rc;

use crate::element::{ElementRef, WeakElement, element_key};
use crate::scheduler::Scheduler;
use crate::visibility::VisibilityAnimator;

struct Entry {
    element: WeakElement,
    animator: VisibilityAnimator,
}

/// One coordinator per element, looked up by element identity.
///
/// Owned by the host. Entries do not keep their element alive: the entry of a
/// dropped element is purged on the next access, which also drops its
/// coordinator.
pub struct AnimatorRegistry {
    scheduler: Rc<dyn Scheduler>,
    entries: HashMap<usize, Entry>,
}

impl AnimatorRegistry {
    pub fn new(scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            scheduler,
            entries: HashMap::new(),
        }
    }

    /// The coordinator bound to `element`, created on first use.
    pub fn of(&mut self, element: &ElementRef) -> VisibilityAnimator {
        self.purge();
        let scheduler = &self.scheduler;
        self.entries
            .entry(element_key(element))
            .or_insert_with(|| Entry {
                element: Rc::downgrade(element),
                animator: VisibilityAnimator::new(element, scheduler.clone()),
            })
            .animator
            .clone()
    }

    pub fn get(&self, element: &ElementRef) -> Option<VisibilityAnimator> {
        self.entries
            .get(&element_key(element))
            .filter(|e| e.element.strong_count() > 0)
            .map(|e| e.animator.clone())
    }

    /// Drops entries whose element is gone.
    pub fn purge(&mut self) {
        self.entries.retain(|_, e| e.element.strong_count() > 0);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
