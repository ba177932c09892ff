//! Show/hide orchestration for one element.
//!
//! The coordinator decides whether a request animates at all, keeps the two
//! directions mutually exclusive, writes the resulting visibility to the
//! element and mirrors it onto follower elements.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use smallvec::SmallVec;

use crate::animator::{AnimationEvent, AnimatorCreator, Direction, ListenerRef, NoAnimation};
use crate::dispose::Dispose;
use crate::element::{ElementRef, Visibility, WeakElement};
use crate::error::{Error, Result};
use crate::gate::LayoutGate;
use crate::handler::AnimatorHandler;
use crate::scheduler::Scheduler;

/// Where the element stands, as seen by its coordinator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimatorState {
    Visible,
    Hidden,
    Showing,
    Hiding,
}

struct Inner {
    element: WeakElement,
    scheduler: Rc<dyn Scheduler>,
    handler: AnimatorHandler,
    gate: LayoutGate,
    hide_visibility: Cell<Visibility>,
    creator: RefCell<Rc<dyn AnimatorCreator>>,
    followers: RefCell<SmallVec<[WeakElement; 4]>>,
    detach: RefCell<Option<Dispose>>,
}

impl Inner {
    fn element(&self) -> Option<ElementRef> {
        self.element.upgrade()
    }

    fn on_animation_event(&self, direction: Direction, event: AnimationEvent) {
        match (direction, event) {
            // Visible up front so the element is painted while it animates in.
            (Direction::Show, AnimationEvent::Start) => self.show_element(),
            // Visible until the very end so the hide can be seen.
            (Direction::Hide, AnimationEvent::End) => self.hide_element(),
            _ => {}
        }
    }

    fn on_detached(&self) {
        log::debug!("element detached; cancelling animations");
        self.handler.cancel(Direction::Show);
        self.handler.cancel(Direction::Hide);
        self.gate.destroy();
    }

    fn on_show_ready(&self) {
        let Some(element) = self.element() else {
            return;
        };
        let creator = self.creator.borrow().clone();
        let handle = creator.create_animator(Direction::Show, &element);
        self.handler.cancel(Direction::Hide);
        match handle {
            Some(handle) => {
                self.handler.set_animator(Direction::Show, handle);
                self.handler.start(Direction::Show);
            }
            None => {
                log::debug!("no show animation supplied; showing immediately");
                self.show_element();
            }
        }
    }

    /// Applies the hide without animating; any running show is stopped first.
    fn hide_now(&self) {
        self.handler.cancel(Direction::Show);
        self.hide_element();
    }

    fn show_element(&self) {
        self.apply(Visibility::Visible);
    }

    fn hide_element(&self) {
        self.apply(self.hide_visibility.get());
    }

    fn apply(&self, visibility: Visibility) {
        let Some(element) = self.element() else {
            return;
        };
        if element.visibility() != visibility {
            element.set_visibility(visibility);
            self.sync_followers(visibility);
        }
    }

    fn live_followers(&self) -> SmallVec<[ElementRef; 4]> {
        let mut followers = self.followers.borrow_mut();
        followers.retain(|f| f.strong_count() > 0);
        followers.iter().filter_map(|f| f.upgrade()).collect()
    }

    fn sync_followers(&self, visibility: Visibility) {
        for follower in self.live_followers() {
            sync_follower(&follower, visibility);
        }
    }
}

fn sync_follower(follower: &ElementRef, visibility: Visibility) {
    if follower.visibility() != visibility {
        follower.set_visibility(visibility);
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.get_mut().take() {
            detach.run();
        }
        self.gate.destroy();
    }
}

/// Coordinates show/hide animations for a single element.
///
/// The element is held weakly: once the host drops it, every operation becomes
/// a no-op. Cloning yields another handle to the same coordinator. Dropping the
/// last handle unsubscribes from the element, drops any pending layout wait and
/// cancels running animations.
#[derive(Clone)]
pub struct VisibilityAnimator {
    inner: Rc<Inner>,
}

impl VisibilityAnimator {
    pub fn new(element: &ElementRef, scheduler: Rc<dyn Scheduler>) -> Self {
        let inner = Rc::new(Inner {
            element: Rc::downgrade(element),
            scheduler,
            handler: AnimatorHandler::new(),
            gate: LayoutGate::new(),
            hide_visibility: Cell::new(Visibility::Invisible),
            creator: RefCell::new(Rc::new(NoAnimation)),
            followers: RefCell::new(SmallVec::new()),
            detach: RefCell::new(None),
        });

        for direction in [Direction::Show, Direction::Hide] {
            let weak = Rc::downgrade(&inner);
            inner.handler.set_transition_hook(
                direction,
                Rc::new(move |direction: Direction, event: AnimationEvent| {
                    if let Some(inner) = weak.upgrade() {
                        inner.on_animation_event(direction, event);
                    }
                }),
            );
        }

        let weak = Rc::downgrade(&inner);
        let detach = element.on_detach(Rc::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.on_detached();
            }
        }));
        *inner.detach.borrow_mut() = Some(detach);

        Self { inner }
    }

    /// Binds to an element the caller only holds weakly.
    pub fn from_weak(element: &WeakElement, scheduler: Rc<dyn Scheduler>) -> Result<Self> {
        let element = element.upgrade().ok_or(Error::MissingElement)?;
        Ok(Self::new(&element, scheduler))
    }

    /// The bound element, if the host still holds it.
    pub fn element(&self) -> Option<ElementRef> {
        self.inner.element()
    }

    pub fn set_animator_creator(&self, creator: impl AnimatorCreator + 'static) {
        *self.inner.creator.borrow_mut() = Rc::new(creator);
    }

    /// Visibility applied when a hide finishes or is skipped. `Invisible` by
    /// default.
    pub fn set_hide_visibility(&self, visibility: Visibility) -> Result<()> {
        match visibility {
            Visibility::Invisible | Visibility::Gone => {
                self.inner.hide_visibility.set(visibility);
                Ok(())
            }
            Visibility::Visible => Err(Error::InvalidHideVisibility(visibility)),
        }
    }

    pub fn hide_visibility(&self) -> Visibility {
        self.inner.hide_visibility.get()
    }

    pub fn state(&self) -> AnimatorState {
        let inner = &self.inner;
        if inner.handler.is_started(Direction::Show) {
            AnimatorState::Showing
        } else if inner.handler.is_started(Direction::Hide) {
            AnimatorState::Hiding
        } else if inner.element().is_some_and(|e| e.visibility().is_visible()) {
            AnimatorState::Visible
        } else {
            AnimatorState::Hidden
        }
    }

    /// Shows the element, animating once it has been laid out with a
    /// positive size. Returns before the animation begins when it has to
    /// wait for layout.
    pub fn start_show(&self) {
        let inner = &self.inner;
        if inner.handler.is_started(Direction::Show) {
            return;
        }
        let Some(element) = inner.element() else {
            return;
        };
        if element.visibility() == Visibility::Gone {
            // Measurable but not yet seen.
            inner.apply(Visibility::Invisible);
        }

        let weak = Rc::downgrade(inner);
        inner
            .gate
            .check(&element, &*inner.scheduler, move || {
                if let Some(inner) = weak.upgrade() {
                    inner.on_show_ready();
                }
            });
    }

    /// Whether a show is waiting for the element to be laid out.
    pub fn is_show_pending(&self) -> bool {
        self.inner.gate.is_pending()
    }

    pub fn is_show_animator_started(&self) -> bool {
        self.inner.handler.is_started(Direction::Show)
    }

    /// Cancels a running show and any show still waiting for layout.
    pub fn cancel_show_animator(&self) {
        self.inner.handler.cancel(Direction::Show);
        self.inner.gate.destroy();
    }

    /// Hides the element. Animates only when it is visible and laid out, and
    /// the creator supplies an animation; otherwise the hide visibility is
    /// applied immediately.
    ///
    /// Returns true if a hide animation is running when the call returns.
    pub fn start_hide(&self) -> bool {
        let inner = &self.inner;
        if inner.handler.is_started(Direction::Hide) {
            return true;
        }
        inner.gate.destroy();
        let Some(element) = inner.element() else {
            return false;
        };

        if !element.visibility().is_visible() {
            inner.hide_now();
            return false;
        }
        // A running show counts as laid out.
        if !inner.handler.is_started(Direction::Show) && !inner.gate.check_ready(&element) {
            log::debug!("element not laid out; hiding without animation");
            inner.hide_now();
            return false;
        }

        let creator = inner.creator.borrow().clone();
        let Some(handle) = creator.create_animator(Direction::Hide, &element) else {
            inner.hide_now();
            return false;
        };
        if handle.repeats_forever() {
            log::warn!("refusing a hide animation that repeats forever; hiding immediately");
            inner.hide_now();
            return false;
        }

        inner.handler.cancel(Direction::Show);
        inner.handler.set_animator(Direction::Hide, handle);
        inner.handler.start(Direction::Hide)
    }

    pub fn is_hide_animator_started(&self) -> bool {
        self.inner.handler.is_started(Direction::Hide)
    }

    pub fn cancel_hide_animator(&self) {
        self.inner.handler.cancel(Direction::Hide);
    }

    /// Mirrors this element's visibility onto `follower` from now on,
    /// starting immediately. Adding twice is a no-op.
    pub fn add_follower(&self, follower: &ElementRef) {
        let weak = Rc::downgrade(follower);
        {
            let mut followers = self.inner.followers.borrow_mut();
            followers.retain(|f| f.strong_count() > 0);
            if !followers.iter().any(|f| f.ptr_eq(&weak)) {
                followers.push(weak);
            }
        }
        if let Some(element) = self.inner.element() {
            sync_follower(follower, element.visibility());
        }
    }

    pub fn remove_follower(&self, follower: &ElementRef) {
        let weak = Rc::downgrade(follower);
        self.inner
            .followers
            .borrow_mut()
            .retain(|f| f.strong_count() > 0 && !f.ptr_eq(&weak));
    }

    /// Followers that are still alive.
    pub fn follower_count(&self) -> usize {
        self.inner.live_followers().len()
    }

    pub fn add_show_animator_listener(&self, listener: ListenerRef) {
        self.inner.handler.add_show_animator_listener(listener);
    }

    pub fn remove_show_animator_listener(&self, listener: &ListenerRef) {
        self.inner.handler.remove_show_animator_listener(listener);
    }

    pub fn add_hide_animator_listener(&self, listener: ListenerRef) {
        self.inner.handler.add_hide_animator_listener(listener);
    }

    pub fn remove_hide_animator_listener(&self, listener: &ListenerRef) {
        self.inner.handler.remove_hide_animator_listener(listener);
    }
}
