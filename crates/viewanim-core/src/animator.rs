//! Contracts between the coordinator and the host animation runtime.

use std::rc::Rc;

use crate::element::ElementRef;
use crate::handler::SinkTarget;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Show,
    Hide,
}

/// Lifecycle notifications broadcast for a running animation.
///
/// A cancelled animation reports `Cancel` followed by `End`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationEvent {
    Start,
    End,
    Cancel,
}

/// Channel through which a running handle reports back to its handler.
///
/// Events from a handle that has since been cancelled or replaced are dropped.
#[derive(Clone)]
pub struct AnimationSink {
    pub(crate) target: SinkTarget,
}

impl AnimationSink {
    /// The animation has begun producing frames.
    pub fn started(&self) {
        self.target.started();
    }

    /// The animation ran to completion.
    pub fn ended(&self) {
        self.target.ended();
    }

    /// Whether events sent through this sink would still be delivered.
    pub fn is_live(&self) -> bool {
        self.target.is_live()
    }
}

/// An animation owned by the host runtime.
pub trait AnimationHandle {
    /// Begin running. The runtime reports progress through `sink`, possibly
    /// synchronously from inside this call.
    fn start(&mut self, sink: AnimationSink);

    /// Stop immediately. No further sink calls are expected after this.
    fn cancel(&mut self);

    /// An animation that never ends on its own.
    fn repeats_forever(&self) -> bool {
        false
    }
}

pub type BoxedHandle = Box<dyn AnimationHandle>;

/// Supplies the animation to run for a direction, or `None` to apply the
/// visibility change without animating.
///
/// Must not hand out a `Hide` animation that repeats forever: the element
/// would never reach its hidden state.
pub trait AnimatorCreator {
    fn create_animator(&self, direction: Direction, element: &ElementRef) -> Option<BoxedHandle>;
}

impl<F> AnimatorCreator for F
where
    F: Fn(Direction, &ElementRef) -> Option<BoxedHandle>,
{
    fn create_animator(&self, direction: Direction, element: &ElementRef) -> Option<BoxedHandle> {
        self(direction, element)
    }
}

/// Declines every request; visibility changes apply instantly.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoAnimation;

impl AnimatorCreator for NoAnimation {
    fn create_animator(&self, _direction: Direction, _element: &ElementRef) -> Option<BoxedHandle> {
        None
    }
}

/// Observer of animation lifecycle events.
pub trait AnimationListener {
    fn on_event(&self, direction: Direction, event: AnimationEvent);
}

impl<F> AnimationListener for F
where
    F: Fn(Direction, AnimationEvent),
{
    fn on_event(&self, direction: Direction, event: AnimationEvent) {
        self(direction, event)
    }
}

pub type ListenerRef = Rc<dyn AnimationListener>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessElement;

    #[test]
    fn test_no_animation_declines() {
        let el: ElementRef = HeadlessElement::new();
        assert!(NoAnimation.create_animator(Direction::Show, &el).is_none());
        assert!(NoAnimation.create_animator(Direction::Hide, &el).is_none());
    }

    #[test]
    fn test_closure_creator() {
        let el: ElementRef = HeadlessElement::new();
        let creator = |d: Direction, _: &ElementRef| -> Option<BoxedHandle> {
            match d {
                Direction::Show => None,
                Direction::Hide => None,
            }
        };
        assert!(creator.create_animator(Direction::Show, &el).is_none());
    }
}
