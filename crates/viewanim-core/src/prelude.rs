pub use crate::animator::{
    AnimationEvent, AnimationHandle, AnimationListener, AnimationSink, AnimatorCreator,
    BoxedHandle, Direction, ListenerRef, NoAnimation,
};
pub use crate::dispose::Dispose;
pub use crate::element::{
    Element, ElementRef, Size, Visibility, WeakElement, is_layout_ready, same_element,
};
pub use crate::error::{Error, Result};
pub use crate::gate::LayoutGate;
pub use crate::handler::{AnimatorHandler, RunState};
pub use crate::headless::HeadlessElement;
pub use crate::registry::AnimatorRegistry;
pub use crate::scheduler::{Scheduler, Task, TaskQueue};
pub use crate::timeline::{TimedAnimation, Timeline};
pub use crate::visibility::{AnimatorState, VisibilityAnimator};
