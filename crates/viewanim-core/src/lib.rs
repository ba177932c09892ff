//! # Show/hide animation for a single element
//!
//! `viewanim-core` coordinates the show and hide animations of one UI element
//! inside a host GUI framework. The host stays in charge of layout, painting
//! and the animation runtime; this crate decides *when* an animation may run
//! and what visibility the element ends up with.
//!
//! There are three pieces, leaf first:
//!
//! - [`LayoutGate`]: waits until an element is attached and measured with a
//!   positive size.
//! - [`AnimatorHandler`]: runs at most one cancellable animation per
//!   direction and broadcasts its lifecycle to listeners.
//! - [`VisibilityAnimator`]: the public show/hide API. Keeps show and hide
//!   mutually exclusive, applies the resulting visibility and mirrors it onto
//!   follower elements.
//!
//! ## Host contracts
//!
//! The host plugs in through traits: [`Element`] for the node being animated,
//! [`Scheduler`] to defer work to the next UI turn, [`AnimatorCreator`] to
//! supply an [`AnimationHandle`] per direction (or `None` to skip animating),
//! and [`AnimationListener`] to observe lifecycle events.
//!
//! Everything runs on the UI thread. Types use `Rc`/`RefCell` and are not
//! `Send`.
//!
//! ## Example
//!
//! The headless host in [`headless`] and [`timeline`] drives the whole thing
//! without a display:
//!
//! ```rust
//! use std::rc::Rc;
//! use viewanim_core::*;
//! use web_time::Duration;
//!
//! let queue = TaskQueue::new();
//! let timeline = Timeline::new();
//!
//! let element = HeadlessElement::laid_out(100.0, 50.0, Visibility::Gone);
//! let element_ref: ElementRef = element.clone();
//!
//! let animator = VisibilityAnimator::new(&element_ref, Rc::new(queue.clone()));
//! let tl = timeline.clone();
//! animator.set_animator_creator(move |_: Direction, _: &ElementRef| -> Option<BoxedHandle> {
//!     Some(Box::new(tl.animation(Duration::from_millis(300))))
//! });
//!
//! animator.start_show();
//! assert_eq!(element.visibility(), Visibility::Invisible);
//!
//! queue.run_pending(); // layout gate reports ready, show starts
//! assert_eq!(element.visibility(), Visibility::Visible);
//! assert_eq!(animator.state(), AnimatorState::Showing);
//!
//! timeline.advance(Duration::from_millis(300));
//! assert_eq!(animator.state(), AnimatorState::Visible);
//!
//! assert!(animator.start_hide());
//! timeline.advance(Duration::from_millis(300));
//! assert_eq!(element.visibility(), Visibility::Invisible);
//! ```
//!
//! ## Followers
//!
//! [`VisibilityAnimator::add_follower`] registers secondary elements whose
//! visibility tracks the primary element's. Followers are held weakly and
//! synced immediately on registration.

pub mod animator;
pub mod dispose;
pub mod element;
pub mod error;
pub mod gate;
pub mod handler;
pub mod headless;
pub mod prelude;
pub mod registry;
pub mod scheduler;
pub mod timeline;
pub mod visibility;

pub use prelude::*;
