//! Runs at most one cancellable animation per direction and broadcasts its
//! lifecycle. Knows nothing about visibility; the coordinator layers that on
//! top through a transition hook.

use std::cell::RefCell;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::{Rc, Weak};

use smallvec::SmallVec;

use crate::animator::{AnimationEvent, AnimationSink, BoxedHandle, Direction, ListenerRef};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunState {
    #[default]
    Idle,
    Running,
}

pub(crate) type TransitionHook = Rc<dyn Fn(Direction, AnimationEvent)>;

enum Slot {
    Idle,
    Running {
        generation: u64,
        // None while `start()` of this handle is still on the stack.
        handle: Option<BoxedHandle>,
        started: bool,
    },
}

struct Runner {
    direction: Direction,
    installed: Option<BoxedHandle>,
    slot: Slot,
    generation: u64,
    cancelled_while_starting: Option<u64>,
    hook: Option<TransitionHook>,
    listeners: SmallVec<[ListenerRef; 2]>,
}

impl Runner {
    fn new(direction: Direction) -> Self {
        Self {
            direction,
            installed: None,
            slot: Slot::Idle,
            generation: 0,
            cancelled_while_starting: None,
            hook: None,
            listeners: SmallVec::new(),
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        matches!(self.slot, Slot::Running { generation: g, .. } if g == generation)
    }
}

/// Where an `AnimationSink` delivers to: one run of one direction.
#[derive(Clone)]
pub(crate) struct SinkTarget {
    runner: Weak<RefCell<Runner>>,
    generation: u64,
}

impl SinkTarget {
    pub(crate) fn is_live(&self) -> bool {
        self.runner
            .upgrade()
            .is_some_and(|r| r.borrow().is_current(self.generation))
    }

    pub(crate) fn started(&self) {
        let Some(runner) = self.runner.upgrade() else {
            return;
        };
        let first = {
            let mut r = runner.borrow_mut();
            match &mut r.slot {
                Slot::Running {
                    generation,
                    started,
                    ..
                } if *generation == self.generation && !*started => {
                    *started = true;
                    true
                }
                _ => false,
            }
        };
        if first {
            dispatch(&runner, AnimationEvent::Start);
        }
    }

    pub(crate) fn ended(&self) {
        let Some(runner) = self.runner.upgrade() else {
            return;
        };
        let finished = {
            let mut r = runner.borrow_mut();
            if r.is_current(self.generation) {
                Some(std::mem::replace(&mut r.slot, Slot::Idle))
            } else {
                None
            }
        };
        if let Some(slot) = finished {
            drop(slot);
            dispatch(&runner, AnimationEvent::End);
        }
    }
}

fn dispatch(runner: &Rc<RefCell<Runner>>, event: AnimationEvent) {
    let (direction, hook, listeners) = {
        let r = runner.borrow();
        (r.direction, r.hook.clone(), r.listeners.clone())
    };
    log::debug!("{direction:?} animation: {event:?}");

    if let Some(hook) = hook {
        hook(direction, event);
    }
    for (i, listener) in listeners.iter().enumerate() {
        let delivered = catch_unwind(AssertUnwindSafe(|| listener.on_event(direction, event)));
        if let Err(err) = delivered {
            let message = err
                .downcast_ref::<String>()
                .map(String::as_str)
                .or_else(|| err.downcast_ref::<&str>().copied())
                .unwrap_or("Unknown panic");
            log::error!("{direction:?} listener #{i} panicked on {event:?}: {message}");
        }
    }
}

pub struct AnimatorHandler {
    show: Rc<RefCell<Runner>>,
    hide: Rc<RefCell<Runner>>,
}

impl Default for AnimatorHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimatorHandler {
    pub fn new() -> Self {
        Self {
            show: Rc::new(RefCell::new(Runner::new(Direction::Show))),
            hide: Rc::new(RefCell::new(Runner::new(Direction::Hide))),
        }
    }

    fn runner(&self, direction: Direction) -> &Rc<RefCell<Runner>> {
        match direction {
            Direction::Show => &self.show,
            Direction::Hide => &self.hide,
        }
    }

    /// Receives every event before external listeners do.
    pub(crate) fn set_transition_hook(&self, direction: Direction, hook: TransitionHook) {
        self.runner(direction).borrow_mut().hook = Some(hook);
    }

    /// Installs the handle used by the next `start`. A previously installed,
    /// unstarted handle is dropped without being cancelled.
    pub fn set_animator(&self, direction: Direction, handle: BoxedHandle) {
        let previous = self.runner(direction).borrow_mut().installed.replace(handle);
        drop(previous);
    }

    pub fn has_animator(&self, direction: Direction) -> bool {
        self.runner(direction).borrow().installed.is_some()
    }

    /// Starts the installed handle. Returns false if none was installed.
    pub fn start(&self, direction: Direction) -> bool {
        let runner = self.runner(direction);
        let Some(mut handle) = runner.borrow_mut().installed.take() else {
            return false;
        };
        if self.is_started(direction) {
            self.cancel(direction);
        }

        let generation = {
            let mut r = runner.borrow_mut();
            r.generation += 1;
            let generation = r.generation;
            r.slot = Slot::Running {
                generation,
                handle: None,
                started: false,
            };
            generation
        };

        handle.start(AnimationSink {
            target: SinkTarget {
                runner: Rc::downgrade(runner),
                generation,
            },
        });

        let leftover = {
            let mut guard = runner.borrow_mut();
            let r = &mut *guard;
            match &mut r.slot {
                Slot::Running {
                    generation: g,
                    handle: slot,
                    ..
                } if *g == generation => {
                    *slot = Some(handle);
                    None
                }
                // Ended or cancelled from inside `start`.
                _ => Some((
                    handle,
                    r.cancelled_while_starting.take() == Some(generation),
                )),
            }
        };
        if let Some((mut handle, true)) = leftover {
            handle.cancel();
        }
        true
    }

    pub fn run_state(&self, direction: Direction) -> RunState {
        match self.runner(direction).borrow().slot {
            Slot::Idle => RunState::Idle,
            Slot::Running { .. } => RunState::Running,
        }
    }

    pub fn is_started(&self, direction: Direction) -> bool {
        self.run_state(direction) == RunState::Running
    }

    /// Cancels a running animation synchronously: the handle is cancelled and
    /// released, then `Cancel` and `End` are broadcast. No-op when idle.
    pub fn cancel(&self, direction: Direction) {
        let runner = self.runner(direction);
        let slot = {
            let mut r = runner.borrow_mut();
            let slot = std::mem::replace(&mut r.slot, Slot::Idle);
            if let Slot::Running {
                generation,
                handle: None,
                ..
            } = slot
            {
                r.cancelled_while_starting = Some(generation);
            }
            slot
        };
        let Slot::Running { handle, .. } = slot else {
            return;
        };
        if let Some(mut handle) = handle {
            handle.cancel();
        }
        dispatch(runner, AnimationEvent::Cancel);
        dispatch(runner, AnimationEvent::End);
    }

    pub fn add_listener(&self, direction: Direction, listener: ListenerRef) {
        self.runner(direction).borrow_mut().listeners.push(listener);
    }

    /// Removes the first registration of `listener`; absent listeners are ignored.
    pub fn remove_listener(&self, direction: Direction, listener: &ListenerRef) {
        let mut r = self.runner(direction).borrow_mut();
        if let Some(pos) = r.listeners.iter().position(|l| Rc::ptr_eq(l, listener)) {
            r.listeners.remove(pos);
        }
    }

    pub fn listener_count(&self, direction: Direction) -> usize {
        self.runner(direction).borrow().listeners.len()
    }

    pub fn set_show_animator(&self, handle: BoxedHandle) {
        self.set_animator(Direction::Show, handle)
    }

    pub fn set_hide_animator(&self, handle: BoxedHandle) {
        self.set_animator(Direction::Hide, handle)
    }

    pub fn start_show_animator(&self) -> bool {
        self.start(Direction::Show)
    }

    pub fn start_hide_animator(&self) -> bool {
        self.start(Direction::Hide)
    }

    pub fn is_show_animator_started(&self) -> bool {
        self.is_started(Direction::Show)
    }

    pub fn is_hide_animator_started(&self) -> bool {
        self.is_started(Direction::Hide)
    }

    pub fn cancel_show_animator(&self) {
        self.cancel(Direction::Show)
    }

    pub fn cancel_hide_animator(&self) {
        self.cancel(Direction::Hide)
    }

    pub fn add_show_animator_listener(&self, listener: ListenerRef) {
        self.add_listener(Direction::Show, listener)
    }

    pub fn remove_show_animator_listener(&self, listener: &ListenerRef) {
        self.remove_listener(Direction::Show, listener)
    }

    pub fn add_hide_animator_listener(&self, listener: ListenerRef) {
        self.add_listener(Direction::Hide, listener)
    }

    pub fn remove_hide_animator_listener(&self, listener: &ListenerRef) {
        self.remove_listener(Direction::Hide, listener)
    }
}

impl Drop for AnimatorHandler {
    fn drop(&mut self) {
        self.cancel(Direction::Show);
        self.cancel(Direction::Hide);
    }
}
