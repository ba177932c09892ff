use std::cell::RefCell;
use std::rc::Rc;

/// Unsubscribe guard handed out by host subscriptions (layout passes, detach).
///
/// Cloning shares the same cleanup; whichever clone runs first wins.
#[derive(Clone)]
pub struct Dispose(Rc<RefCell<Option<Box<dyn FnOnce()>>>>);

impl Dispose {
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Self(Rc::new(RefCell::new(Some(Box::new(f)))))
    }

    /// Runs at most once (safe to call multiple times).
    pub fn run(&self) {
        // Take first so the cleanup may re-enter (e.g. drop another clone).
        let f = self.0.borrow_mut().take();
        if let Some(f) = f {
            f()
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.0.borrow().is_none()
    }
}

impl std::fmt::Debug for Dispose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispose")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_dispose_runs_once() {
        let count = Rc::new(Cell::new(0));
        let d = {
            let count = count.clone();
            Dispose::new(move || count.set(count.get() + 1))
        };
        let d2 = d.clone();

        assert!(!d.is_disposed());
        d.run();
        d2.run();
        d.run();
        assert_eq!(count.get(), 1);
        assert!(d2.is_disposed());
    }
}
