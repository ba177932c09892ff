use std::rc::{Rc, Weak};

use crate::dispose::Dispose;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Visibility {
    #[default]
    Visible,
    /// Hidden but still taking part in layout.
    Invisible,
    /// Hidden and removed from layout.
    Gone,
}

impl Visibility {
    pub fn is_visible(self) -> bool {
        self == Visibility::Visible
    }
}

/// Measured size of an element after layout.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_positive(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// A UI node owned by the host framework.
///
/// All methods are called on the UI thread. Subscriber callbacks may
/// unsubscribe themselves (run their own `Dispose`) while being dispatched, so
/// implementations must not hold a borrow of their listener list across the
/// calls.
pub trait Element {
    fn visibility(&self) -> Visibility;
    fn set_visibility(&self, visibility: Visibility);

    /// Size from the most recent layout pass.
    fn size(&self) -> Size;

    /// Whether the element is currently part of the display tree.
    fn is_attached(&self) -> bool;

    /// Called after every layout pass of this element.
    fn on_layout_pass(&self, f: Rc<dyn Fn()>) -> Dispose;

    /// Called when the element is removed from the display tree.
    fn on_detach(&self, f: Rc<dyn Fn()>) -> Dispose;
}

pub type ElementRef = Rc<dyn Element>;
pub type WeakElement = Weak<dyn Element>;

/// Attached and measured with a positive width and height.
pub fn is_layout_ready(element: &dyn Element) -> bool {
    element.is_attached() && element.size().is_positive()
}

/// Identity comparison, ignoring vtable metadata.
pub fn same_element(a: &ElementRef, b: &ElementRef) -> bool {
    Rc::ptr_eq(a, b)
}

pub(crate) fn element_key(element: &ElementRef) -> usize {
    Rc::as_ptr(element) as *const () as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessElement;

    #[test]
    fn test_size_positive() {
        assert!(Size::new(100.0, 50.0).is_positive());
        assert!(!Size::new(100.0, 0.0).is_positive());
        assert!(!Size::new(0.0, 50.0).is_positive());
        assert!(!Size::ZERO.is_positive());
    }

    #[test]
    fn test_layout_ready_needs_attach_and_size() {
        let el = HeadlessElement::new();
        assert!(!is_layout_ready(&*el));

        el.set_size(Size::new(10.0, 10.0));
        assert!(!is_layout_ready(&*el));

        el.attach();
        assert!(is_layout_ready(&*el));

        el.set_size(Size::new(10.0, 0.0));
        assert!(!is_layout_ready(&*el));
    }

    #[test]
    fn test_same_element_is_identity() {
        let a: ElementRef = HeadlessElement::new();
        let b: ElementRef = HeadlessElement::new();
        assert!(same_element(&a, &a.clone()));
        assert!(!same_element(&a, &b));
        assert_eq!(element_key(&a), element_key(&a.clone()));
    }
}
