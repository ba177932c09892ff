//! An in-memory `Element` for hosts without a real display tree, and for tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::dispose::Dispose;
use crate::element::{Element, Size, Visibility};

type Callback = Rc<dyn Fn()>;

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    entries: Vec<(u64, Callback)>,
}

impl Subscribers {
    fn add(&mut self, f: Callback) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push((id, f));
        id
    }

    fn remove(&mut self, id: u64) {
        self.entries.retain(|(i, _)| *i != id);
    }
}

/// Emit to a snapshot of the list so callbacks can unsubscribe mid-dispatch.
fn emit(subs: &RefCell<Subscribers>) {
    let snapshot: Vec<Callback> = subs.borrow().entries.iter().map(|(_, f)| f.clone()).collect();
    for f in snapshot {
        f();
    }
}

fn subscribe(subs: &Rc<RefCell<Subscribers>>, f: Callback) -> Dispose {
    let id = subs.borrow_mut().add(f);
    let weak = Rc::downgrade(subs);
    Dispose::new(move || {
        if let Some(subs) = weak.upgrade() {
            subs.borrow_mut().remove(id);
        }
    })
}

pub struct HeadlessElement {
    visibility: Cell<Visibility>,
    size: Cell<Size>,
    attached: Cell<bool>,
    layout_subs: Rc<RefCell<Subscribers>>,
    detach_subs: Rc<RefCell<Subscribers>>,
    /// Every visibility write, in order.
    history: RefCell<Vec<Visibility>>,
}

impl HeadlessElement {
    /// Visible, detached and unmeasured.
    pub fn new() -> Rc<Self> {
        Self::with_visibility(Visibility::Visible)
    }

    pub fn with_visibility(visibility: Visibility) -> Rc<Self> {
        Rc::new(Self {
            visibility: Cell::new(visibility),
            size: Cell::new(Size::ZERO),
            attached: Cell::new(false),
            layout_subs: Rc::default(),
            detach_subs: Rc::default(),
            history: RefCell::new(Vec::new()),
        })
    }

    /// Attached and measured; ready to animate.
    pub fn laid_out(width: f32, height: f32, visibility: Visibility) -> Rc<Self> {
        let el = Self::with_visibility(visibility);
        el.attached.set(true);
        el.size.set(Size::new(width, height));
        el
    }

    pub fn set_size(&self, size: Size) {
        self.size.set(size);
    }

    pub fn attach(&self) {
        self.attached.set(true);
    }

    /// Marks the element detached and notifies detach subscribers.
    pub fn detach(&self) {
        if self.attached.replace(false) {
            emit(&self.detach_subs);
        }
    }

    /// Runs a layout pass: notifies layout subscribers.
    pub fn layout(&self) {
        emit(&self.layout_subs);
    }

    pub fn layout_listener_count(&self) -> usize {
        self.layout_subs.borrow().entries.len()
    }

    pub fn detach_listener_count(&self) -> usize {
        self.detach_subs.borrow().entries.len()
    }

    pub fn visibility_history(&self) -> Vec<Visibility> {
        self.history.borrow().clone()
    }
}

impl Element for HeadlessElement {
    fn visibility(&self) -> Visibility {
        self.visibility.get()
    }

    fn set_visibility(&self, visibility: Visibility) {
        self.visibility.set(visibility);
        self.history.borrow_mut().push(visibility);
    }

    fn size(&self) -> Size {
        self.size.get()
    }

    fn is_attached(&self) -> bool {
        self.attached.get()
    }

    fn on_layout_pass(&self, f: Rc<dyn Fn()>) -> Dispose {
        subscribe(&self.layout_subs, f)
    }

    fn on_detach(&self, f: Rc<dyn Fn()>) -> Dispose {
        subscribe(&self.detach_subs, f)
    }
}
