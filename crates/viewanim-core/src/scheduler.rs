use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

pub type Task = Box<dyn FnOnce()>;

/// Defers work to the next cooperative turn of the UI thread.
pub trait Scheduler {
    fn post(&self, task: Task);
}

/// FIFO task queue for hosts that pump their own loop (and for tests).
#[derive(Clone, Default)]
pub struct TaskQueue {
    tasks: Rc<RefCell<VecDeque<Task>>>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.borrow().is_empty()
    }

    /// Runs queued tasks until the queue is empty, including tasks posted
    /// while draining. Returns how many ran.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        loop {
            let next = self.tasks.borrow_mut().pop_front();
            match next {
                Some(task) => {
                    task();
                    ran += 1;
                }
                None => break,
            }
        }
        ran
    }
}

impl Scheduler for TaskQueue {
    fn post(&self, task: Task) {
        self.tasks.borrow_mut().push_back(task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_runs_in_order() {
        let q = TaskQueue::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for i in 0..3 {
            let log = log.clone();
            q.post(Box::new(move || log.borrow_mut().push(i)));
        }
        assert_eq!(q.len(), 3);
        assert_eq!(q.run_pending(), 3);
        assert_eq!(*log.borrow(), vec![0, 1, 2]);
        assert!(q.is_empty());
    }

    #[test]
    fn test_queue_drains_reposted_tasks() {
        let q = TaskQueue::new();
        let hits = Rc::new(RefCell::new(0));
        {
            let q2 = q.clone();
            let hits = hits.clone();
            q.post(Box::new(move || {
                *hits.borrow_mut() += 1;
                let hits = hits.clone();
                q2.post(Box::new(move || *hits.borrow_mut() += 1));
            }));
        }
        assert_eq!(q.run_pending(), 2);
        assert_eq!(*hits.borrow(), 2);
    }
}
