//! A deterministic animation runtime: time only moves when the host calls
//! [`Timeline::advance`]. Used by headless hosts, the demo and tests.

use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};
use web_time::Duration;

use crate::animator::{AnimationHandle, AnimationSink};

new_key_type! {
    pub struct TrackKey;
}

struct Track {
    delay: Duration,
    duration: Duration,
    elapsed: Duration,
    started: bool,
    repeat_forever: bool,
    sink: AnimationSink,
}

#[derive(Default)]
struct TimelineInner {
    now: Duration,
    tracks: SlotMap<TrackKey, Track>,
}

#[derive(Clone, Default)]
pub struct Timeline {
    inner: Rc<RefCell<TimelineInner>>,
}

enum Tick {
    Start,
    End,
    StartAndEnd,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total time advanced so far.
    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    /// Number of started animations that have not ended or been cancelled.
    pub fn active_count(&self) -> usize {
        self.inner.borrow().tracks.len()
    }

    /// A new, unstarted animation running on this timeline.
    pub fn animation(&self, duration: Duration) -> TimedAnimation {
        TimedAnimation {
            timeline: self.clone(),
            duration,
            delay: Duration::ZERO,
            repeat_forever: false,
            key: None,
        }
    }

    /// Moves time forward, reporting starts and ends that fall inside `dt`.
    pub fn advance(&self, dt: Duration) {
        let due: Vec<(AnimationSink, Tick)> = {
            let mut inner = self.inner.borrow_mut();
            inner.now += dt;
            let mut due = Vec::new();
            let mut finished = Vec::new();
            for (key, track) in inner.tracks.iter_mut() {
                track.elapsed += dt;
                let starts = !track.started && track.elapsed >= track.delay;
                if starts {
                    track.started = true;
                }
                let ends = !track.repeat_forever && track.elapsed >= track.delay + track.duration;
                let tick = match (starts, ends) {
                    (true, true) => Tick::StartAndEnd,
                    (true, false) => Tick::Start,
                    (false, true) => Tick::End,
                    (false, false) => continue,
                };
                if ends {
                    finished.push(key);
                }
                due.push((track.sink.clone(), tick));
            }
            for key in finished {
                inner.tracks.remove(key);
            }
            due
        };

        for (sink, tick) in due {
            match tick {
                Tick::Start => sink.started(),
                Tick::End => sink.ended(),
                Tick::StartAndEnd => {
                    sink.started();
                    sink.ended();
                }
            }
        }
    }
}

/// An [`AnimationHandle`] whose start and end are driven by a [`Timeline`].
pub struct TimedAnimation {
    timeline: Timeline,
    duration: Duration,
    delay: Duration,
    repeat_forever: bool,
    key: Option<TrackKey>,
}

impl TimedAnimation {
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn repeat_forever(mut self) -> Self {
        self.repeat_forever = true;
        self
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    fn remove_track(&mut self) {
        if let Some(key) = self.key.take() {
            self.timeline.inner.borrow_mut().tracks.remove(key);
        }
    }
}

impl AnimationHandle for TimedAnimation {
    fn start(&mut self, sink: AnimationSink) {
        self.remove_track();
        let starts_now = self.delay.is_zero();
        let key = self.timeline.inner.borrow_mut().tracks.insert(Track {
            delay: self.delay,
            duration: self.duration,
            elapsed: Duration::ZERO,
            started: starts_now,
            repeat_forever: self.repeat_forever,
            sink: sink.clone(),
        });
        self.key = Some(key);
        if starts_now {
            sink.started();
        }
    }

    fn cancel(&mut self) {
        self.remove_track();
    }

    fn repeats_forever(&self) -> bool {
        self.repeat_forever
    }
}

impl Drop for TimedAnimation {
    fn drop(&mut self) {
        self.remove_track();
    }
}
