use std::rc::Rc;

use viewanim_core::*;
use web_time::Duration;

const FRAME: Duration = Duration::from_millis(16);

/// Slides in over `show`, out over `hide`.
struct SlideCreator {
    timeline: Timeline,
    show: Duration,
    hide: Duration,
}

impl AnimatorCreator for SlideCreator {
    fn create_animator(&self, direction: Direction, _element: &ElementRef) -> Option<BoxedHandle> {
        let duration = match direction {
            Direction::Show => self.show,
            Direction::Hide => self.hide,
        };
        Some(Box::new(self.timeline.animation(duration)))
    }
}

struct Host {
    queue: TaskQueue,
    timeline: Timeline,
    panel: Rc<HeadlessElement>,
    badge: Rc<HeadlessElement>,
    animator: VisibilityAnimator,
}

impl Host {
    fn frames(&self, n: usize) {
        for _ in 0..n {
            self.queue.run_pending();
            self.timeline.advance(FRAME);
        }
        log::info!(
            "t={:>4}ms panel={:?} badge={:?} state={:?}",
            self.timeline.now().as_millis(),
            self.panel.visibility(),
            self.badge.visibility(),
            self.animator.state()
        );
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Starting visibility demo");

    let queue = TaskQueue::new();
    let timeline = Timeline::new();

    let panel = HeadlessElement::with_visibility(Visibility::Gone);
    let badge = HeadlessElement::with_visibility(Visibility::Gone);
    let panel_ref: ElementRef = panel.clone();
    let badge_ref: ElementRef = badge.clone();

    let animator = VisibilityAnimator::new(&panel_ref, Rc::new(queue.clone()));
    animator.set_hide_visibility(Visibility::Gone)?;
    animator.set_animator_creator(SlideCreator {
        timeline: timeline.clone(),
        show: Duration::from_millis(300),
        hide: Duration::from_millis(200),
    });
    animator.add_show_animator_listener(Rc::new(|_: Direction, e: AnimationEvent| {
        log::info!("show {e:?}")
    }));
    animator.add_hide_animator_listener(Rc::new(|_: Direction, e: AnimationEvent| {
        log::info!("hide {e:?}")
    }));
    animator.add_follower(&badge_ref);

    let host = Host {
        queue,
        timeline,
        panel,
        badge,
        animator,
    };

    log::info!("click: show (panel not laid out yet)");
    host.animator.start_show();
    host.frames(2);

    log::info!("layout pass: panel measured at 320x48");
    host.panel.attach();
    host.panel.set_size(Size::new(320.0, 48.0));
    host.panel.layout();
    host.frames(10);
    host.frames(10);

    log::info!("click: hide");
    let animated = host.animator.start_hide();
    log::info!("hide animated: {animated}");
    host.frames(6);

    log::info!("click: show again, mid-hide");
    host.animator.start_show();
    host.frames(20);

    log::info!("detach while hiding");
    host.animator.start_hide();
    host.frames(2);
    host.panel.detach();
    host.frames(1);

    log::info!("click: hide on a detached panel");
    let animated = host.animator.start_hide();
    log::info!("hide animated: {animated}");
    host.frames(1);

    Ok(())
}
