use std::time::{Duration, Instant};

/// A pending "hide the flyout" deadline. Dropping it cancels it.
#[derive(Debug)]
struct HideTimer {
    deadline: Instant,
}

/// Visibility of the volume flyout with debounced auto-hide.
#[derive(Debug)]
pub struct Flyout {
    visible: bool,
    hide_timer: Option<HideTimer>,
    delay: Duration,
}

impl Flyout {
    pub fn new(delay: Duration) -> Self {
        Self {
            visible: false,
            hide_timer: None,
            delay,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn hide_pending(&self) -> bool {
        self.hide_timer.is_some()
    }

    /// Show right away and forget any pending hide.
    pub fn pointer_enter(&mut self) {
        self.cancel();
        self.visible = true;
    }

    /// Arm the hide timer. A later `pointer_enter` before it fires keeps the
    /// flyout open. Nothing to hide when it is not shown.
    pub fn pointer_leave(&mut self, now: Instant) {
        if !self.visible {
            return;
        }
        self.hide_timer = Some(HideTimer {
            deadline: now + self.delay,
        });
    }

    /// Fire the hide timer if it expired. Returns true when visibility changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match &self.hide_timer {
            Some(timer) if now >= timer.deadline => {
                self.hide_timer = None;
                let was_visible = self.visible;
                self.visible = false;
                was_visible
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.hide_timer = None;
    }
}
