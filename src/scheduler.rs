//! Pending-task reminder scheduler.
//!
//! Keeps a single armed deadline and re-arms it after every firing, so at
//! most one timer is ever live. The UI event loop drives [`ReminderScheduler::poll`]
//! each iteration; board mutations drive the event-triggered checks.

use crate::notify::Notifier;
use std::time::{Duration, Instant};
use tracing::debug;

/// Message shown by the periodic reminder check.
pub const MSG_PENDING_REMINDER: &str = "You have pending tasks in the Todo list!";

/// Message shown when the last pending task is completed.
pub const MSG_ALL_COMPLETED: &str = "All tasks completed!";

/// Message shown right after a task is added.
pub fn added_message(description: &str) -> String {
    format!("New Task added: {description}")
}

/// Monotonic time source.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall-clock backed [`Clock`].
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Largest accepted interval. Keeps `now + period` far away from `Instant`
/// overflow while still allowing absurdly long periods.
pub const MAX_INTERVAL_MINUTES: u64 = u32::MAX as u64;

/// Coerce a raw interval input to whole minutes: `max(1, floor(abs(raw)))`,
/// capped at [`MAX_INTERVAL_MINUTES`]. Never rejects; zero, negative,
/// fractional and oversized inputs all map to a valid period.
pub fn coerce_interval(raw: f64) -> u64 {
    let floored = raw.abs().floor();
    if floored >= MAX_INTERVAL_MINUTES as f64 {
        MAX_INTERVAL_MINUTES
    } else if floored >= 1.0 {
        floored as u64
    } else {
        1
    }
}

/// Periodic reminder scheduler.
///
/// Idle until [`start`](Self::start) arms the first deadline; afterwards the
/// deadline is replaced (never duplicated) by every firing and every interval
/// change.
pub struct ReminderScheduler {
    notifier: Box<dyn Notifier>,
    clock: Box<dyn Clock>,
    interval_minutes: u64,
    next_check: Option<Instant>,
    last_message: Option<String>,
}

impl ReminderScheduler {
    pub fn new(notifier: Box<dyn Notifier>, clock: Box<dyn Clock>, interval_minutes: u64) -> Self {
        Self {
            notifier,
            clock,
            interval_minutes: interval_minutes.clamp(1, MAX_INTERVAL_MINUTES),
            next_check: None,
            last_message: None,
        }
    }

    /// Interval between periodic checks, in minutes.
    pub fn interval_minutes(&self) -> u64 {
        self.interval_minutes
    }

    /// Last message handed to the notifier, for the status bar.
    pub fn last_message(&self) -> Option<&str> {
        self.last_message.as_deref()
    }

    /// Idle → Active: request display permission once, run one immediate
    /// pending check, arm the first deadline.
    pub fn start(&mut self, has_pending: bool) {
        self.notifier.request_permission();
        self.check_and_notify(has_pending);
        self.arm();
        debug!("reminder scheduler started ({}m interval)", self.interval_minutes);
    }

    /// Replace the current interval with the coerced `raw` value and re-arm
    /// the deadline from now. Returns the effective interval in minutes.
    pub fn set_interval(&mut self, raw: f64) -> u64 {
        self.interval_minutes = coerce_interval(raw);
        self.arm();
        debug!("reminder interval set to {}m", self.interval_minutes);
        self.interval_minutes
    }

    /// Fires the periodic check when the armed deadline has passed. Returns
    /// `true` when a check ran.
    pub fn poll(&mut self, has_pending: bool) -> bool {
        let Some(deadline) = self.next_check else {
            return false;
        };
        if self.clock.now() < deadline {
            return false;
        }

        self.check_and_notify(has_pending);
        self.arm();
        true
    }

    /// Event-triggered check after a task was added.
    pub fn task_added(&mut self, description: &str, has_pending: bool) {
        if has_pending {
            let message = added_message(description);
            self.notify(&message);
        }
    }

    /// Event-triggered check after a move or transfer. Fires the completion
    /// message when the pending list just became empty.
    pub fn board_changed(&mut self, has_pending: bool) {
        if !has_pending {
            self.notify(MSG_ALL_COMPLETED);
        }
    }

    fn check_and_notify(&mut self, has_pending: bool) {
        if has_pending {
            self.notify(MSG_PENDING_REMINDER);
        }
    }

    fn notify(&mut self, message: &str) {
        self.last_message = Some(message.to_owned());
        self.notifier.show(message);
    }

    fn arm(&mut self) {
        let period = Duration::from_secs(self.interval_minutes.saturating_mul(60));
        self.next_check = Some(self.clock.now() + period);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::Notifier;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    struct ManualClock {
        now: Cell<Instant>,
    }

    impl ManualClock {
        fn new() -> Rc<Self> {
            Rc::new(Self {
                now: Cell::new(Instant::now()),
            })
        }

        fn advance(&self, duration: Duration) {
            self.now.set(self.now.get() + duration);
        }
    }

    impl Clock for Rc<ManualClock> {
        fn now(&self) -> Instant {
            self.now.get()
        }
    }

    struct RecordingNotifier {
        messages: Rc<RefCell<Vec<String>>>,
        granted: bool,
    }

    impl Notifier for RecordingNotifier {
        fn request_permission(&mut self) {
            self.granted = true;
        }

        fn show(&mut self, message: &str) {
            if self.granted {
                self.messages.borrow_mut().push(message.to_owned());
            }
        }
    }

    fn make_scheduler(
        interval_minutes: u64,
    ) -> (ReminderScheduler, Rc<RefCell<Vec<String>>>, Rc<ManualClock>) {
        let messages = Rc::new(RefCell::new(Vec::new()));
        let notifier = RecordingNotifier {
            messages: Rc::clone(&messages),
            granted: false,
        };
        let clock = ManualClock::new();
        let scheduler = ReminderScheduler::new(
            Box::new(notifier),
            Box::new(Rc::clone(&clock)),
            interval_minutes,
        );
        (scheduler, messages, clock)
    }

    const MINUTE: Duration = Duration::from_secs(60);

    #[test]
    fn interval_coercion_matches_floor_abs_min_one() {
        assert_eq!(coerce_interval(-3.7), 3);
        assert_eq!(coerce_interval(0.0), 1);
        assert_eq!(coerce_interval(-0.2), 1);
        assert_eq!(coerce_interval(2.9), 2);
        assert_eq!(coerce_interval(f64::NAN), 1);
    }

    #[test]
    fn oversized_interval_is_capped_not_rejected() {
        assert_eq!(coerce_interval(1e20), MAX_INTERVAL_MINUTES);
        assert_eq!(coerce_interval(f64::INFINITY), MAX_INTERVAL_MINUTES);
        assert_eq!(coerce_interval(-1e300), MAX_INTERVAL_MINUTES);
    }

    #[test]
    fn huge_interval_input_arms_without_panicking() {
        let (mut scheduler, messages, clock) = make_scheduler(1);
        scheduler.start(true);
        messages.borrow_mut().clear();

        assert_eq!(scheduler.set_interval(1e20), MAX_INTERVAL_MINUTES);

        // The old 1-minute deadline was replaced by the capped one.
        clock.advance(MINUTE);
        assert!(!scheduler.poll(true));
        assert!(messages.borrow().is_empty());
    }

    #[test]
    fn construction_clamps_out_of_range_intervals() {
        let (mut scheduler, _messages, _clock) = make_scheduler(u64::MAX);
        assert_eq!(scheduler.interval_minutes(), MAX_INTERVAL_MINUTES);
        scheduler.start(true);

        let (scheduler, _messages, _clock) = make_scheduler(0);
        assert_eq!(scheduler.interval_minutes(), 1);
    }

    #[test]
    fn set_interval_reports_effective_period() {
        let (mut scheduler, _messages, _clock) = make_scheduler(1);
        assert_eq!(scheduler.set_interval(-3.7), 3);
        assert_eq!(scheduler.interval_minutes(), 3);
    }

    #[test]
    fn start_runs_immediate_check_when_pending() {
        let (mut scheduler, messages, _clock) = make_scheduler(1);
        scheduler.start(true);
        assert_eq!(messages.borrow().as_slice(), [MSG_PENDING_REMINDER]);
    }

    #[test]
    fn start_is_silent_when_nothing_pending() {
        let (mut scheduler, messages, _clock) = make_scheduler(1);
        scheduler.start(false);
        assert!(messages.borrow().is_empty());
    }

    #[test]
    fn poll_before_start_never_fires() {
        let (mut scheduler, messages, clock) = make_scheduler(1);
        clock.advance(10 * MINUTE);
        assert!(!scheduler.poll(true));
        assert!(messages.borrow().is_empty());
    }

    #[test]
    fn poll_fires_only_after_interval_elapses() {
        let (mut scheduler, messages, clock) = make_scheduler(2);
        scheduler.start(true);
        messages.borrow_mut().clear();

        clock.advance(MINUTE);
        assert!(!scheduler.poll(true));
        assert!(messages.borrow().is_empty());

        clock.advance(MINUTE);
        assert!(scheduler.poll(true));
        assert_eq!(messages.borrow().as_slice(), [MSG_PENDING_REMINDER]);
    }

    #[test]
    fn periodic_check_is_silent_when_pending_is_empty() {
        let (mut scheduler, messages, clock) = make_scheduler(1);
        scheduler.start(false);
        clock.advance(MINUTE);
        assert!(scheduler.poll(false));
        assert!(messages.borrow().is_empty());
    }

    #[test]
    fn set_interval_cancels_previous_deadline() {
        let (mut scheduler, messages, clock) = make_scheduler(1);
        scheduler.start(true);
        messages.borrow_mut().clear();

        // Re-arm at 5 minutes; the old 1-minute deadline must be gone.
        scheduler.set_interval(5.0);
        clock.advance(MINUTE);
        assert!(!scheduler.poll(true));

        clock.advance(4 * MINUTE);
        assert!(scheduler.poll(true));
        assert_eq!(messages.borrow().len(), 1);
    }

    #[test]
    fn repeated_set_interval_leaves_a_single_deadline() {
        let (mut scheduler, messages, clock) = make_scheduler(1);
        scheduler.start(true);
        messages.borrow_mut().clear();

        for _ in 0..10 {
            scheduler.set_interval(2.0);
        }

        clock.advance(2 * MINUTE);
        assert!(scheduler.poll(true));
        // A single firing despite ten reschedules.
        assert!(!scheduler.poll(true));
        assert_eq!(messages.borrow().len(), 1);
    }

    #[test]
    fn task_added_shows_added_message() {
        let (mut scheduler, messages, _clock) = make_scheduler(1);
        scheduler.start(false);
        scheduler.task_added("Buy milk", true);
        assert_eq!(messages.borrow().as_slice(), ["New Task added: Buy milk"]);
    }

    #[test]
    fn board_changed_fires_completion_once_then_timer_stays_silent() {
        let (mut scheduler, messages, clock) = make_scheduler(1);
        scheduler.start(true);
        messages.borrow_mut().clear();

        // Last pending task was transferred to done.
        scheduler.board_changed(false);
        assert_eq!(messages.borrow().as_slice(), [MSG_ALL_COMPLETED]);

        // The next periodic check sees an empty pending list and shows no
        // generic reminder.
        clock.advance(MINUTE);
        assert!(scheduler.poll(false));
        assert_eq!(messages.borrow().len(), 1);
    }

    #[test]
    fn board_changed_is_silent_while_tasks_remain() {
        let (mut scheduler, messages, _clock) = make_scheduler(1);
        scheduler.start(false);
        scheduler.board_changed(true);
        assert!(messages.borrow().is_empty());
    }

    #[test]
    fn denied_permission_suppresses_display_but_not_operation() {
        let messages = Rc::new(RefCell::new(Vec::new()));
        let notifier = RecordingNotifier {
            messages: Rc::clone(&messages),
            granted: false,
        };
        let clock = ManualClock::new();
        let mut scheduler =
            ReminderScheduler::new(Box::new(notifier), Box::new(Rc::clone(&clock)), 1);

        // Permission was never granted, so the collaborator drops the call.
        scheduler.check_and_notify(true);
        assert!(messages.borrow().is_empty());
        // The scheduler still tracked what it asked to display.
        assert_eq!(scheduler.last_message(), Some(MSG_PENDING_REMINDER));
    }
}
