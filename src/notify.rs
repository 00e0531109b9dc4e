//! Notification display port.
//!
//! Notifications are fire-and-forget: a denied or unavailable capability
//! silently disables display and never blocks board operations. The desktop
//! channel shells out to `notify-send` when it is present on the system.

use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

/// Title used for every displayed notification.
pub const NOTIFICATION_TITLE: &str = "Todo List";

/// Notification display capability.
pub trait Notifier {
    /// Requests permission to display notifications. Idempotent; repeated
    /// calls after a grant or denial are no-ops.
    fn request_permission(&mut self);

    /// Displays `message`. No-op unless permission was previously granted.
    fn show(&mut self, message: &str);
}

/// Permission state of the desktop channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Permission {
    Unasked,
    Granted,
    Denied,
}

/// Desktop notifications via the `notify-send` command.
pub struct DesktopNotifier {
    permission: Permission,
}

impl DesktopNotifier {
    pub fn new() -> Self {
        Self {
            permission: Permission::Unasked,
        }
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for DesktopNotifier {
    fn request_permission(&mut self) {
        if self.permission != Permission::Unasked {
            return;
        }

        let available = Command::new("notify-send")
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false);

        self.permission = if available {
            info!("desktop notifications enabled");
            Permission::Granted
        } else {
            warn!("notify-send unavailable, notifications disabled");
            Permission::Denied
        };
    }

    fn show(&mut self, message: &str) {
        if self.permission != Permission::Granted {
            debug!("notification suppressed (no permission): {message}");
            return;
        }

        // Fire-and-forget: a failed spawn must never surface to the caller.
        let mut command = Command::new("notify-send");
        command
            .arg(NOTIFICATION_TITLE)
            .arg(message)
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        match spawn_detached(command) {
            Ok(()) => debug!("notification shown: {message}"),
            Err(e) => warn!("cannot spawn notify-send: {e}"),
        }
    }
}

/// Spawns `command` without blocking the caller, reaping the child from a
/// background thread so it never lingers as a zombie.
fn spawn_detached(mut command: Command) -> std::io::Result<()> {
    let mut child = command.spawn()?;
    std::thread::spawn(move || {
        let _ = child.wait();
    });
    Ok(())
}

/// Permanently silent notifier.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn request_permission(&mut self) {}

    fn show(&mut self, _message: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unasked_desktop_notifier_suppresses_show() {
        // Without request_permission, show must be a silent no-op even on
        // systems where notify-send exists.
        let mut notifier = DesktopNotifier::new();
        notifier.show("should not display");
        assert_eq!(notifier.permission, Permission::Unasked);
    }

    #[test]
    fn permission_request_is_idempotent() {
        let mut notifier = DesktopNotifier::new();
        notifier.request_permission();
        let first = notifier.permission;
        notifier.request_permission();
        assert_eq!(notifier.permission, first);
        assert_ne!(notifier.permission, Permission::Unasked);
    }

    #[test]
    fn spawn_detached_reaps_the_child() {
        let mut command = Command::new("sh");
        command.arg("-c").arg("exit 0");
        spawn_detached(command).expect("spawn");
        // Give the reaper thread a moment; the wait must not block us.
        std::thread::sleep(std::time::Duration::from_millis(50));
    }

    #[test]
    fn spawn_detached_reports_missing_binary() {
        let command = Command::new("definitely-not-a-real-binary-todor");
        assert!(spawn_detached(command).is_err());
    }

    #[test]
    fn null_notifier_accepts_everything() {
        let mut notifier = NullNotifier;
        notifier.request_permission();
        notifier.show("ignored");
    }
}
