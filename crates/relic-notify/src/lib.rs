#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]

//! Operator notification for unattended maintenance runs.
//!
//! Scheduled runs have nobody watching a console, so critical problems (an
//! unreachable backup destination, most importantly) surface through a popup
//! on the desktop. The mechanism is pluggable; only Windows gets a native
//! message box, everything else falls back to stderr.

#[cfg(windows)]
use std::process::Command;

/// Something that can surface a short message to the operator.
///
/// Implementations must never block the run: notification is fire-and-forget
/// and failures to display are ignored.
pub trait Notifier: Send + Sync {
    /// Surface `body` under the heading `title`.
    fn notify(&self, title: &str, body: &str);
}

/// Desktop popup notifier.
///
/// On Windows this launches a detached PowerShell `MessageBox`, which works
/// from console sessions and Task Scheduler alike and keeps displaying even
/// after the process exits. Elsewhere it writes one line to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct PopupNotifier;

impl Notifier for PopupNotifier {
    fn notify(&self, title: &str, body: &str) {
        show_popup(title, body);
    }
}

#[cfg(windows)]
fn show_popup(title: &str, body: &str) {
    let script = format!(
        "Add-Type -AssemblyName System.Windows.Forms; \
         [System.Windows.Forms.MessageBox]::Show(\"{}\", \"{}\", \
         [System.Windows.Forms.MessageBoxButtons]::OK, \
         [System.Windows.Forms.MessageBoxIcon]::Error)",
        escape_for_powershell(body),
        escape_for_powershell(title),
    );

    // Spawn without waiting so the popup can outlive the process.
    let _ = Command::new("powershell")
        .args(["-WindowStyle", "Hidden", "-NoProfile", "-Command", &script])
        .spawn();
}

#[cfg(not(windows))]
fn show_popup(title: &str, body: &str) {
    // No native popup mechanism in a CLI context; stderr is the fallback.
    eprintln!("POPUP [{title}]: {body}");
}

/// Escape embedded double quotes for interpolation into a PowerShell string.
#[cfg(any(windows, test))]
fn escape_for_powershell(raw: &str) -> String {
    raw.replace('"', "`\"")
}

/// Notifier that records messages instead of displaying them; for wiring
/// tests in consumers.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: std::sync::Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    /// Messages captured so far as `(title, body)` pairs.
    #[must_use]
    pub fn messages(&self) -> Vec<(String, String)> {
        self.messages
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, title: &str, body: &str) {
        self.messages
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push((title.to_string(), body.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_are_escaped_for_powershell() {
        assert_eq!(
            escape_for_powershell(r#"path "with" quotes"#),
            "path `\"with`\" quotes"
        );
        assert_eq!(escape_for_powershell("plain"), "plain");
    }

    #[test]
    fn recording_notifier_captures_messages() {
        let recorder = RecordingNotifier::default();
        recorder.notify("Backup Location Error", "cannot access /mnt/bk");

        let messages = recorder.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].0, "Backup Location Error");
    }
}
