use std::cell::RefCell;
use std::fmt;

use crate::render::html_escape;

/// How long a toast stays on screen before it dismisses itself.
pub const TOAST_DISMISS_MS: u32 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Info,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Info => "info",
            Severity::Warning => "warning",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Severity::Success => "#4CAF50",
            Severity::Error => "#F44336",
            Severity::Info => "#2196F3",
            Severity::Warning => "#FF9800",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    pub fn new(message: &str, severity: Severity) -> Self {
        Notification {
            message: message.to_string(),
            severity,
        }
    }
}

/// Fire-and-forget acknowledgement of an operation's outcome.
pub trait Notifier {
    fn notify(&self, message: &str, severity: Severity);
}

/// Prints notifications on stderr so they never mix with command output.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Error => log::warn!("notification [{}]: {}", severity, message),
            _ => log::info!("notification [{}]: {}", severity, message),
        }
        eprintln!("[{}] {}", severity, message);
    }
}

/// Forwards to another notifier and keeps the most recent notification,
/// so a page rendered right after the operation can show it as a toast.
pub struct KeepLast<N: Notifier> {
    inner: N,
    last: RefCell<Option<Notification>>,
}

impl<N: Notifier> KeepLast<N> {
    pub fn new(inner: N) -> Self {
        KeepLast {
            inner,
            last: RefCell::new(None),
        }
    }

    pub fn take(&self) -> Option<Notification> {
        self.last.borrow_mut().take()
    }
}

impl<N: Notifier> Notifier for KeepLast<N> {
    fn notify(&self, message: &str, severity: Severity) {
        self.inner.notify(message, severity);
        *self.last.borrow_mut() = Some(Notification::new(message, severity));
    }
}

/// Toast markup for a page. A page carries at most one toast; the
/// `{{notification}}` placeholder is filled once per render.
pub fn toast_html(notification: &Notification) -> String {
    format!(
        r#"<div class="notification notification-{sev}" role="status" data-dismiss-ms="{ms}" style="background: {color};">{msg}</div>"#,
        sev = notification.severity,
        ms = TOAST_DISMISS_MS,
        color = notification.severity.color(),
        msg = html_escape(&notification.message),
    )
}
