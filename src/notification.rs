//! Decode/encode diagnostics.
//!
//! Non-fatal issues met while decoding a record (unknown group codes,
//! subclass marker mismatches, comments, unparseable values) are collected as
//! [`Notification`] items and returned next to the record instead of being
//! dropped or aborting the decode.
//!
//! Every notification is also emitted as a `tracing` event at the moment it
//! is recorded, and a collection can be forwarded to any external
//! [`DiagnosticsSink`].

use std::fmt;

/// Category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationType {
    /// A group code the active schema does not know (or not at this version).
    UnknownGroupCode,
    /// A subclass marker (code 100) that the schema does not expect.
    SubclassMismatch,
    /// A comment (code 999); never stored in a record.
    Comment,
    /// A value that could not be parsed as its field type.
    InvalidValue,
    /// An entity type / section with no schema; skipped.
    NotImplemented,
    /// Any other non-fatal warning.
    Warning,
}

impl NotificationType {
    /// Whether this notification is informational rather than a warning.
    pub fn is_info(&self) -> bool {
        matches!(self, Self::Comment | Self::NotImplemented)
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownGroupCode => write!(f, "UnknownGroupCode"),
            Self::SubclassMismatch => write!(f, "SubclassMismatch"),
            Self::Comment => write!(f, "Comment"),
            Self::InvalidValue => write!(f, "InvalidValue"),
            Self::NotImplemented => write!(f, "NotImplemented"),
            Self::Warning => write!(f, "Warning"),
        }
    }
}

/// A single diagnostic produced while decoding or encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    /// The category.
    pub notification_type: NotificationType,
    /// A human-readable description of the issue.
    pub message: String,
    /// Line of the offending code line, when known.
    pub line: Option<usize>,
    /// Offending group code, when known.
    pub code: Option<i32>,
}

impl Notification {
    /// Create a new notification without position information.
    pub fn new(notification_type: NotificationType, message: impl Into<String>) -> Self {
        Self {
            notification_type,
            message: message.into(),
            line: None,
            code: None,
        }
    }

    /// Attach the line and group code the notification refers to.
    pub fn at(mut self, line: usize, code: i32) -> Self {
        self.line = Some(line);
        self.code = Some(code);
        self
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.notification_type, self.message)?;
        if let Some(line) = self.line {
            write!(f, " (line {})", line)?;
        }
        Ok(())
    }
}

/// External receiver of diagnostics.
///
/// The codec calls into a sink but never owns it.
pub trait DiagnosticsSink {
    /// Receive a warning.
    fn warn(&mut self, notification: &Notification);

    /// Receive an informational message.
    fn info(&mut self, notification: &Notification);
}

/// Sink that forwards everything to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn warn(&mut self, notification: &Notification) {
        tracing::warn!(line = notification.line, code = notification.code, "{}", notification);
    }

    fn info(&mut self, notification: &Notification) {
        tracing::info!(line = notification.line, code = notification.code, "{}", notification);
    }
}

/// Collects notifications during a decode/encode operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationCollection {
    items: Vec<Notification>,
}

impl NotificationCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Record a notification without position information.
    pub fn notify(&mut self, notification_type: NotificationType, message: impl Into<String>) {
        self.push(Notification::new(notification_type, message));
    }

    /// Record a notification tied to a line and group code.
    pub fn notify_at(
        &mut self,
        notification_type: NotificationType,
        line: usize,
        code: i32,
        message: impl Into<String>,
    ) {
        self.push(Notification::new(notification_type, message).at(line, code));
    }

    /// Record a prepared notification.
    pub fn push(&mut self, notification: Notification) {
        if notification.notification_type == NotificationType::Comment {
            tracing::trace!(line = notification.line, "{}", notification);
        } else if notification.notification_type.is_info() {
            tracing::debug!(line = notification.line, "{}", notification);
        } else {
            tracing::warn!(line = notification.line, code = notification.code, "{}", notification);
        }
        self.items.push(notification);
    }

    /// Move every notification of `other` into this collection.
    pub fn extend(&mut self, other: NotificationCollection) {
        self.items.extend(other.items);
    }

    /// Check if there are any notifications.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of notifications.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Iterate over all notifications.
    pub fn iter(&self) -> std::slice::Iter<'_, Notification> {
        self.items.iter()
    }

    /// Get all notifications of a specific type.
    pub fn of_type(&self, nt: NotificationType) -> Vec<&Notification> {
        self.items.iter().filter(|n| n.notification_type == nt).collect()
    }

    /// Check whether any notification of the given type exists.
    pub fn has_type(&self, nt: NotificationType) -> bool {
        self.items.iter().any(|n| n.notification_type == nt)
    }

    /// Hand every notification to an external sink, in order.
    pub fn forward_to(&self, sink: &mut dyn DiagnosticsSink) {
        for n in &self.items {
            if n.notification_type.is_info() {
                sink.info(n);
            } else {
                sink.warn(n);
            }
        }
    }

    /// Consume the collection into a `Vec`.
    pub fn into_vec(self) -> Vec<Notification> {
        self.items
    }
}

impl IntoIterator for NotificationCollection {
    type Item = Notification;
    type IntoIter = std::vec::IntoIter<Notification>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a NotificationCollection {
    type Item = &'a Notification;
    type IntoIter = std::slice::Iter<'a, Notification>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
