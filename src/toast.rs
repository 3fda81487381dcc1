//! Transient notification messages
//!
//! Mutations and background fetches report their outcome as a toast; the
//! surrounding UI decides how long to keep it on screen.

use std::time::Instant;

use owo_colors::AnsiColors;

/// One notification: what to say, how loudly, and since when
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
    /// Creation time, for the caller's expiry policy
    pub timestamp: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
    Success,
}

impl Toast {
    pub fn new(message: String, level: ToastLevel) -> Self {
        Self {
            message,
            level,
            timestamp: Instant::now(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message.into(), ToastLevel::Info)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message.into(), ToastLevel::Warning)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message.into(), ToastLevel::Error)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message.into(), ToastLevel::Success)
    }

    /// Terminal color for this level
    pub fn color(&self) -> AnsiColors {
        match self.level {
            ToastLevel::Info => AnsiColors::Cyan,
            ToastLevel::Warning => AnsiColors::Yellow,
            ToastLevel::Error => AnsiColors::Red,
            ToastLevel::Success => AnsiColors::Green,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_levels() {
        assert_eq!(Toast::success("saved").level, ToastLevel::Success);
        assert_eq!(Toast::error("failed").level, ToastLevel::Error);
        assert_eq!(Toast::info("note").level, ToastLevel::Info);
        assert_eq!(Toast::warning("careful").level, ToastLevel::Warning);
    }

    #[test]
    fn test_toast_message_preserved() {
        let toast = Toast::error("Course could not be deleted");
        assert_eq!(toast.message, "Course could not be deleted");
        assert_eq!(toast.color(), AnsiColors::Red);
    }
}
