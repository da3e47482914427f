use std::fmt;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// Transient user-facing message (toast in a browser, a stderr line in
/// the CLI).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(err: &CoreError) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: err.user_message(),
        }
    }

    /// "Discount saved", "Supplier deleted", ...
    pub fn done(entity: &str, verb: &str) -> Self {
        let mut chars = entity.chars();
        let subject = chars
            .next()
            .map(|c| c.to_uppercase().chain(chars).collect::<String>())
            .unwrap_or_default();
        Self::success(format!("{subject} {verb}"))
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn done_capitalizes_entity() {
        assert_eq!(Notice::done("discount", "saved").message, "Discount saved");
        assert_eq!(Notice::done("MR visit", "deleted").message, "MR visit deleted");
    }

    #[test]
    fn error_uses_fallback_message() {
        let err = CoreError::FetchFailed {
            entity: "orders".into(),
            status: None,
            detail: None,
        };
        assert_eq!(Notice::error(&err).message, "Failed to fetch orders");
    }
}
