use serde::Serialize;

/// How long a notice stays on screen before the page dismisses it
pub const NOTICE_TTL_MS: u64 = 3000;

/// Message shown for any failure whose details are only logged
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Info,
    Warning,
    Error,
}

impl NoticeKind {
    pub fn color(self) -> &'static str {
        match self {
            NoticeKind::Success => "green",
            NoticeKind::Info => "blue",
            NoticeKind::Warning => "amber",
            NoticeKind::Error => "red",
        }
    }
}

/// A transient on-screen message
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub color: &'static str,
    pub message: String,
    pub dismiss_after_ms: u64,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            color: kind.color(),
            message: message.into(),
            dismiss_after_ms: NOTICE_TTL_MS,
        }
    }
}

/// Builds a notice and logs it at the level matching its kind
pub fn notify(kind: NoticeKind, message: impl Into<String>) -> Notice {
    let notice = Notice::new(kind, message);

    match kind {
        NoticeKind::Success | NoticeKind::Info => {
            tracing::info!(kind = ?kind, message = %notice.message, "Notice")
        }
        NoticeKind::Warning => tracing::warn!(message = %notice.message, "Notice"),
        NoticeKind::Error => tracing::error!(message = %notice.message, "Notice"),
    }

    notice
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_notice_uses_fixed_timeout() {
        for kind in [
            NoticeKind::Success,
            NoticeKind::Info,
            NoticeKind::Warning,
            NoticeKind::Error,
        ] {
            assert_eq!(notify(kind, "x").dismiss_after_ms, 3000);
        }
    }

    #[test]
    fn test_colors() {
        assert_eq!(Notice::new(NoticeKind::Success, "ok").color, "green");
        assert_eq!(Notice::new(NoticeKind::Warning, "dup").color, "amber");
        assert_eq!(Notice::new(NoticeKind::Error, "boom").color, "red");
    }

    #[test]
    fn test_notice_json_shape() {
        let json = serde_json::to_value(Notice::new(NoticeKind::Info, "hello")).unwrap();
        assert_eq!(json["kind"], "info");
        assert_eq!(json["color"], "blue");
        assert_eq!(json["message"], "hello");
        assert_eq!(json["dismiss_after_ms"], 3000);
    }
}
