//! Import rate-limit policy.
//!
//! A user may start at most [`MAX_IMPORTS_PER_WINDOW`] imports within the
//! trailing [`RATE_LIMIT_WINDOW_MINUTES`]. The limiter itself holds no state:
//! the API layer counts the user's recent `import_logs` rows and asks this
//! module for a verdict. Allowed attempts are logged by the caller after
//! commit, so the next call sees an updated count.

/// Length of the trailing rate-limit window.
pub const RATE_LIMIT_WINDOW_MINUTES: i64 = 60;

/// Maximum imports a user may start within one window.
pub const MAX_IMPORTS_PER_WINDOW: i64 = 5;

/// Returns `true` if a user with `recent_imports` attempts inside the
/// current window may start another import.
pub fn import_allowed(recent_imports: i64) -> bool {
    recent_imports < MAX_IMPORTS_PER_WINDOW
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowed_below_limit() {
        assert!(import_allowed(0));
        assert!(import_allowed(4));
    }

    #[test]
    fn blocked_at_limit() {
        assert!(!import_allowed(5));
        assert!(!import_allowed(6));
    }

    #[test]
    fn window_is_one_hour() {
        assert_eq!(RATE_LIMIT_WINDOW_MINUTES, 60);
    }
}
