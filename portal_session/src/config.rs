use std::env;
use std::sync::LazyLock;

/// Prefix for the integration layer's auth routes, e.g. `/api/auth/me`.
pub static PORTAL_ROUTE_PREFIX: LazyLock<String> = LazyLock::new(|| {
    env::var("PORTAL_ROUTE_PREFIX").unwrap_or_else(|_| "/api".to_string())
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_prefix_has_a_default() {
        assert!(PORTAL_ROUTE_PREFIX.starts_with('/'));
    }
}
