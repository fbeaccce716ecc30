//! Request matching seam
//!
//! The selection engine never inspects requests itself; it asks a
//! [`RequestMatcher`] which registered stubs match textually and only then
//! applies scenario gating.

use crate::mapping::StubMapping;

/// Method and URL of an incoming request
pub trait RequestLine {
    /// HTTP method
    fn method(&self) -> &str;

    /// Request URL, path plus query
    fn url(&self) -> &str;
}

/// Decides whether a request matches a stub's pattern, ignoring scenarios
pub trait RequestMatcher<Q: ?Sized>: Send + Sync {
    /// Check if `request` matches `stub`
    fn matches(&self, request: &Q, stub: &StubMapping) -> bool;
}

/// Case-insensitive method and exact URL equality
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatcher;

/// Method wildcard
pub const ANY_METHOD: &str = "ANY";

impl<Q: RequestLine + ?Sized> RequestMatcher<Q> for ExactMatcher {
    fn matches(&self, request: &Q, stub: &StubMapping) -> bool {
        let pattern = &stub.request;
        let method_ok = pattern.method.eq_ignore_ascii_case(ANY_METHOD)
            || pattern.method.eq_ignore_ascii_case(request.method());
        method_ok && pattern.url == request.url()
    }
}
