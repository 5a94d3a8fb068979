//! Response headers that harden browser handling of every response.
//!
//! Rendered pages contain no inline script, so the content security policy
//! can forbid everything but same-origin resources.

use actix_web::http::header;
use actix_web::middleware::DefaultHeaders;

/// Content security policy applied to all responses.
pub const CONTENT_SECURITY_POLICY: &str =
    "default-src 'self'; frame-ancestors 'none'; object-src 'none'; base-uri 'none'";

/// Header name/value pairs added to every response that lacks them.
pub const SECURITY_HEADERS: [(&str, &str); 4] = [
    ("content-security-policy", CONTENT_SECURITY_POLICY),
    ("x-frame-options", "DENY"),
    ("x-content-type-options", "nosniff"),
    ("referrer-policy", "no-referrer"),
];

/// Build the middleware. Handlers that set one of these headers keep theirs.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use bastion::middleware::security_headers;
///
/// let _app = App::new().wrap(security_headers());
/// ```
pub fn security_headers() -> DefaultHeaders {
    SECURITY_HEADERS
        .into_iter()
        .fold(DefaultHeaders::new(), |headers, (name, value)| {
            headers.add((name, value))
        })
        .add((header::CACHE_CONTROL, "no-store"))
}
