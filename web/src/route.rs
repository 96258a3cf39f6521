//! Inbound route pattern.
//!
//! The dispatcher is mounted under a path prefix and claims the next two
//! segments:
//!
//! ```text
//! {mount}:controller?/:action?
//! ```
//!
//! Segments beyond the action are ignored, like a prefix mount. Bound segments
//! are percent-decoded, so `/home/about%20us` binds the action `about us`.

use mvc_dispatch_core::DispatchOptions;

/// Controller and action segments bound from a request path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTokens {
    /// First segment after the mount path
    pub controller: Option<String>,
    /// Second segment after the mount path
    pub action: Option<String>,
}

/// Render the route pattern for logs.
///
/// # Example
///
/// ```
/// use mvc_dispatch_core::DispatchOptions;
/// use mvc_dispatch_web::route_pattern;
///
/// assert_eq!(route_pattern(&DispatchOptions::default()), "/:controller?/:action?");
///
/// let options = DispatchOptions::builder().mount_path("site").tokens("c", "a").build();
/// assert_eq!(route_pattern(&options), "/site/:c?/:a?");
/// ```
#[must_use]
pub fn route_pattern(options: &DispatchOptions) -> String {
    format!(
        "{}:{}?/:{}?",
        options.mount_path, options.controller_token, options.action_token
    )
}

/// Bind the segments of `path` under `mount_path`.
///
/// Returns `None` when the path lies outside the mount or a bound segment
/// does not decode to UTF-8. `mount_path` is expected in normalised form
/// (leading and trailing `/`).
#[must_use]
pub fn bind(path: &str, mount_path: &str) -> Option<RouteTokens> {
    let rest = if let Some(rest) = path.strip_prefix(mount_path) {
        rest
    } else if path == mount_path.trim_end_matches('/') {
        ""
    } else {
        return None;
    };

    let mut segments = rest.split('/').filter(|s| !s.is_empty()).map(decode);
    Some(RouteTokens {
        controller: segments.next().map_or(Some(None), |s| s.map(Some))?,
        action: segments.next().map_or(Some(None), |s| s.map(Some))?,
    })
}

fn decode(segment: &str) -> Option<String> {
    match urlencoding::decode(segment) {
        Ok(decoded) => Some(decoded.into_owned()),
        Err(error) => {
            tracing::debug!(segment, %error, "Route segment is not valid UTF-8");
            None
        }
    }
}
