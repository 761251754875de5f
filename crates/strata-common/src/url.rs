//! URL resolution utilities for image paints.
//!
//! [URL Standard](https://url.spec.whatwg.org/)

/// Resolve a potentially relative URL against a base URL.
///
/// # Algorithm
///
/// STEP 1: Absolute URLs (`http:`, `https:`, `data:`, `file:`, `blob:`) are
/// returned unchanged.
///
/// STEP 2: Protocol-relative URLs (`//host/path`) take the base scheme, or
/// `https:` when there is no base.
///
/// STEP 3: Root-relative paths (`/path`) join the base origin.
///
/// STEP 4: Other relative paths join the base directory.
///
/// NOTE: This is a simplified implementation. `.` and `..` segments are not
/// collapsed.
#[must_use]
pub fn resolve_url(href: &str, base_url: Option<&str>) -> String {
    let href = href.trim();

    // STEP 1
    if is_absolute(href) {
        return href.to_string();
    }

    // STEP 2
    if href.starts_with("//") {
        let scheme = match base_url {
            Some(base) if base.starts_with("http:") => "http:",
            _ => "https:",
        };
        return format!("{scheme}{href}");
    }

    let Some(base) = base_url else {
        return href.to_string();
    };

    if href.starts_with('/') {
        // STEP 3
        origin_of(base).map_or_else(|| href.to_string(), |origin| format!("{origin}{href}"))
    } else {
        // STEP 4
        let base_dir = base.rsplit_once('/').map_or(base, |(dir, _)| dir);
        format!("{base_dir}/{href}")
    }
}

/// The first URL of a `srcset` attribute, with its width/density descriptor
/// dropped.
///
/// [§ 4.8.4.3 srcset](https://html.spec.whatwg.org/multipage/images.html#srcset-attributes)
#[must_use]
pub fn first_srcset_candidate(srcset: &str) -> Option<&str> {
    srcset
        .split(|c: char| c == ',' || c.is_whitespace())
        .find(|candidate| !candidate.is_empty())
}

fn is_absolute(href: &str) -> bool {
    ["http://", "https://", "data:", "file:", "blob:"]
        .iter()
        .any(|scheme| href.starts_with(scheme))
}

/// `scheme://host[:port]` of an absolute URL.
fn origin_of(base: &str) -> Option<&str> {
    let scheme_end = base.find("://")?;
    let after_scheme = &base[scheme_end + 3..];
    Some(after_scheme.find('/').map_or(base, |path_start| {
        &base[..scheme_end + 3 + path_start]
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_relative_defaults_to_https() {
        assert_eq!(
            resolve_url("//cdn.example.com/a.png", None),
            "https://cdn.example.com/a.png"
        );
    }

    #[test]
    fn test_root_relative_joins_origin() {
        assert_eq!(
            resolve_url("/img/logo.png", Some("https://example.com/docs/page.html")),
            "https://example.com/img/logo.png"
        );
    }

    #[test]
    fn test_relative_joins_directory() {
        assert_eq!(
            resolve_url("logo.png", Some("https://example.com/docs/page.html")),
            "https://example.com/docs/logo.png"
        );
    }

    #[test]
    fn test_first_srcset_candidate() {
        assert_eq!(
            first_srcset_candidate("a.webp 1x, b.webp 2x"),
            Some("a.webp")
        );
        assert_eq!(first_srcset_candidate("  "), None);
    }
}
