//! [§ 4.5 Resource Locators: the `<url>` type](https://www.w3.org/TR/css-values-4/#urls)

/// The first `url(...)` in a value such as `background-image`, with any
/// surrounding quotes removed.
///
/// "The `<url>` type is written as url(), with the URL written between the
/// parentheses, optionally quoted."
#[must_use]
pub fn extract_url(value: &str) -> Option<String> {
    let start = value.find("url(")? + "url(".len();
    let rest = &value[start..];

    let inner = match rest.chars().next()? {
        quote @ ('"' | '\'') => {
            let body = &rest[1..];
            &body[..body.find(quote)?]
        }
        _ => rest[..rest.find(')')?].trim(),
    };

    (!inner.is_empty()).then(|| inner.to_string())
}
