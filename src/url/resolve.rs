use url::Url;

/// Resolves an anchor href to an absolute URL against its containing page
///
/// Relative hrefs are joined against `base`, the URL of the page the anchor
/// was found on, so the same entry linked from two section pages resolves to
/// the same absolute URL string.
///
/// Returns None if the link should be excluded:
/// - empty hrefs
/// - `javascript:`, `mailto:`, `tel:` schemes
/// - `data:` URIs
/// - fragment-only links (same page anchors)
/// - hrefs that fail to resolve
/// - non-HTTP(S) URLs after resolution
///
/// # Examples
///
/// ```
/// use etcsl_harvest::url::resolve_href;
/// use url::Url;
///
/// let base = Url::parse("https://etcsl.orinst.ox.ac.uk/section1/tr1.htm").unwrap();
/// let resolved = resolve_href("mythA.htm", &base).unwrap();
/// assert_eq!(resolved.as_str(), "https://etcsl.orinst.ox.ac.uk/section1/mythA.htm");
/// ```
pub fn resolve_href(href: &str, base: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    if href.starts_with('#') {
        return None;
    }

    match base.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url)
            } else {
                None
            }
        }
        Err(_) => None,
    }
}
