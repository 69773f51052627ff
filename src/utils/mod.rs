// Utility functions

/// Resolve an image URL against a base URL.
/// If the image URL is already absolute, return it as-is.
/// If relative, resolve it against the base URL's path.
pub fn resolve_image_url(image_url: &str, base_url: &str) -> Option<String> {
    if url::Url::parse(image_url).is_ok() {
        return Some(image_url.to_string());
    }

    let base = url::Url::parse(base_url).ok()?;
    base.join(image_url).ok().map(|resolved| resolved.to_string())
}
