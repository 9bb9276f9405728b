/// Shown when an entity has no image.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

/// Resolve a media path returned by the backend (`/uploads/avatars/a.png`)
/// into a URL on the backend origin.
///
/// Missing paths map to the placeholder; absolute URLs pass through.
pub fn media_url(path: Option<&str>, origin: &str) -> String {
    let Some(path) = path.map(str::trim).filter(|p| !p.is_empty()) else {
        return PLACEHOLDER_IMAGE.to_string();
    };
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let origin = origin.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", origin, path)
    } else {
        format!("{}/{}", origin, path)
    }
}
