//! Result rendering helpers.

use url::Url;

/// Resolve a result image path against the service's static-file host.
///
/// Relative paths are joined onto `static_base` (leading `/` and `./` are
/// ignored so they stay under the configured base). Paths that are already
/// absolute `http(s)` URLs are returned unchanged.
///
/// # Examples
/// ```
/// use tryon_models::resolve_result_url;
/// use url::Url;
///
/// let base = Url::parse("http://localhost:8000/").unwrap();
/// let url = resolve_result_url(&base, "results/42.png").unwrap();
/// assert_eq!(url.as_str(), "http://localhost:8000/results/42.png");
/// ```
pub fn resolve_result_url(static_base: &Url, path: &str) -> Result<Url, url::ParseError> {
    let path = path.trim();
    if path.starts_with("http://") || path.starts_with("https://") {
        return Url::parse(path);
    }

    let relative = path.trim_start_matches("./").trim_start_matches('/');

    // Url::join drops the last segment of a base without a trailing slash
    if static_base.path().ends_with('/') {
        static_base.join(relative)
    } else {
        let mut base = static_base.clone();
        base.set_path(&format!("{}/", static_base.path()));
        base.join(relative)
    }
}

/// Format a processing time in seconds for display, e.g. `3.14s`.
pub fn format_processing_time(seconds: f64) -> String {
    format!("{:.2}s", seconds)
}
