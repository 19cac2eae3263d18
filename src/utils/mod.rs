//! Utility functions and helpers

use std::path::{Component, Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

/// Stylesheet outputs across all supported mini program targets
static STYLE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\.(css|scss|sass|less|styl|wxss|acss|ttss|jxss|qss)(\?.*)?$").unwrap()
});

static CAMEL_BOUNDARY_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-z\d])([A-Z])").unwrap());

static WINDOWS_ABSOLUTE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z]:[\\/]").unwrap());

/// Check if an asset name is a stylesheet
pub fn is_style_file(name: &str) -> bool {
    STYLE_REGEX.is_match(name)
}

/// Convert a component export name to its dashed tag name (`ScrollView` -> `scroll-view`)
pub fn to_dashed(name: &str) -> String {
    CAMEL_BOUNDARY_REGEX
        .replace_all(name, "$1-$2")
        .to_lowercase()
}

/// File name without directory and extension
pub fn base_name(path: &str) -> &str {
    Path::new(path)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(path)
}

/// Drop empty and `.` segments, keeping `..` so unreachable paths stay detectable
fn normalize_segments(path: &str) -> PathBuf {
    let mut result = if path.starts_with('/') {
        PathBuf::from("/")
    } else {
        PathBuf::new()
    };
    for part in path.split(['/', '\\']) {
        if !part.is_empty() && part != "." {
            result.push(part);
        }
    }
    result
}

/// Relative module reference from the chunk `from` to the chunk `to`.
///
/// Chunk keys are output paths without extension, so the reference is
/// computed from the directory containing `from`. The result always starts
/// with `./` or `../` so it is never mistaken for a package request.
/// Returns `None` when no relative path exists.
pub fn promote_relative_path(from: &str, to: &str) -> Option<String> {
    let from = normalize_segments(from);
    let base = from.parent().unwrap_or_else(|| Path::new(""));
    let target = normalize_segments(to);

    let relative = pathdiff::diff_paths(&target, base)?;

    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::ParentDir => segments.push("..".to_string()),
            Component::Normal(part) => segments.push(part.to_str()?.to_string()),
            Component::CurDir => {}
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    let joined = segments.join("/");
    if joined.is_empty() {
        Some(".".to_string())
    } else if joined.starts_with("..") {
        Some(joined)
    } else {
        Some(format!("./{}", joined))
    }
}

/// Turn an asset file name into a request usable from a stylesheet `@import`
pub fn url_to_request(url: &str) -> String {
    if let Some(module) = url.strip_prefix('~') {
        return module.to_string();
    }
    if url.starts_with('/')
        || url.starts_with("./")
        || url.starts_with("../")
        || WINDOWS_ABSOLUTE_REGEX.is_match(url)
    {
        return url.to_string();
    }
    format!("./{}", url)
}

/// Format duration as human-readable string
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs_f64();

    if secs >= 1.0 {
        format!("{:.2}s", secs)
    } else {
        format!("{:.0}ms", secs * 1000.0)
    }
}
