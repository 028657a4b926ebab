//! Dependency manifest for the bundled `site-packages`
//!
//! The project's own wheel comes first so `uv pip install -r` installs it
//! alongside its pinned dependencies.

pub const REQUIREMENTS_FILE: &str = "requirements.txt";

/// `my-app`, `0.1.0`, `py3-none-any` -> `my_app-0.1.0-py3-none-any.whl`
pub fn wheel_file_name(name: &str, version: &str, platform_tag: &str) -> String {
    format!("{}-{}-{}.whl", wheel_name(name), version, platform_tag)
}

/// Distribution name as it appears in wheel file names
///
/// Lowercased, with every run of `-`, `_` and `.` folded to one `_`:
/// `My.App` -> `my_app`.
pub fn wheel_name(name: &str) -> String {
    name.split(['-', '_', '.'])
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// Keep pinned requirement lines from `uv export` output
///
/// Comments, blank lines and anything without a `==` pin are dropped.
pub fn pinned_lines(exported: &str) -> Vec<&str> {
    exported
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && line.contains("=="))
        .collect()
}

/// Full requirements file contents: the wheel followed by the pins
pub fn render_requirements(
    name: &str,
    version: &str,
    platform_tag: &str,
    exported: &str,
) -> String {
    let wheel = wheel_file_name(name, version, platform_tag);
    std::iter::once(wheel.as_str())
        .chain(pinned_lines(exported))
        .collect::<Vec<_>>()
        .join("\n")
}
