//! Slug derivation for category names.

/// Derives a URL-safe slug from a display name.
///
/// Lowercases the name and collapses whitespace runs into single hyphens.
/// The slug is stored alongside the name and must stay derivable from it:
/// renaming a category re-derives its slug.
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}
