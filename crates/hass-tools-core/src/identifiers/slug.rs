//! Label to machine identifier transform

/// Derive a machine identifier from a display label
///
/// Letters and digits are kept lower-cased, runs of whitespace, `-` and `_`
/// become a single `_`, everything else is dropped. The result never starts
/// or ends with `_`.
pub fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());

    for ch in label.chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
        } else if (ch.is_whitespace() || ch == '-' || ch == '_')
            && !slug.is_empty()
            && !slug.ends_with('_')
        {
            slug.push('_');
        }
    }

    if slug.ends_with('_') {
        slug.pop();
    }
    slug
}
