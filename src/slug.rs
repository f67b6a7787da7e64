//! Slug derivation
//!
//! Tool slugs are either authored in the YAML or derived from the display
//! name. Objective documents written against older datasets refer to tools by
//! a slug derived this way, so the derivation must stay stable: it is part of
//! the cross-reference contract, not a cosmetic transform.

/// Derive a URL-safe slug from a display name.
///
/// Rules: lowercase; `&` becomes `and`; any run of other non-alphanumeric
/// characters collapses to a single `_`; leading/trailing `_` are trimmed.
/// Deterministic and idempotent.
///
/// ```
/// use policy_toolkit::slug::slugify;
/// assert_eq!(slugify("R&D Tax Credits"), "r_and_d_tax_credits");
/// ```
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_sep = false;

    for c in name.chars() {
        if c == '&' {
            if !out.is_empty() {
                out.push('_');
            }
            out.push_str("and");
            pending_sep = true;
            continue;
        }
        if c.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            out.extend(c.to_lowercase());
            pending_sep = false;
        } else {
            pending_sep = true;
        }
    }

    out
}
