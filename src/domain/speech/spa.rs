/// Pages shorter than this (after trimming) are not worth narrating
const MIN_PAGE_CHARS: usize = 100;

/// Mount points left by client-side frameworks in otherwise empty shells
const SPA_MARKERS: &[&str] = &[
    r#"id="app""#,
    "ng-app",
    "react-root",
    "data-reactroot",
    r#"id="root""#,
];

/// Guess whether fetched HTML is a client-rendered shell with no readable
/// server-side content. Short legitimate pages are rejected too.
pub fn is_spa(content: &str) -> bool {
    if content.trim().chars().count() < MIN_PAGE_CHARS {
        return true;
    }

    let lowered = content.to_lowercase();
    SPA_MARKERS.iter().any(|marker| lowered.contains(marker))
}
