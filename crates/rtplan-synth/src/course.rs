//! Automatic course naming.

/// Prefix of courses created by the synthesizer.
pub const AUTO_COURSE_PREFIX: &str = "Auto";

/// Next free automatic course id: one past the highest number among
/// existing ids containing "Auto", or `Auto1` when there are none.
///
/// Leading non-digits are stripped before parsing, so "Auto7" counts as 7.
/// Ids whose remainder is not a number, or whose successor does not fit in
/// a `u64`, are ignored.
pub fn next_course_id<S: AsRef<str>>(existing: &[S]) -> String {
    let next = existing
        .iter()
        .map(AsRef::as_ref)
        .filter(|id| id.contains(AUTO_COURSE_PREFIX))
        .filter_map(|id| {
            let digits = id.trim_start_matches(|c: char| !c.is_ascii_digit());
            let successor = digits.parse::<u64>().ok().and_then(|n| n.checked_add(1));
            if successor.is_none() {
                tracing::warn!(course = id, "ignoring course id without a usable numeric suffix");
            }
            successor
        })
        .max()
        .unwrap_or(1);
    format!("{AUTO_COURSE_PREFIX}{next}")
}
