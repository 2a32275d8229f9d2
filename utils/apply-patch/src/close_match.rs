//! Close-match probe run when all three search/replace strategies fail.
//!
//! There is no reference implementation to port this from — it is built from the
//! design doc's description alone (sliding window + sequence-similarity ratio, 0.6
//! threshold, extend by up to 5 lines of context).

const SIMILARITY_THRESHOLD: f32 = 0.6;
const CONTEXT_LINES: usize = 5;

/// Returns the best-matching window of `whole_lines` for `search_lines`, extended by
/// up to [`CONTEXT_LINES`] on each side, or `None` if no window clears the similarity
/// threshold.
pub fn find_close_match(whole_lines: &[String], search_lines: &[String]) -> Option<String> {
    if whole_lines.is_empty() || search_lines.is_empty() {
        return None;
    }

    let window_len = search_lines.len().min(whole_lines.len());
    let max_start = whole_lines.len() - window_len;

    let mut best_ratio = 0.0f32;
    let mut best_start = 0usize;
    let mut best_end = window_len;

    for start in 0..=max_start {
        let end = start + window_len;
        let window = &whole_lines[start..end];
        let diff = similar::TextDiff::from_slices(window, search_lines);
        let ratio = diff.ratio();
        if ratio > best_ratio {
            best_ratio = ratio;
            best_start = start;
            best_end = end;
        }
    }

    if best_ratio < SIMILARITY_THRESHOLD {
        return None;
    }

    let ext_start = best_start.saturating_sub(CONTEXT_LINES);
    let ext_end = (best_end + CONTEXT_LINES).min(whole_lines.len());
    Some(whole_lines[ext_start..ext_end].join("\n"))
}

#[path = "close_match.test.rs"]
#[cfg(test)]
mod tests;
