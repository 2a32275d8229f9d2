//! The three increasingly tolerant search/replace strategies, plus the shared
//! line-splitting helpers they build on.

use once_line_number_prefix::strip_line_number_prefix;

use crate::error::{EditError, Result};

/// Ensures a block ends in a trailing newline. A blank block is left as-is —
/// blankness is handled by the caller as the "append" case, not normalized here.
pub fn normalize_block(s: &str) -> String {
    if s.is_empty() || s.ends_with('\n') {
        s.to_string()
    } else {
        format!("{s}\n")
    }
}

pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Splits a newline-terminated block into lines without their trailing `\n`.
pub fn to_lines(normalized: &str) -> Vec<String> {
    if normalized.is_empty() {
        return Vec::new();
    }
    let mut lines: Vec<String> = normalized.split('\n').map(|l| l.to_string()).collect();
    if lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

/// Inverse of [`to_lines`]: joins lines back into a newline-terminated block.
pub fn from_lines(lines: &[String]) -> String {
    if lines.is_empty() {
        return String::new();
    }
    format!("{}\n", lines.join("\n"))
}

fn leading_ws_len(line: &str) -> usize {
    line.chars().take_while(|c| *c == ' ' || *c == '\t').count()
}

fn outdent(line: &str, n: usize) -> String {
    let skip = leading_ws_len(line).min(n);
    line.chars().skip(skip).collect()
}

/// Strategy 1: exact substring replace via a sliding window of equal lines.
pub fn perfect_replace(whole_lines: &[String], part_lines: &[String]) -> Option<usize> {
    if part_lines.is_empty() || part_lines.len() > whole_lines.len() {
        return None;
    }
    whole_lines.windows(part_lines.len()).position(|w| w == part_lines)
}

/// For a candidate window, checks whether every line agrees modulo leading whitespace,
/// and whether that whitespace offset is uniform across the window's non-blank lines
/// (the first line's offset is tracked independently — see the asymmetric first-line
/// note in the design docs).
fn match_but_for_leading_whitespace(
    window: &[String],
    part_lines: &[String],
) -> Option<(String, String)> {
    if window.len() != part_lines.len() {
        return None;
    }
    for (w, p) in window.iter().zip(part_lines.iter()) {
        if w.trim_start() != p.trim_start() {
            return None;
        }
    }

    let first_offset = window[0].len().checked_sub(part_lines[0].len())?;
    let first_add = window[0][..first_offset].to_string();

    let mut tail_offset: Option<usize> = None;
    let mut tail_add: Option<String> = None;
    for (w, p) in window.iter().zip(part_lines.iter()).skip(1) {
        if w.trim().is_empty() {
            continue;
        }
        let offset = w.len().checked_sub(p.len())?;
        match tail_offset {
            None => {
                tail_offset = Some(offset);
                tail_add = Some(w[..offset].to_string());
            }
            Some(existing) if existing != offset => return None,
            Some(_) => {}
        }
    }

    let tail_add = tail_add.unwrap_or_else(|| first_add.clone());
    Some((first_add, tail_add))
}

/// Strategy 2: re-indents `search`/`replace` by their common leading whitespace, then
/// slides a window looking for a match modulo that uniform indentation.
pub fn replace_with_leading_whitespace(
    whole_lines: &[String],
    part_lines: &[String],
    replace_lines: &[String],
) -> Option<Vec<String>> {
    if part_lines.is_empty() {
        return None;
    }

    let min_indent = part_lines
        .iter()
        .chain(replace_lines.iter())
        .filter(|l| !l.trim().is_empty())
        .map(|l| leading_ws_len(l))
        .min()
        .unwrap_or(0);

    let part_outdented: Vec<String> = part_lines.iter().map(|l| outdent(l, min_indent)).collect();
    let replace_outdented: Vec<String> =
        replace_lines.iter().map(|l| outdent(l, min_indent)).collect();

    if part_outdented.len() > whole_lines.len() {
        return None;
    }

    for start in 0..=(whole_lines.len() - part_outdented.len()) {
        let window = &whole_lines[start..start + part_outdented.len()];
        if let Some((first_add, tail_add)) = match_but_for_leading_whitespace(window, &part_outdented)
        {
            let mut spliced = Vec::with_capacity(replace_outdented.len());
            for (i, rline) in replace_outdented.iter().enumerate() {
                if i == 0 {
                    spliced.push(format!("{first_add}{rline}"));
                } else if !rline.trim().is_empty() {
                    spliced.push(format!("{tail_add}{rline}"));
                } else {
                    spliced.push(rline.clone());
                }
            }
            let mut out = whole_lines[..start].to_vec();
            out.extend(spliced);
            out.extend(whole_lines[start + part_outdented.len()..].to_vec());
            return Some(out);
        }
    }
    None
}

fn split_on_ellipsis_markers(lines: &[String]) -> Vec<Vec<String>> {
    let mut pieces = vec![Vec::new()];
    for line in lines {
        if line.trim() == "..." {
            pieces.push(Vec::new());
        } else {
            #[allow(clippy::unwrap_used)]
            pieces.last_mut().unwrap().push(line.clone());
        }
    }
    pieces
}

fn piece_text(piece: &[String]) -> String {
    if piece.is_empty() {
        String::new()
    } else {
        format!("{}\n", piece.join("\n"))
    }
}

/// Strategy 3: bridges unchanged regions marked by `...`-only lines. Returns `Ok(None)`
/// when neither block contains an ellipsis marker (the strategy does not apply, rather
/// than failing), and `Err` for any ambiguous marker/match condition.
pub fn replace_with_dotdotdots(whole: &str, search: &str, replace: &str) -> Result<Option<String>> {
    let search_lines = to_lines(search);
    let replace_lines = to_lines(replace);

    let search_pieces = split_on_ellipsis_markers(&search_lines);
    let replace_pieces = split_on_ellipsis_markers(&replace_lines);

    if search_pieces.len() <= 1 && replace_pieces.len() <= 1 {
        return Ok(None);
    }

    if search_pieces.len() != replace_pieces.len() {
        return Err(EditError::AmbiguousEllipsis(format!(
            "search has {} `...`-delimited piece(s), replace has {}",
            search_pieces.len(),
            replace_pieces.len()
        )));
    }

    let mut result = whole.to_string();
    let mut appended = String::new();

    for (s_piece, r_piece) in search_pieces.iter().zip(replace_pieces.iter()) {
        let s_text = piece_text(s_piece);
        let r_text = piece_text(r_piece);

        if s_text.is_empty() && r_text.is_empty() {
            continue;
        }
        if s_text.is_empty() {
            appended.push_str(&r_text);
            continue;
        }

        let count = result.matches(&s_text).count();
        if count != 1 {
            return Err(EditError::AmbiguousEllipsis(format!(
                "expected exactly one match for a `...`-delimited search piece, found {count}"
            )));
        }
        result = result.replacen(&s_text, &r_text, 1);
    }

    result.push_str(&appended);
    Ok(Some(result))
}

/// Runs all three strategies in order. Returns `Ok(None)` if none matched (the caller
/// then falls back to the close-match probe); `Err` only for the ambiguous-ellipsis case.
pub fn replace_part(whole: &str, search: &str, replace: &str) -> Result<Option<String>> {
    let whole = strip_line_number_prefix(&normalize_block(whole));
    let search = strip_line_number_prefix(&normalize_block(search));
    let replace = strip_line_number_prefix(&normalize_block(replace));

    if is_blank(&search) {
        return Ok(Some(format!("{whole}{replace}")));
    }

    let whole_lines = to_lines(&whole);
    let search_lines = to_lines(&search);
    let replace_lines = to_lines(&replace);

    if let Some(idx) = perfect_replace(&whole_lines, &search_lines) {
        let mut out = whole_lines[..idx].to_vec();
        out.extend(replace_lines.clone());
        out.extend(whole_lines[idx + search_lines.len()..].to_vec());
        return Ok(Some(from_lines(&out)));
    }

    if let Some(new_lines) = replace_with_leading_whitespace(&whole_lines, &search_lines, &replace_lines)
    {
        return Ok(Some(from_lines(&new_lines)));
    }

    replace_with_dotdotdots(&whole, &search, &replace)
}

/// The `^\d+\s*│` line-number-prefix stripping helper lives in its own tiny module so
/// the regex is compiled once and the intent reads clearly at the call site above.
mod once_line_number_prefix {
    use once_cell::sync::Lazy;
    use regex::Regex;

    static PREFIX: Lazy<Regex> = Lazy::new(|| {
        #[allow(clippy::unwrap_used)]
        Regex::new(r"(?m)^\d+\s*│").unwrap()
    });

    pub fn strip_line_number_prefix(text: &str) -> String {
        PREFIX.replace_all(text, "").into_owned()
    }
}

#[path = "strategies.test.rs"]
#[cfg(test)]
mod tests;
