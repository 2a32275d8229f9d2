//! Tree-context rendering primitive (design docs §4.4 supplement): expands a set of
//! "lines of interest" to include their enclosing syntactic scopes. Ported from the
//! enrichment pack's `repomap/tree_context.rs`.

use std::collections::HashSet;

use tree_sitter::Tree;

/// Header candidates get capped so a single huge enclosing scope (a whole `impl`
/// block, a giant match) doesn't pull in hundreds of lines as "the header".
const HEADER_MAX: usize = 10;

pub struct TreeContext {
    lines: Vec<String>,
    num_lines: usize,
    lois: HashSet<usize>,
    show_lines: HashSet<usize>,
    /// For each line, the set of scope-start lines whose scope contains it.
    scopes: Vec<HashSet<usize>>,
    /// For each scope-start line, the chosen `(start, end)` header span.
    header: Vec<(usize, usize)>,
    done_parent_scopes: HashSet<usize>,
    line_number: bool,
}

impl TreeContext {
    pub fn new(code: &str, line_number: bool) -> Self {
        let lines: Vec<String> = code.split('\n').map(str::to_string).collect();
        let num_lines = lines.len() + 1;
        Self {
            lines,
            num_lines,
            lois: HashSet::new(),
            show_lines: HashSet::new(),
            scopes: vec![HashSet::new(); num_lines],
            header: (0..num_lines).map(|i| (i, i + 1)).collect(),
            done_parent_scopes: HashSet::new(),
            line_number,
        }
    }

    /// Walks `tree`, recording which scope each line belongs to and picking a header
    /// span (the smallest enclosing non-trivial range) for each scope-start line.
    pub fn walk_tree(&mut self, tree: &Tree) {
        let mut header_candidates: Vec<Vec<(usize, usize, usize)>> = vec![Vec::new(); self.num_lines];
        let mut cursor = tree.walk();

        loop {
            let node = cursor.node();
            let start_line = node.start_position().row;
            let end_line = node.end_position().row;

            if start_line < self.num_lines {
                let size = end_line.saturating_sub(start_line);
                if size > 0 {
                    header_candidates[start_line].push((size, start_line, end_line));
                }
                let last = end_line.min(self.num_lines.saturating_sub(1));
                for i in start_line..=last {
                    self.scopes[i].insert(start_line);
                }
            }

            if cursor.goto_first_child() {
                continue;
            }
            if cursor.goto_next_sibling() {
                continue;
            }
            loop {
                if !cursor.goto_parent() {
                    self.arrange_headers(header_candidates);
                    return;
                }
                if cursor.goto_next_sibling() {
                    break;
                }
            }
        }
    }

    fn arrange_headers(&mut self, mut header_candidates: Vec<Vec<(usize, usize, usize)>>) {
        for line in 0..self.num_lines {
            header_candidates[line].sort_unstable();
            self.header[line] = match header_candidates[line].first() {
                Some(&(size, start, end)) if size > HEADER_MAX => (start, start + HEADER_MAX),
                Some(&(_, start, end)) => (start, end),
                None => (line, line + 1),
            };
        }
    }

    pub fn add_lois(&mut self, lois: impl IntoIterator<Item = usize>) {
        self.lois.extend(lois);
    }

    pub fn add_context(&mut self) {
        if self.lois.is_empty() {
            return;
        }
        self.show_lines = self.lois.clone();
        for index in self.lois.clone() {
            self.add_parent_scopes(index);
        }
        self.close_small_gaps();
    }

    fn add_parent_scopes(&mut self, index: usize) {
        if self.done_parent_scopes.contains(&index) {
            return;
        }
        self.done_parent_scopes.insert(index);

        let Some(scope_starts) = self.scopes.get(index).cloned() else {
            return;
        };
        for line_num in scope_starts {
            let (head_start, head_end) = self.header[line_num];
            if head_start > 0 {
                self.show_lines.extend(head_start..head_end);
            }
        }
    }

    /// Pulls in single-line gaps between shown lines, and a blank line immediately
    /// following a shown non-blank line (design docs §4.4).
    fn close_small_gaps(&mut self) {
        let mut closed = self.show_lines.clone();
        let mut sorted: Vec<usize> = self.show_lines.iter().copied().collect();
        sorted.sort_unstable();

        for pair in sorted.windows(2) {
            if pair[1] == pair[0] + 2 {
                closed.insert(pair[0] + 1);
            }
        }

        for &i in &sorted {
            let Some(line) = self.lines.get(i) else { continue };
            if line.trim().is_empty() {
                continue;
            }
            if let Some(next) = self.lines.get(i + 1) {
                if next.trim().is_empty() {
                    closed.insert(i + 1);
                }
            }
        }

        self.show_lines = closed;
    }

    /// Renders the shown lines, with `⋮` markers over skipped ranges.
    pub fn format(&self) -> String {
        if self.show_lines.is_empty() {
            return String::new();
        }
        let mut output = String::new();
        let mut dots = !self.show_lines.contains(&0);
        for (i, line) in self.lines.iter().enumerate() {
            if !self.show_lines.contains(&i) {
                if dots {
                    output.push_str("⋮\n");
                    dots = false;
                }
                continue;
            }
            if self.line_number {
                output.push_str(&format!("{:>3}│{}\n", i + 1, line));
            } else {
                output.push_str(line);
                output.push('\n');
            }
            dots = true;
        }
        output
    }
}

#[cfg(test)]
#[path = "tree_context.test.rs"]
mod tests;
