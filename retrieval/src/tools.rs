//! Tool facade (design docs §6, C10): the small set of operations exposed to an agent
//! driving the repo map and edit engine. Ported from `motleycoder/tools/*.py`, stripped
//! of the LangChain/agent-framework plumbing those files wrap around this same core
//! logic — callers here are expected to be the agent loop itself, not a tool registry.

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::repomap::{RenderEntry, Renderer, RepoMap};

const INSPECT_MAX_LINES_LONG: usize = 200;
const INSPECT_MAX_LINES_SHORT: usize = 25;
const INSPECT_BLOCK_IDENTICAL_CALLS: usize = 2;
const RETURN_MAX_ITERATIONS: usize = 3;

/// Strips a trailing `()` some callers add out of habit, e.g. `"helper()"` -> `"helper"`.
fn normalize_entity_name(name: &str) -> String {
    name.replace("()", "")
}

pub struct Tools {
    repo_map: RepoMap,
    requested_full_text: HashSet<(String, Option<String>)>,
    requested_entities: VecDeque<(Option<String>, Option<String>)>,
    show_other_files: bool,
    return_iteration: usize,
}

impl Tools {
    pub fn new(repo_map: RepoMap) -> Self {
        Self {
            repo_map,
            requested_full_text: HashSet::new(),
            requested_entities: VecDeque::new(),
            show_other_files: false,
            return_iteration: 0,
        }
    }

    pub fn repo_map(&self) -> &RepoMap {
        &self.repo_map
    }

    pub fn repo_map_mut(&mut self) -> &mut RepoMap {
        &mut self.repo_map
    }

    /// Adds files to the modifiable set, skipping ones that can't be read (design docs
    /// §6: `add_files`).
    pub fn add_files(&mut self, files: &[String]) -> String {
        let mut added = Vec::new();
        for file in files {
            let abs = self.repo_map.file_group().abs_root_path(file);
            if std::fs::read_to_string(&abs).is_err() {
                tracing::error!(file = %file, "error reading file, skipping it");
                continue;
            }
            self.repo_map.file_group_mut().files_for_modification.insert(abs);
            added.push(file.clone());
        }

        if added.is_empty() {
            "No files were added to the list of modifiable files.".to_string()
        } else {
            format!(
                "Added the following files to the list of modifiable files: {}, \
                 please use the `inspect_entity` tool to inspect them.",
                added.join(", ")
            )
        }
    }

    /// Applies a structural edit, creating the file (and any missing parent
    /// directories) when it doesn't exist yet and `search` is blank (design docs §6/§7:
    /// `edit_file`).
    pub fn edit_file(&mut self, file_path: &str, search: &str, replace: &str) -> Result<String> {
        let abs = self.repo_map.file_group().abs_root_path(file_path);
        self.repo_map.file_group_mut().files_for_modification.insert(abs.clone());

        let mut search = search.to_string();
        if !search.ends_with('\n') {
            search.push('\n');
        }
        let mut replace = replace.to_string();
        if !replace.ends_with('\n') {
            replace.push('\n');
        }

        tracing::info!(file = %file_path, "applying structural edit");
        let (applied, close_match) = codemap_apply_patch::edit_file(&abs, &search, &replace)?;

        if !applied {
            let mut message = format!(
                "## SearchReplaceNoExactMatch: This SEARCH argument failed to exactly match \
                 lines in {file_path}"
            );
            if !close_match.is_empty() {
                message.push_str(&format!(
                    "\nDid you mean to match some of these actual lines from {file_path}?\n\
                     ```\n{close_match}\n```"
                ));
            }
            return Ok(message);
        }

        self.repo_map.invalidate_graph_cache(&abs);
        Ok(format!("Successfully edited file {file_path}."))
    }

    /// Returns the relative paths of every file currently open for modification
    /// (design docs §6: `get_modifiable_files`).
    pub fn get_modifiable_files(&self) -> Vec<String> {
        let mut files: Vec<String> = self
            .repo_map
            .file_group()
            .files_for_modification
            .iter()
            .map(|abs| self.repo_map.file_group().rel_fname(abs))
            .collect();
        files.sort();
        files
    }

    /// Returns the raw text of a single named entity, or the full list of matches to
    /// disambiguate against (design docs §6: `get_full_text`).
    pub fn get_full_text(
        &mut self,
        entity_name: Option<&str>,
        file_name: Option<&str>,
        first_line: Option<i64>,
    ) -> Result<String> {
        let Some(entity_name) = entity_name else {
            return Ok("Please make sure to supply an entity name as an input to this tool"
                .to_string());
        };
        let entity_name = normalize_entity_name(entity_name);
        let key = (entity_name.clone(), file_name.map(str::to_string));
        if self.requested_full_text.contains(&key) {
            return Ok("You've already requested that one!".to_string());
        }
        self.requested_full_text.insert(key);

        let graph = self.repo_map.get_tag_graph_for_repo(false)?;
        let tags = graph.get_tags_from_entity_name(Some(&entity_name), file_name);

        if tags.is_empty() {
            return Ok(format!("Definition of entity {entity_name} not found in the repo"));
        }
        if tags.len() == 1 {
            return Ok(Renderer::text_with_line_numbers(tags[0]));
        }
        if let Some(first_line) = first_line {
            if let Some(closest) = tags.iter().min_by_key(|t| (t.line - first_line).abs()) {
                return Ok(Renderer::text_with_line_numbers(closest));
            }
        }

        let entries: Vec<RenderEntry> = tags.into_iter().cloned().map(RenderEntry::Tag).collect();
        let listing = self.repo_map.renderer_mut().to_tree(&entries, true, &Default::default());
        Ok(format!(
            "Your query matches more than one entity, see the summary of the matches below.\n\
             Please refine your query to match only one entity.\n{listing}"
        ))
    }

    /// Returns the code of an entity plus a summary of what it references (design docs
    /// §6: `inspect_entity`), falling back progressively when the exact name doesn't
    /// resolve or resolves to too many matches.
    pub fn inspect_entity(
        &mut self,
        entity_name: Option<&str>,
        file_name: Option<&str>,
    ) -> Result<String> {
        if entity_name.is_none() && file_name.is_none() {
            return Ok("Please supply either the file name or the entity name".to_string());
        }
        let entity_name = entity_name.map(normalize_entity_name);
        let key = (entity_name.clone(), file_name.map(str::to_string));
        if self.requested_entities.contains(&key) {
            return Ok("You've already requested this entity recently. You MUST use existing \
                 information or request a different entity."
                .to_string());
        }
        if self.requested_entities.len() == INSPECT_BLOCK_IDENTICAL_CALLS {
            self.requested_entities.pop_front();
        }
        self.requested_entities.push_back(key);

        let graph = self.repo_map.get_tag_graph_for_repo(true)?;

        let mut out = String::new();
        let mut tags =
            graph.get_tags_from_entity_name(entity_name.as_deref(), file_name);

        if tags.is_empty() {
            if let Some(name) = &entity_name {
                if let Some((_, short)) = name.rsplit_once('.') {
                    out.push_str(&format!("Entity {name} not found, searching for {short}...\n"));
                    tags = graph.get_tags_from_entity_name(Some(short), file_name);
                }
            }
        }

        if tags.is_empty() {
            return Ok(match entity_name {
                Some(name) => format!(
                    "{out}Definition of entity {name} not found in the repo. You can specify \
                     the entity name more broadly or omit it for reading the whole file."
                ),
                None => format!("File {} not found in the repo", file_name.unwrap_or_default()),
            });
        }

        if tags.len() == 1 {
            let repr = self
                .repo_map
                .renderer_mut()
                .get_tag_representation(&graph, tags[0], true, INSPECT_MAX_LINES_LONG, true)
                .unwrap_or_default();
            out.push_str(&repr);
        } else {
            let mut per_tag_reprs = Vec::new();
            for tag in &tags {
                if let Some(repr) = self.repo_map.renderer_mut().get_tag_representation(
                    &graph,
                    tag,
                    false,
                    INSPECT_MAX_LINES_SHORT,
                    false,
                ) {
                    per_tag_reprs.push(repr);
                }
            }
            let joined = per_tag_reprs.join("\n");

            if joined.lines().count() < INSPECT_MAX_LINES_LONG {
                out.push_str(&joined);
            } else {
                let entries: Vec<RenderEntry> =
                    tags.iter().map(|t| RenderEntry::Tag((*t).clone())).collect();
                let tree = self.repo_map.renderer_mut().to_tree(&entries, true, &Default::default());
                if tree.lines().count() < INSPECT_MAX_LINES_LONG {
                    out.push_str(&tree);
                } else {
                    let mut fnames: Vec<&str> =
                        tags.iter().map(|t| t.rel_fname.as_str()).collect();
                    fnames.sort_unstable();
                    fnames.dedup();
                    out.push_str(
                        "There are too many matches for the given query in the repo. \
                         Here are the files that match the query:\n",
                    );
                    out.push_str(&fnames.join("\n"));
                }
            }
        }

        if self.show_other_files {
            let mentioned: HashSet<PathBuf> = tags.iter().map(|t| t.fname.clone()).collect();
            let mut candidate_dirs: Vec<PathBuf> =
                tags.iter().filter_map(|t| t.fname.parent().map(Path::to_path_buf)).collect();
            candidate_dirs.sort();
            candidate_dirs.dedup();

            let all_files = self.repo_map.file_group().get_all_filenames(false)?;
            let mut other_files: Vec<String> = Vec::new();
            for dir in &candidate_dirs {
                for rel in
                    self.repo_map.file_group().get_rel_fnames_in_directory(dir, &all_files, None)
                {
                    let abs = self.repo_map.file_group().abs_root_path(&rel);
                    if !mentioned.contains(&abs) {
                        other_files.push(rel);
                    }
                }
            }
            other_files.sort();
            other_files.dedup();
            if !other_files.is_empty() {
                out.push_str("\nOther files in same directory(s):\n");
                out.push_str(&other_files.join("\n"));
            }
        }

        Ok(out)
    }

    /// The terminal tool: hands control back to the user once a `tests_runner` check
    /// passes, or after `RETURN_MAX_ITERATIONS` failed attempts (design docs §6,
    /// ported from `return_to_user_tool.py`).
    pub fn return_to_user(&mut self, tests_runner: impl FnOnce() -> Option<String>) -> String {
        self.return_iteration += 1;
        match tests_runner() {
            None => {
                self.return_iteration = 0;
                "Tests passed!".to_string()
            }
            Some(failure) if self.return_iteration >= RETURN_MAX_ITERATIONS => {
                self.return_iteration = 0;
                format!("Maximum output handler iterations exceeded. Last test attempt failed:\n{failure}")
            }
            Some(failure) => format!("Last test attempt failed:\n{failure}"),
        }
    }
}

#[cfg(test)]
#[path = "tools.test.rs"]
mod tests;
