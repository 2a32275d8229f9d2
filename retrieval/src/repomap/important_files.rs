//! Important-file detection (design docs §4.6 supplement): a small heuristic so that
//! manifests and entry points always make it into the map even when they rank low.
//! Ported near-verbatim from the teacher's `repomap/important_files.rs`.

const ROOT_IMPORTANT_FILES: &[&str] = &[
    // Version control / project meta
    "README", "README.md", "README.rst", "README.txt",
    "CONTRIBUTING", "CONTRIBUTING.md",
    "LICENSE", "LICENSE.md",
    "CHANGELOG", "CHANGELOG.md",
    ".gitignore", ".gitattributes",
    // Build / package manifests
    "Cargo.toml", "Cargo.lock",
    "package.json", "package-lock.json", "yarn.lock", "pnpm-lock.yaml",
    "pyproject.toml", "setup.py", "setup.cfg", "requirements.txt", "Pipfile", "Pipfile.lock",
    "go.mod", "go.sum",
    "pom.xml", "build.gradle", "build.gradle.kts", "settings.gradle",
    "Gemfile", "Gemfile.lock",
    "composer.json", "composer.lock",
    "Makefile", "CMakeLists.txt",
    // Editor / CI config
    ".editorconfig",
    "Dockerfile", "docker-compose.yml", "docker-compose.yaml",
    "tsconfig.json", ".eslintrc", ".eslintrc.json", ".eslintrc.js",
    "rustfmt.toml", "clippy.toml",
];

/// Whether `rel_path` (forward-slash separated, repo-root-relative) is one of the small
/// set of files that should always be considered, regardless of ranking.
pub fn is_important(rel_path: &str) -> bool {
    let file_name = rel_path.rsplit('/').next().unwrap_or(rel_path);

    if ROOT_IMPORTANT_FILES.contains(&file_name) {
        return true;
    }

    // GitHub Actions workflow definitions: any YAML file under .github/workflows/.
    if rel_path.starts_with(".github/workflows/")
        && (rel_path.ends_with(".yml") || rel_path.ends_with(".yaml"))
    {
        return true;
    }

    false
}

/// Partitions `rel_paths` into (important, the rest), preserving input order within
/// each group.
pub fn filter_important_files<'a>(rel_paths: &[&'a str]) -> (Vec<&'a str>, Vec<&'a str>) {
    rel_paths.iter().partition(|p| is_important(p))
}

#[cfg(test)]
#[path = "important_files.test.rs"]
mod tests;
