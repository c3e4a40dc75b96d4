use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Any GitLab page under `/<group>/<project>/-/` that points at a merge request,
/// commit, tree, blob or compare view.
static GIT_LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)https?://[^/\s]+/[^/\s]+/[^/\s]+/-/(?:merge_requests/\d+|commit/[a-f0-9]+|tree/[^/\s]+|blob/[^/\s]+|compare/[^/\s]+)",
    )
    .expect("git link pattern is valid")
});

/// Extracts the distinct git links mentioned in `text`, in order of first mention.
pub fn extract_git_links(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    GIT_LINK_PATTERN
        .find_iter(text)
        .map(|found| found.as_str())
        .filter(|link| seen.insert(*link))
        .map(str::to_string)
        .collect()
}
