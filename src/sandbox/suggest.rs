//! "Did you mean" suggestions for missing paths

use std::path::Path;

use tracing::debug;

/// Maximum number of suggestions offered for one missing path
pub const MAX_SUGGESTIONS: usize = 3;

/// Rank sibling names against the missing name: case-insensitive prefix
/// matches first, then substring matches, without duplicates, capped at
/// [`MAX_SUGGESTIONS`]. Input order is preserved within each tier.
pub fn rank_candidates<'a>(target: &str, names: &'a [String]) -> Vec<&'a str> {
    let needle = target.to_lowercase();
    let mut matches: Vec<&str> = Vec::new();

    for name in names {
        if name.to_lowercase().starts_with(&needle) && !matches.contains(&name.as_str()) {
            matches.push(name);
            if matches.len() >= MAX_SUGGESTIONS {
                return matches;
            }
        }
    }

    for name in names {
        if name.to_lowercase().contains(&needle) && !matches.contains(&name.as_str()) {
            matches.push(name);
            if matches.len() >= MAX_SUGGESTIONS {
                return matches;
            }
        }
    }

    matches
}

/// Wrap a name as a hint for the model
pub fn did_you_mean(name: &str) -> String {
    format!("did you mean '{}'?", name)
}

/// Suggest siblings of `missing` from its parent directory.
///
/// `parent` must already be known to be inside the sandbox root; unreadable
/// directories yield no suggestions.
pub fn suggest_siblings(parent: &Path, missing: &str) -> Vec<String> {
    debug!(?parent, %missing, "suggest_siblings: called");
    let entries = match std::fs::read_dir(parent) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(%e, "suggest_siblings: parent not readable");
            return Vec::new();
        }
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();

    rank_candidates(missing, &names).into_iter().map(did_you_mean).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_prefix_matches_rank_before_substring() {
        let list = names(&["my_config.toml", "config.yml", "notes.txt"]);
        let ranked = rank_candidates("conf", &list);
        assert_eq!(ranked, vec!["config.yml", "my_config.toml"]);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let list = names(&["README.md", "src"]);
        assert_eq!(rank_candidates("readme", &list), vec!["README.md"]);
    }

    #[test]
    fn test_ranking_capped_at_three() {
        let list = names(&["main.rs", "main_a.rs", "main_b.rs", "main_c.rs"]);
        assert_eq!(rank_candidates("main", &list).len(), MAX_SUGGESTIONS);
    }

    #[test]
    fn test_no_similarity_yields_nothing() {
        let list = names(&["present.txt"]);
        assert!(rank_candidates("missing.txt", &list).is_empty());
    }

    #[test]
    fn test_suggest_siblings_formats_hints() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("present.txt"), "").unwrap();
        fs::write(temp.path().join("other.md"), "").unwrap();

        let hints = suggest_siblings(temp.path(), "pres");
        assert_eq!(hints, vec!["did you mean 'present.txt'?".to_string()]);
    }

    #[test]
    fn test_suggest_siblings_missing_parent() {
        let temp = tempdir().unwrap();
        assert!(suggest_siblings(&temp.path().join("nope"), "x").is_empty());
    }
}
