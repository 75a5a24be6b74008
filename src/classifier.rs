//! Classifier
//!
//! Decides which catalog projects a document's text refers to. Each project is
//! evaluated on its own, so a text can match any number of projects:
//!
//! 1. Literal pass: any alias found as a case-insensitive substring is a match.
//! 2. Partial pass: only when no alias was found, the project's partial
//!    pattern (if it has one) is tried case-insensitively.
//!
//! Matching is a pure function of the text and the projects supplied.

use std::collections::BTreeSet;

use crate::catalog::Project;

/// How a project was recognised in a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Alias,
    Partial,
}

/// Test a single project against `text`.
pub fn match_project(text: &str, project: &Project) -> Option<MatchKind> {
    if text.is_empty() {
        return None;
    }

    if project.alias_matchers().iter().any(|re| re.is_match(text)) {
        return Some(MatchKind::Alias);
    }

    match project.partial_matcher() {
        Some(re) if re.is_match(text) => Some(MatchKind::Partial),
        _ => None,
    }
}

/// Return the names of every project in `projects` that `text` matches.
pub fn classify<'a, I>(text: &str, projects: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a Project>,
{
    projects
        .into_iter()
        .filter(|project| match_project(text, project).is_some())
        .map(|project| project.name().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn project(name: &str, aliases: &[&str], pattern: Option<&str>) -> Project {
        Project::new(name, aliases, pattern).unwrap()
    }

    #[test]
    fn test_alias_match_is_case_insensitive() {
        let gym = project("Gymnasium", &["Gymnasium"], None);
        assert_eq!(
            match_project("Benchmarks built on GYMNASIUM", &gym),
            Some(MatchKind::Alias)
        );
    }

    #[test]
    fn test_alias_metacharacters_are_literal() {
        let mw = project("MetaWorld+", &["Meta-World+"], None);
        assert_eq!(
            match_project("We evaluate on Meta-World+ tasks", &mw),
            Some(MatchKind::Alias)
        );
        // Interpreted as a regex, "Meta-World+" would also match "Meta-Worldd".
        assert_eq!(match_project("Meta-Worldd", &mw), None);
    }

    #[test]
    fn test_partial_pattern_used_when_no_alias_found() {
        let foo = project("Foo", &["Foo"], Some("f[0-9]{2}bar"));
        assert_eq!(match_project("the F00bar suite", &foo), Some(MatchKind::Partial));
    }

    #[test]
    fn test_alias_hit_short_circuits_partial_pass() {
        let foo = project("Foo", &["Foo"], Some("f[0-9]{2}bar"));
        assert_eq!(match_project("Foo and F00bar", &foo), Some(MatchKind::Alias));
    }

    #[test]
    fn test_project_without_pattern_only_uses_aliases() {
        let baby = project("BabyAI", &["BabyAI"], None);
        assert_eq!(match_project("babyai-levels", &baby), Some(MatchKind::Alias));
        assert_eq!(match_project("baby ai", &baby), None);
    }

    #[test]
    fn test_empty_text_matches_nothing() {
        let catalog = Catalog::reference().unwrap();
        assert!(classify("", catalog.projects()).is_empty());
    }

    #[test]
    fn test_overlapping_projects_both_fire() {
        let catalog = Catalog::reference().unwrap();
        let matched = classify("Tasks from gymnasium-robotics", catalog.projects());
        assert!(matched.contains("Gymnasium"));
        assert!(matched.contains("Gymnasium Robotics"));
    }

    #[test]
    fn test_citation_key_alias() {
        let catalog = Catalog::reference().unwrap();
        let matched = classify("as in [bellemare13arcade]", catalog.projects());
        assert!(matched.contains("ALE"));
    }

    #[test]
    fn test_classify_ignores_project_order() {
        let catalog = Catalog::reference().unwrap();
        let text = "PettingZoo and MAgent environments wrapped with SuperSuit";

        let forward = classify(text, catalog.projects());
        let reversed = classify(text, catalog.projects().iter().rev());

        assert_eq!(forward, reversed);
        assert!(forward.contains("PettingZoo"));
        assert!(forward.contains("MAgent"));
        assert!(forward.contains("SuperSuit"));
    }

    #[test]
    fn test_classify_against_single_project_subset() {
        let catalog = Catalog::reference().unwrap();
        let shimmy = catalog.get("Shimmy").unwrap();
        let matched = classify("Shimmy bridges PettingZoo", [shimmy]);
        assert_eq!(matched.into_iter().collect::<Vec<_>>(), vec!["Shimmy".to_string()]);
    }
}
