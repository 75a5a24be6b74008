//! Keyword Catalog
//!
//! Maps each tracked project to the literal aliases that identify it and an
//! optional permissive pattern used when no alias appears verbatim.
//!
//! Aliases double as search phrases: every alias is sent to each paper source
//! as its own query.

use regex::{Regex, RegexBuilder};
use std::collections::HashSet;

use crate::types::{AppError, AppResult};

/// One tracked project with its compiled matchers.
#[derive(Debug, Clone)]
pub struct Project {
    name: String,
    aliases: Vec<String>,
    partial_pattern: Option<String>,
    alias_matchers: Vec<Regex>,
    partial_matcher: Option<Regex>,
}

impl Project {
    /// Build a project entry. Aliases are matched as escaped literals; the
    /// partial pattern is a regular expression. Both are case-insensitive.
    pub fn new<S: AsRef<str>>(
        name: &str,
        aliases: &[S],
        partial_pattern: Option<&str>,
    ) -> AppResult<Self> {
        let aliases: Vec<String> = aliases.iter().map(|a| a.as_ref().to_string()).collect();
        if aliases.iter().any(|a| a.is_empty()) {
            return Err(AppError::Catalog(format!("{name}: empty alias")));
        }

        let alias_matchers = aliases
            .iter()
            .map(|alias| case_insensitive(&regex::escape(alias), name))
            .collect::<AppResult<Vec<_>>>()?;

        let partial_matcher = partial_pattern
            .map(|pattern| case_insensitive(pattern, name))
            .transpose()?;

        Ok(Self {
            name: name.to_string(),
            aliases,
            partial_pattern: partial_pattern.map(String::from),
            alias_matchers,
            partial_matcher,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn partial_pattern(&self) -> Option<&str> {
        self.partial_pattern.as_deref()
    }

    pub(crate) fn alias_matchers(&self) -> &[Regex] {
        &self.alias_matchers
    }

    pub(crate) fn partial_matcher(&self) -> Option<&Regex> {
        self.partial_matcher.as_ref()
    }
}

fn case_insensitive(pattern: &str, project: &str) -> AppResult<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| AppError::Catalog(format!("{project}: {e}")))
}

/// Read-only collection of projects, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Catalog {
    projects: Vec<Project>,
}

impl Catalog {
    pub fn new(projects: Vec<Project>) -> AppResult<Self> {
        let mut names = HashSet::new();
        for project in &projects {
            if !names.insert(project.name()) {
                return Err(AppError::Catalog(format!(
                    "duplicate project name: {}",
                    project.name()
                )));
            }
        }
        Ok(Self { projects })
    }

    /// The Farama Foundation project catalog.
    pub fn reference() -> AppResult<Self> {
        let projects = REFERENCE_PROJECTS
            .iter()
            .map(|(name, aliases, pattern)| Project::new(name, *aliases, *pattern))
            .collect::<AppResult<Vec<_>>>()?;
        Self::new(projects)
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn get(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.name() == name)
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Total number of search phrases a full sweep issues per source.
    pub fn phrase_count(&self) -> usize {
        self.projects.iter().map(|p| p.aliases().len()).sum()
    }
}

type CatalogEntry = (&'static str, &'static [&'static str], Option<&'static str>);

const REFERENCE_PROJECTS: &[CatalogEntry] = &[
    ("PettingZoo", &["PettingZoo", "terry2021pettingzoo"], Some(r"pettingzoo[-_.a-z0-9]*")),
    ("Gymnasium", &["Gymnasium", "Farama Gymnasium", "towers2024gymnasium"], Some(r"gymnasium[-_.a-z0-9]*")),
    ("SuperSuit", &["SuperSuit", "SuperSuit wrapper"], Some(r"supersuit[-_.a-z0-9]*")),
    ("MiniGrid", &["MiniGrid", "minigrid environment", "MinigridMiniworld23"], Some(r"minigrid[-_.a-z0-9]*")),
    ("Minari", &["Minari", "minari2024"], Some(r"minari[-_.a-z0-9]*")),
    (
        "MetaWorld+",
        &["Meta-World+", "MetaWorld", "mclean2025metaworldimprovedstandardizedrl"],
        Some(r"metaworld[-_.a-z0-9]*"),
    ),
    ("Shimmy", &["Shimmy"], Some(r"shimmy[-_.a-z0-9]*")),
    ("Gymnasium Robotics", &["Gymnasium Robotics"], Some(r"gymnasium[-_.a-z0-9]*robotics")),
    ("MAgent", &["MAgent", "magent2020", "zheng2018magent"], Some(r"magent[-_.a-z0-9]*")),
    ("MOMAland", &["MOMAland", "felten2024momaland"], None),
    ("ViZDoom", &["ViZDoom", "Wydmuch2019ViZdoom", "Kempka2016ViZDoom"], Some(r"vizdoom[-_.a-z0-9]*")),
    (
        "ALE",
        &["Arcade Learning Environment", "ALE", "bellemare13arcade", "machado18arcade", "farebrother2024cale"],
        Some(r"ale[-_.a-z0-9]*"),
    ),
    ("ChatArena", &["ChatArena"], Some(r"chatarena[-_.a-z0-9]*")),
    ("CrowdPlay", &["CrowdPlay", "gerstgrasser2022crowdplay"], None),
    ("Highway-env", &["Highway-env"], None),
    ("Stable-Retro", &["Stable Retro", "stable-retro"], None),
    ("BabyAI", &["BabyAI", "chevalier2018babyai"], None),
    ("Multi-Agent Actor-Critic", &["Multi-Agent Actor-Critic", "lowe2017multi"], None),
    ("Workflow-Guided Exploration", &["Workflow-Guided Exploration", "liu2018reinforcement"], None),
    (
        "Mordatch Language Emergence",
        &["Emergence of Grounded Compositional Language", "mordatch2017emergence"],
        None,
    ),
    ("Procgen2", &["Procgen2"], Some(r"procgen2[-_.a-z0-9]*")),
    ("Jumpy", &["Jumpy"], Some(r"jumpy[-_.a-z0-9]*")),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_catalog_loads() {
        let catalog = Catalog::reference().unwrap();
        assert!(catalog.len() >= 18);

        let ale = catalog.get("ALE").unwrap();
        assert!(ale.aliases().iter().any(|a| a == "bellemare13arcade"));
        assert_eq!(ale.partial_pattern(), Some(r"ale[-_.a-z0-9]*"));

        let momaland = catalog.get("MOMAland").unwrap();
        assert!(momaland.partial_pattern().is_none());
    }

    #[test]
    fn test_phrase_count_sums_aliases() {
        let catalog = Catalog::new(vec![
            Project::new("A", &["a1", "a2"], None).unwrap(),
            Project::new("B", &["b1"], Some("b[0-9]")).unwrap(),
        ])
        .unwrap();
        assert_eq!(catalog.phrase_count(), 3);
    }

    #[test]
    fn test_duplicate_project_names_rejected() {
        let result = Catalog::new(vec![
            Project::new("A", &["a"], None).unwrap(),
            Project::new("A", &["other"], None).unwrap(),
        ]);
        assert!(matches!(result, Err(AppError::Catalog(_))));
    }

    #[test]
    fn test_invalid_partial_pattern_rejected() {
        let result = Project::new("Broken", &["broken"], Some("(unclosed"));
        assert!(matches!(result, Err(AppError::Catalog(_))));
    }

    #[test]
    fn test_empty_alias_rejected() {
        let result = Project::new("Empty", &[""], None);
        assert!(result.is_err());
    }
}
