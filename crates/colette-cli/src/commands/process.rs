//! Traversal commands: check, collate and list

use std::path::Path;

use colored::Colorize;

use colette_core::{Mode, Padding, ProjectConfig, Title, traverse_and_process};
use colette_fs::{Extensions, Settings};

use super::project_root;
use crate::error::Result;

/// Values given on the command line, applied over the settings file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub title: Option<Title>,
    pub padding: Option<Padding>,
    pub extensions: Vec<String>,
    pub max_depth: Option<usize>,
}

impl Overrides {
    fn apply(self, config: ProjectConfig) -> Result<ProjectConfig> {
        let mut config = config;
        if let Some(title) = self.title {
            config = config.with_title(title);
        }
        if let Some(padding) = self.padding {
            config = config.with_padding(padding);
        }
        if !self.extensions.is_empty() {
            config = config.with_extensions(Extensions::new(self.extensions)?);
        }
        if let Some(max_depth) = self.max_depth {
            config = config.with_max_depth(max_depth)?;
        }
        Ok(config)
    }
}

/// Build the run configuration for `dir`.
pub fn build_config(dir: &Path, mode: Mode, overrides: Overrides) -> Result<ProjectConfig> {
    let root = project_root(dir)?;
    let settings = Settings::load(&root)?;
    let config = ProjectConfig::from_settings(root, mode, &settings)?;
    overrides.apply(config)
}

/// Run a check, collate or list pass over the project in `dir`.
pub fn run_process(dir: &Path, mode: Mode, overrides: Overrides) -> Result<()> {
    let config = build_config(dir, mode, overrides)?;
    tracing::debug!(?config, "Configuration resolved");

    let summary = traverse_and_process(&config)?;

    match (summary.mode, &summary.output) {
        (Mode::Check, _) => println!(
            "{} {} files checked, project structure is valid",
            "OK".green().bold(),
            summary.files
        ),
        (Mode::Collate, Some(output)) => println!(
            "{} Collated {} files into {}",
            "OK".green().bold(),
            summary.files,
            output
        ),
        (Mode::List, Some(output)) => println!(
            "{} Listed {} files in {}",
            "OK".green().bold(),
            summary.files,
            output
        ),
        (_, None) => println!("{} Processed {} files", "OK".green().bold(), summary.files),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use colette_test_utils::TestProject;

    #[test]
    fn flags_override_settings_file() {
        let project = TestProject::new();
        project.file(
            ".colette.toml",
            "title = \"Book\"\npadding = 2\nmax_depth = 4\n",
        );

        let overrides = Overrides {
            padding: Some(Padding::new(6).unwrap()),
            extensions: vec![".txt".to_string()],
            ..Overrides::default()
        };
        let config = build_config(&project.root(), Mode::List, overrides).unwrap();

        assert_eq!(config.title.stem(), "_Book_");
        assert_eq!(config.padding.width(), 6);
        assert_eq!(config.max_depth, 4);
        assert_eq!(config.extensions.iter().collect::<Vec<_>>(), vec![".txt"]);
    }

    #[test]
    fn invalid_override_is_an_error() {
        let project = TestProject::new();
        let overrides = Overrides {
            max_depth: Some(0),
            ..Overrides::default()
        };
        assert!(build_config(&project.root(), Mode::Check, overrides).is_err());
    }
}
