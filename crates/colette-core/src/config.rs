//! Run configuration
//!
//! [`ProjectConfig`] is the validated input of a run. It is assembled from
//! built-in defaults, the optional `.colette.toml` settings file and
//! whatever the caller overrides, and is read-only once built.

use colette_fs::constants::MAX_NAME_LEN;
use colette_fs::{EntryResolver, Extensions, ProjectPath, Settings};

use crate::{Error, Result};

/// Title used when none is configured.
pub const DEFAULT_TITLE: &str = "draft";

/// Extension of the collated document.
pub const COLLATE_EXTENSION: &str = ".md";

/// List position width used when none is configured.
pub const DEFAULT_PADDING: u32 = 3;
pub const MIN_PADDING: u32 = 1;
pub const MAX_PADDING: u32 = 10;

/// Manifest nesting depth used when none is configured.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Hard ceiling on the configurable nesting depth.
pub const DEPTH_CEILING: usize = 256;

/// What a traversal run does with each file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Verify every file can be opened
    Check,
    /// Concatenate every file into one document
    Collate,
    /// Materialise the order as numbered links
    List,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Check => "check",
            Self::Collate => "collate",
            Self::List => "list",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Document title, validated so the generated output names are usable.
///
/// Outputs are named `_<title>_` with whitespace replaced by `_`, which
/// keeps them out of manifests and scans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title {
    title: String,
    stem: String,
}

impl Title {
    pub fn new(title: impl Into<String>) -> Result<Self> {
        let title = title.into();
        let invalid = |reason| Error::InvalidTitle {
            title: title.clone(),
            reason,
        };

        if title.is_empty() {
            return Err(invalid("title is empty"));
        }
        if title.chars().any(|c| c == '/' || c == '\\' || c.is_control()) {
            return Err(invalid("title contains a path separator or control character"));
        }

        let stem: String = std::iter::once('_')
            .chain(title.chars().map(|c| if c.is_whitespace() { '_' } else { c }))
            .chain(std::iter::once('_'))
            .collect();
        if stem.len() + COLLATE_EXTENSION.len() > MAX_NAME_LEN {
            return Err(invalid("title is too long"));
        }

        Ok(Self { title, stem })
    }

    pub fn as_str(&self) -> &str {
        &self.title
    }

    /// The output name without extension, e.g. `_draft_`.
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// File name of the collated document, e.g. `_draft_.md`.
    pub fn collate_file_name(&self) -> String {
        format!("{}{}", self.stem, COLLATE_EXTENSION)
    }
}

impl Default for Title {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            stem: format!("_{}_", DEFAULT_TITLE),
        }
    }
}

impl std::str::FromStr for Title {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl std::fmt::Display for Title {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.title)
    }
}

/// Zero-padding width of list positions, 1 to 10 digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Padding(u32);

impl Padding {
    pub fn new(width: u32) -> Result<Self> {
        if !(MIN_PADDING..=MAX_PADDING).contains(&width) {
            return Err(Error::InvalidPadding {
                value: width.to_string(),
                min: MIN_PADDING,
                max: MAX_PADDING,
            });
        }
        Ok(Self(width))
    }

    pub fn width(&self) -> u32 {
        self.0
    }

    /// Largest position that fits in the width.
    pub fn max_position(&self) -> u64 {
        10u64.pow(self.0) - 1
    }

    /// Render a position, e.g. `007` for 7 at width 3.
    pub fn format(&self, position: u64) -> String {
        format!("{:0width$}", position, width = self.0 as usize)
    }
}

impl Default for Padding {
    fn default() -> Self {
        Self(DEFAULT_PADDING)
    }
}

impl std::str::FromStr for Padding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let width = s.trim().parse::<u32>().map_err(|_| Error::InvalidPadding {
            value: s.to_string(),
            min: MIN_PADDING,
            max: MAX_PADDING,
        })?;
        Self::new(width)
    }
}

/// Validated configuration of one traversal run.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub root: ProjectPath,
    pub mode: Mode,
    pub title: Title,
    pub padding: Padding,
    pub extensions: Extensions,
    pub max_depth: usize,
}

impl ProjectConfig {
    /// Configuration with built-in defaults.
    pub fn new(root: ProjectPath, mode: Mode) -> Self {
        Self {
            root,
            mode,
            title: Title::default(),
            padding: Padding::default(),
            extensions: Extensions::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Configuration with the values of a settings file applied over the
    /// defaults.
    pub fn from_settings(root: ProjectPath, mode: Mode, settings: &Settings) -> Result<Self> {
        let mut config = Self::new(root, mode);
        if let Some(title) = &settings.title {
            config.title = Title::new(title.as_str())?;
        }
        if let Some(padding) = settings.padding {
            config.padding = Padding::new(padding)?;
        }
        if let Some(extensions) = &settings.extensions {
            config.extensions = Extensions::new(extensions.iter().cloned())?;
        }
        if let Some(max_depth) = settings.max_depth {
            config = config.with_max_depth(max_depth)?;
        }
        Ok(config)
    }

    pub fn with_title(mut self, title: Title) -> Self {
        self.title = title;
        self
    }

    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_extensions(mut self, extensions: Extensions) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Result<Self> {
        if max_depth == 0 || max_depth > DEPTH_CEILING {
            return Err(Error::InvalidDepth {
                value: max_depth,
                max: DEPTH_CEILING,
            });
        }
        self.max_depth = max_depth;
        Ok(self)
    }

    /// Resolver probing the configured extensions.
    pub fn resolver(&self) -> EntryResolver {
        EntryResolver::new(self.extensions.clone())
    }

    /// Where collate mode writes, `<root>/_<title>_.md`.
    pub fn collate_path(&self) -> Result<ProjectPath> {
        Ok(self.root.join(&self.title.collate_file_name())?)
    }

    /// Where list mode writes, `<root>/_<title>_/`.
    pub fn list_path(&self) -> Result<ProjectPath> {
        Ok(self.root.join(self.title.stem())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Draft", "_Draft_")]
    #[case("My Novel", "_My_Novel_")]
    #[case("v1.2", "_v1.2_")]
    fn title_stem(#[case] title: &str, #[case] stem: &str) {
        assert_eq!(Title::new(title).unwrap().stem(), stem);
    }

    #[rstest]
    #[case("")]
    #[case("a/b")]
    #[case("tab\there")]
    fn title_rejects(#[case] title: &str) {
        assert!(matches!(Title::new(title), Err(Error::InvalidTitle { .. })));
    }

    #[test]
    fn title_length_limit() {
        let fits = "t".repeat(MAX_NAME_LEN - 2 - COLLATE_EXTENSION.len());
        assert!(Title::new(fits).is_ok());
        let too_long = "t".repeat(MAX_NAME_LEN - 1 - COLLATE_EXTENSION.len());
        assert!(Title::new(too_long).is_err());
    }

    #[test]
    fn default_title() {
        let title = Title::default();
        assert_eq!(title.stem(), "_draft_");
        assert_eq!(title.collate_file_name(), "_draft_.md");
    }

    #[rstest]
    #[case(0, false)]
    #[case(1, true)]
    #[case(10, true)]
    #[case(11, false)]
    fn padding_range(#[case] width: u32, #[case] ok: bool) {
        assert_eq!(Padding::new(width).is_ok(), ok);
    }

    #[test]
    fn padding_format() {
        let padding = Padding::new(3).unwrap();
        assert_eq!(padding.format(7), "007");
        assert_eq!(padding.max_position(), 999);
        assert_eq!(Padding::new(10).unwrap().max_position(), 9_999_999_999);
    }

    #[test]
    fn padding_from_str() {
        assert_eq!("4".parse::<Padding>().unwrap().width(), 4);
        assert!("four".parse::<Padding>().is_err());
        assert!("0".parse::<Padding>().is_err());
    }

    #[test]
    fn padding_error_keeps_the_raw_text() {
        let err = "x".parse::<Padding>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid padding 'x': must be a value from 1 to 10"
        );
        let err = Padding::new(11).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid padding '11': must be a value from 1 to 10"
        );
    }

    #[test]
    fn max_depth_bounds() {
        let root = ProjectPath::new("/novel").unwrap();
        let config = ProjectConfig::new(root, Mode::Check);
        assert!(config.clone().with_max_depth(0).is_err());
        assert!(config.clone().with_max_depth(DEPTH_CEILING + 1).is_err());
        assert_eq!(config.with_max_depth(4).unwrap().max_depth, 4);
    }

    #[test]
    fn settings_override_defaults() {
        let root = ProjectPath::new("/novel").unwrap();
        let settings = Settings {
            title: Some("Book".into()),
            padding: Some(2),
            extensions: Some(vec![".txt".into()]),
            max_depth: Some(6),
        };
        let config = ProjectConfig::from_settings(root, Mode::List, &settings).unwrap();
        assert_eq!(config.title.stem(), "_Book_");
        assert_eq!(config.padding.width(), 2);
        assert_eq!(config.extensions.iter().collect::<Vec<_>>(), vec![".txt"]);
        assert_eq!(config.max_depth, 6);
        assert_eq!(config.list_path().unwrap().as_str(), "/novel/_Book_");
        assert_eq!(config.collate_path().unwrap().as_str(), "/novel/_Book_.md");
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let root = ProjectPath::new("/novel").unwrap();
        let settings = Settings {
            padding: Some(12),
            ..Settings::default()
        };
        assert!(matches!(
            ProjectConfig::from_settings(root, Mode::List, &settings),
            Err(Error::InvalidPadding { ref value, .. }) if value == "12"
        ));
    }
}
