//! Dialect profiles loaded from TOML.
//!
//! A profile layers identifier quoting, placeholder style and clause support
//! on top of a built-in dialect:
//!
//! ```toml
//! [[dialect]]
//! name = "cockroach"
//! base = "postgres"
//! unsupported = ["Modifier"]
//!
//! [[dialect]]
//! name = "mariadb"
//! base = "mysql"
//! supported = ["Returning"]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ast::NodeKind;
use crate::error::{QueryError, QueryResult};
use crate::transpiler::dialect::Dialect;
use crate::transpiler::traits::{Clause, DialectAdapter, ExplainSyntax, StatementKind, quote_with};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStyle {
    /// "name"
    DoubleQuote,
    /// `name`
    Backtick,
    /// [name]
    Bracket,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderStyle {
    /// $1
    Dollar,
    /// ?
    Question,
    /// @p1
    AtP,
    /// :1
    Colon,
}

/// A named dialect derived from a built-in one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialectProfile {
    pub name: String,
    #[serde(default)]
    pub base: Dialect,
    #[serde(default)]
    pub quote: Option<QuoteStyle>,
    #[serde(default)]
    pub placeholder: Option<PlaceholderStyle>,
    /// Kinds rejected even if the base dialect supports them.
    #[serde(default)]
    pub unsupported: Vec<NodeKind>,
    /// Kinds accepted even if the base dialect rejects them.
    #[serde(default)]
    pub supported: Vec<NodeKind>,
}

#[derive(Debug, Deserialize)]
struct ProfileFile {
    #[serde(default)]
    dialect: Vec<DialectProfile>,
}

impl DialectProfile {
    /// A profile that behaves exactly like `base`.
    pub fn new(name: impl Into<String>, base: Dialect) -> Self {
        Self {
            name: name.into(),
            base,
            quote: None,
            placeholder: None,
            unsupported: Vec::new(),
            supported: Vec::new(),
        }
    }

    /// Parse a single profile table.
    pub fn from_toml(source: &str) -> QueryResult<Self> {
        let profile: Self = toml::from_str(source)?;
        profile.validate()?;
        Ok(profile)
    }

    fn validate(&self) -> QueryResult<()> {
        if self.name.is_empty() {
            return Err(QueryError::Config("dialect profile requires a name".to_string()));
        }
        if let Some(kind) = self.unsupported.iter().find(|k| self.supported.contains(k)) {
            return Err(QueryError::Config(format!(
                "dialect profile '{}' lists {} as both supported and unsupported",
                self.name, kind
            )));
        }
        Ok(())
    }

    fn base_generator(&self) -> &'static dyn DialectAdapter {
        self.base.generator()
    }
}

impl DialectAdapter for DialectProfile {
    fn name(&self) -> &str {
        &self.name
    }

    fn quote_identifier(&self, name: &str) -> String {
        match self.quote {
            Some(QuoteStyle::DoubleQuote) => quote_with(name, '"', '"'),
            Some(QuoteStyle::Backtick) => quote_with(name, '`', '`'),
            Some(QuoteStyle::Bracket) => quote_with(name, '[', ']'),
            None => self.base_generator().quote_identifier(name),
        }
    }

    fn placeholder(&self, index: usize) -> String {
        match self.placeholder {
            Some(PlaceholderStyle::Dollar) => format!("${}", index),
            Some(PlaceholderStyle::Question) => "?".to_string(),
            Some(PlaceholderStyle::AtP) => format!("@p{}", index),
            Some(PlaceholderStyle::Colon) => format!(":{}", index),
            None => self.base_generator().placeholder(index),
        }
    }

    fn supports(&self, kind: NodeKind) -> bool {
        if self.unsupported.contains(&kind) {
            return false;
        }
        self.supported.contains(&kind) || self.base_generator().supports(kind)
    }

    fn clause_order(&self, statement: StatementKind) -> &[Clause] {
        self.base_generator().clause_order(statement)
    }

    fn bool_literal(&self, val: bool) -> String {
        self.base_generator().bool_literal(val)
    }

    fn string_literal(&self, val: &str) -> String {
        self.base_generator().string_literal(val)
    }

    fn case_insensitive_like(&self, negated: bool) -> &'static str {
        self.base_generator().case_insensitive_like(negated)
    }

    fn explain_options(&self) -> Option<ExplainSyntax> {
        self.base_generator().explain_options()
    }

    fn offset_suffix(&self) -> &'static str {
        self.base_generator().offset_suffix()
    }

    fn insert_ignore(&self) -> Option<&'static str> {
        self.base_generator().insert_ignore()
    }
}

/// Parse a file of `[[dialect]]` tables.
pub fn load_profiles(source: &str) -> QueryResult<Vec<DialectProfile>> {
    let file: ProfileFile = toml::from_str(source)?;
    for profile in &file.dialect {
        profile.validate()?;
    }
    tracing::info!("Loaded {} dialect profile(s)", file.dialect.len());
    Ok(file.dialect)
}

pub fn load_profiles_from_path(path: &Path) -> QueryResult<Vec<DialectProfile>> {
    tracing::debug!("Reading dialect profiles from {}", path.display());
    let source = std::fs::read_to_string(path)?;
    load_profiles(&source)
}

/// `<config dir>/querynode/dialects.toml`
pub fn user_profiles_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("querynode").join("dialects.toml"))
}

/// Profiles from the per-user config file; empty when there is none.
pub fn load_user_profiles() -> QueryResult<Vec<DialectProfile>> {
    match user_profiles_path() {
        Some(path) if path.exists() => load_profiles_from_path(&path),
        _ => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_profiles() {
        let profiles = load_profiles(
            r#"
            [[dialect]]
            name = "cockroach"
            base = "postgres"
            unsupported = ["Modifier"]

            [[dialect]]
            name = "mariadb"
            base = "mysql"
            supported = ["Returning"]
            placeholder = "colon"
            "#,
        )
        .unwrap();

        assert_eq!(profiles.len(), 2);
        let cockroach = &profiles[0];
        assert_eq!(cockroach.base, Dialect::Postgres);
        assert!(!cockroach.supports(NodeKind::Modifier));
        assert!(cockroach.supports(NodeKind::Returning));
        assert_eq!(cockroach.quote_identifier("t"), "\"t\"");

        let mariadb = &profiles[1];
        assert!(mariadb.supports(NodeKind::Returning));
        assert!(!mariadb.supports(NodeKind::Output));
        assert_eq!(mariadb.quote_identifier("t"), "`t`");
        assert_eq!(mariadb.placeholder(3), ":3");
    }

    #[test]
    fn test_base_defaults_to_postgres() {
        let profile = DialectProfile::from_toml(r#"name = "plain""#).unwrap();
        assert_eq!(profile.base, Dialect::Postgres);
        assert_eq!(profile.placeholder(1), "$1");
    }

    #[test]
    fn test_invalid_profiles() {
        assert!(matches!(
            DialectProfile::from_toml(r#"name = """#),
            Err(QueryError::Config(_))
        ));
        assert!(matches!(
            DialectProfile::from_toml(r#"name = "x"
supported = ["Top"]
unsupported = ["Top"]"#),
            Err(QueryError::Config(_))
        ));
        assert!(matches!(
            load_profiles("[[dialect]]\nbase = \"oracle\""),
            Err(QueryError::Config(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_profiles_from_path(Path::new("/nonexistent/querynode/dialects.toml"));
        assert!(matches!(err, Err(QueryError::Io(_))));
    }
}
