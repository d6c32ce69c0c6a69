use crate::ast::NodeKind;
use crate::transpiler::traits::{DialectAdapter, ExplainSyntax, quote_with};

pub struct SqliteGenerator;

impl DialectAdapter for SqliteGenerator {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn quote_identifier(&self, id: &str) -> String {
        quote_with(id, '"', '"')
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn supports(&self, kind: NodeKind) -> bool {
        // Row locking does not exist; DELETE has no USING.
        !matches!(
            kind,
            NodeKind::Top | NodeKind::Output | NodeKind::Using | NodeKind::Modifier
        )
    }

    fn bool_literal(&self, val: bool) -> String {
        if val { "1".to_string() } else { "0".to_string() }
    }

    fn explain_options(&self) -> Option<ExplainSyntax> {
        None
    }

    fn insert_ignore(&self) -> Option<&'static str> {
        Some("INSERT OR IGNORE")
    }
}
