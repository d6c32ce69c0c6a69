use crate::ast::NodeKind;
use crate::transpiler::traits::{DialectAdapter, ExplainSyntax, quote_with};

/// MySQL Generator.
pub struct MysqlGenerator;

impl DialectAdapter for MysqlGenerator {
    fn name(&self) -> &str {
        "mysql"
    }

    fn quote_identifier(&self, name: &str) -> String {
        quote_with(name, '`', '`')
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn supports(&self, kind: NodeKind) -> bool {
        // No RETURNING; upserts use ON DUPLICATE KEY, which is not modelled.
        !matches!(
            kind,
            NodeKind::Top | NodeKind::Output | NodeKind::Returning | NodeKind::OnConflict
        )
    }

    fn bool_literal(&self, val: bool) -> String {
        if val { "1".to_string() } else { "0".to_string() }
    }

    fn string_literal(&self, val: &str) -> String {
        // Backslash is an escape character unless NO_BACKSLASH_ESCAPES is set.
        quote_with(&val.replace('\\', "\\\\"), '\'', '\'')
    }

    fn explain_options(&self) -> Option<ExplainSyntax> {
        Some(ExplainSyntax {
            open: "",
            delimiter: " ",
            assignment: "=",
            close: "",
        })
    }

    fn insert_ignore(&self) -> Option<&'static str> {
        Some("INSERT IGNORE")
    }
}
