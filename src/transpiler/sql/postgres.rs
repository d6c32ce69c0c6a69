use crate::ast::NodeKind;
use crate::transpiler::traits::{DialectAdapter, quote_with};

pub struct PostgresGenerator;

impl DialectAdapter for PostgresGenerator {
    fn name(&self) -> &str {
        "postgres"
    }

    fn quote_identifier(&self, name: &str) -> String {
        quote_with(name, '"', '"')
    }

    fn placeholder(&self, index: usize) -> String {
        format!("${}", index)
    }

    fn supports(&self, kind: NodeKind) -> bool {
        !matches!(kind, NodeKind::Top | NodeKind::Output)
    }

    fn bool_literal(&self, val: bool) -> String {
        if val {
            "true".to_string()
        } else {
            "false".to_string()
        }
    }

    fn case_insensitive_like(&self, negated: bool) -> &'static str {
        if negated { "NOT ILIKE" } else { "ILIKE" }
    }
}
