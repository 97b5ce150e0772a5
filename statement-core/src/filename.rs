//! Download filename policy for rendered statements.
//!
//! - one named customer: `Jane_Doe_statement.pdf`
//! - one unnamed customer: `statement.pdf`
//! - several customers: first names joined, `Jane_John_joint_statement.pdf`,
//!   or `joint_statement.pdf` when none of them has a name

use regex::Regex;
use std::sync::LazyLock;

use crate::model::{Customer, StatementFormat};

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Filename stem (no extension) for a statement covering `customers`.
pub fn filename_stem(customers: &[Customer]) -> String {
    match customers {
        [] => "statement".to_string(),
        [only] => {
            let name = only.name.trim();
            if name.is_empty() {
                "statement".to_string()
            } else {
                format!("{}_statement", WHITESPACE_RUN.replace_all(name, "_"))
            }
        }
        many => {
            let first_names: Vec<&str> = many
                .iter()
                .filter_map(|c| c.name.split_whitespace().next())
                .collect();
            if first_names.is_empty() {
                "joint_statement".to_string()
            } else {
                format!("{}_joint_statement", first_names.join("_"))
            }
        }
    }
}

/// Full filename, `<stem>.<format>`.
pub fn statement_filename(customers: &[Customer], format: StatementFormat) -> String {
    format!("{}.{}", filename_stem(customers), format.extension())
}
