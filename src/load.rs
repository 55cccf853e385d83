//! Text table-file loading for the CLI.
//!
//! One entry per line: the template, whitespace, then the tag. A 32-bit
//! template keeps its interior halfword space, so the tag is always the
//! final whitespace-separated token. `#` starts a comment.

use crate::{
    error::CompileError,
    table::{PatternTable, TableBuilder},
    template::Width,
};

pub fn parse_table_text(text: &str, width: Width) -> Result<PatternTable, CompileError> {
    let mut builder = TableBuilder::new(width);

    for line in text.lines() {
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let mut tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 2 {
            return Err(CompileError::MalformedTemplate {
                template: line.to_string(),
                reason: "expected a template followed by a tag".to_string(),
            });
        }

        let tag = tokens.pop().unwrap_or_default();
        let template = tokens.join(" ");
        builder = builder.add(&template, tag);
    }

    builder.build()
}
