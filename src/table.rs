use crate::{
    error::CompileError,
    template::{CompiledPattern, Width, parse_template},
};

/// Collects `(template, tag)` rows for one width and parses them into a
/// [`PatternTable`] in declaration order.
pub struct TableBuilder {
    width: Width,
    entries: Vec<(String, String)>,
}

impl TableBuilder {
    pub fn new(width: Width) -> Self {
        TableBuilder {
            width,
            entries: Vec::new(),
        }
    }

    pub fn add(mut self, template: &str, tag: &str) -> Self {
        self.entries.push((template.to_string(), tag.to_string()));
        self
    }

    pub fn add_all<'a, I>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (template, tag) in entries {
            self.entries.push((template.to_string(), tag.to_string()));
        }
        self
    }

    pub fn build(self) -> Result<PatternTable, CompileError> {
        let mut patterns = Vec::with_capacity(self.entries.len());

        for (template, tag) in &self.entries {
            if patterns.iter().any(|p: &CompiledPattern| p.tag == *tag) {
                return Err(CompileError::DuplicateTag(tag.clone()));
            }
            patterns.push(parse_template(template, self.width, tag)?);
        }

        log::debug!(
            "parsed {} templates into a {}-bit pattern table",
            patterns.len(),
            self.width.bits()
        );

        Ok(PatternTable {
            width: self.width,
            patterns,
        })
    }
}

/// The immutable input artifact of one compiler invocation: every parsed
/// pattern of one width, still in declaration order. Tags are unique and
/// no entry ever mutates another.
#[derive(Debug)]
pub struct PatternTable {
    width: Width,
    patterns: Vec<CompiledPattern>,
}

impl PatternTable {
    pub fn width(&self) -> Width {
        self.width
    }

    pub fn patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }

    pub(crate) fn into_patterns(self) -> Vec<CompiledPattern> {
        self.patterns
    }
}
