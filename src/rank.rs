use std::cmp::Reverse;

use crate::{
    table::PatternTable,
    template::{CompiledPattern, Width},
};

/// A pattern table in test order: most fixed bits first, declaration
/// order breaking ties. A pattern pinning more bits is a refinement of
/// any pattern whose fixed bits it subsumes, so refinements must be
/// tested before generalizations for "most specific match wins" to hold.
pub struct RankedTable {
    width: Width,
    patterns: Vec<CompiledPattern>,
}

impl RankedTable {
    pub fn width(&self) -> Width {
        self.width
    }

    pub fn patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }
}

pub fn rank(table: PatternTable) -> RankedTable {
    let width = table.width();
    let mut patterns = table.into_patterns();

    // Stable sort: equal specificity keeps declaration order.
    patterns.sort_by_key(|p| Reverse(p.specificity));

    if let (Some(first), Some(last)) = (patterns.first(), patterns.last()) {
        log::debug!(
            "ranked {} patterns, specificity {}..={}",
            patterns.len(),
            last.specificity,
            first.specificity
        );
    }

    RankedTable { width, patterns }
}
