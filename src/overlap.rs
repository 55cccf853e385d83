use crate::{error::CompileError, rank::RankedTable, template::CompiledPattern, utils::bit_positions};

/// Two patterns share at least one opcode iff their fixed bits agree
/// wherever both constrain the word.
fn intersects(p: &CompiledPattern, q: &CompiledPattern) -> bool {
    ((p.fixed_value ^ q.fixed_value) & p.fixed_mask & q.fixed_mask) == 0
}

/// The bit positions specificity ordering would have to arbitrate:
/// those fixed by exactly one of the two patterns. For identical fixed
/// masks (duplicate constraints) the shared fixed positions are named
/// instead.
fn conflicting_bits(p: &CompiledPattern, q: &CompiledPattern) -> Vec<u8> {
    let diff = p.fixed_mask ^ q.fixed_mask;
    bit_positions(if diff == 0 { p.fixed_mask } else { diff })
}

/// Prove that test order disambiguates every intersecting pair.
///
/// Exhaustive and pairwise over the whole table; an unresolved overlap
/// would miscompile the decoder only for the opcodes inside the
/// intersection, so this check is never skipped or sampled.
pub fn analyze(table: &RankedTable) -> Result<(), CompileError> {
    let patterns = table.patterns();

    for (i, p) in patterns.iter().enumerate() {
        for q in &patterns[i + 1..] {
            if !intersects(p, q) {
                continue;
            }
            // p is tested first; it must be the strictly more specific
            // of the two. Equal specificity leaves first-match order as
            // the only arbiter, which the declaration order of a
            // reference table does not meaningfully encode.
            if p.specificity <= q.specificity {
                return Err(CompileError::AmbiguousEncoding {
                    first: p.tag.clone(),
                    second: q.tag.clone(),
                    positions: conflicting_bits(p, q),
                });
            }
        }
    }

    log::debug!(
        "overlap analysis passed for {} patterns ({} pairs)",
        patterns.len(),
        patterns.len() * patterns.len().saturating_sub(1) / 2
    );
    Ok(())
}
