use crate::{
    error::CompileError,
    rank::RankedTable,
    template::{CompiledPattern, FieldDescriptor},
};

/// Which guard form the emitter renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// `(opcode & mask) == value` guards in ranked order; always exact
    /// once overlap analysis has passed.
    MaskChain,
    /// `low..=high` interval guards; exact only when each pattern's
    /// wildcards form one trailing run, which the emitter verifies.
    Range,
}

/// What to do with a pattern the range backend cannot express exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangePolicy {
    /// Abort the batch with [`CompileError::NonContiguousWildcards`].
    Strict,
    /// Degrade only the offending entries to mask guards.
    MaskFallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmitConfig {
    pub backend: Backend,
    pub range_policy: RangePolicy,
}

impl Default for EmitConfig {
    fn default() -> Self {
        EmitConfig {
            backend: Backend::MaskChain,
            range_policy: RangePolicy::Strict,
        }
    }
}

/// A compiled test deciding whether an opcode matches one pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Mask { mask: u32, value: u32 },
    Range { low: u32, high: u32 },
}

/// Numeric bounds of a pattern: every wildcard driven to 0 for `low`
/// and to 1 for `high`. Used only by the range backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchInterval {
    pub low: u32,
    pub high: u32,
}

impl MatchInterval {
    pub fn of(pattern: &CompiledPattern) -> Self {
        MatchInterval {
            low: pattern.fixed_value,
            high: pattern.fixed_value | pattern.wildcard_mask(),
        }
    }

    /// True when the interval equals the pattern's real match set, i.e.
    /// it holds exactly one value per wildcard assignment. Interleaved
    /// wildcard runs fail this: their interval also covers opcodes that
    /// violate the fixed bits.
    pub fn covers_exactly(&self, wildcard_bits: u32) -> bool {
        // u64 keeps the all-wildcard 32-bit pattern from overflowing.
        (self.high as u64) - (self.low as u64) + 1 == 1u64 << wildcard_bits
    }
}

/// One emission record. Rendering records into concrete target-language
/// syntax is the job of an external templating layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitRecord {
    pub guard: Guard,
    pub tag: String,
    pub fields: Vec<FieldDescriptor>,
}

/// Render the verified, ranked table as an ordered guard sequence.
pub fn emit(table: &RankedTable, config: &EmitConfig) -> Result<Vec<EmitRecord>, CompileError> {
    table
        .patterns()
        .iter()
        .map(|pattern| {
            let guard = match config.backend {
                Backend::MaskChain => mask_guard(pattern),
                Backend::Range => range_guard(pattern, config.range_policy)?,
            };
            Ok(EmitRecord {
                guard,
                tag: pattern.tag.clone(),
                fields: pattern.fields.clone(),
            })
        })
        .collect()
}

fn mask_guard(pattern: &CompiledPattern) -> Guard {
    Guard::Mask {
        mask: pattern.fixed_mask,
        value: pattern.fixed_value,
    }
}

fn range_guard(pattern: &CompiledPattern, policy: RangePolicy) -> Result<Guard, CompileError> {
    let interval = MatchInterval::of(pattern);
    if interval.covers_exactly(pattern.wildcard_mask().count_ones()) {
        return Ok(Guard::Range {
            low: interval.low,
            high: interval.high,
        });
    }

    match policy {
        RangePolicy::Strict => Err(CompileError::NonContiguousWildcards {
            tag: pattern.tag.clone(),
        }),
        RangePolicy::MaskFallback => {
            log::debug!(
                "pattern {} has interleaved wildcards, emitting a mask guard instead",
                pattern.tag
            );
            Ok(mask_guard(pattern))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        rank::rank,
        table::TableBuilder,
        template::{Width, parse_template},
    };

    fn ranked(entries: &[(&str, &str)]) -> RankedTable {
        rank(
            TableBuilder::new(Width::W16)
                .add_all(entries.iter().copied())
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_interval_arithmetic() {
        // 7 fixed bits, 9 contiguous trailing wildcards.
        let p = parse_template("0001100mmmnnnddd", Width::W16, "ADD_reg_t1").unwrap();
        let interval = MatchInterval::of(&p);

        assert_eq!(interval.low, 0x1800);
        assert_eq!(interval.high, 0x19FF);
        assert_eq!(interval.high - interval.low + 1, 512);
        assert!(interval.covers_exactly(9));
    }

    #[test]
    fn test_interleaved_wildcards_not_exact() {
        // Wildcards split around fixed bit 3.
        let p = parse_template("010001110mmmm000", Width::W16, "BX_t1").unwrap();
        let interval = MatchInterval::of(&p);
        assert!(!interval.covers_exactly(p.wildcard_mask().count_ones()));
    }

    #[test]
    fn test_all_wildcard_pattern_is_exact() {
        let p = parse_template(
            "................ ................",
            Width::W32,
            "ANY",
        )
        .unwrap();
        assert!(MatchInterval::of(&p).covers_exactly(32));
    }

    #[test]
    fn test_mask_chain_records() {
        let table = ranked(&[
            ("1101cccciiiiiiii", "B_t1_SVC_t1"),
            ("010001110mmmm000", "BX_t1"),
        ]);
        let records = emit(&table, &EmitConfig::default()).unwrap();

        // Ranked order, not declaration order.
        assert_eq!(records[0].tag, "BX_t1");
        assert_eq!(
            records[0].guard,
            Guard::Mask {
                mask: 0xFF87,
                value: 0x4700
            }
        );
        assert_eq!(records[1].tag, "B_t1_SVC_t1");
        assert_eq!(
            records[1].guard,
            Guard::Mask {
                mask: 0xF000,
                value: 0xD000
            }
        );
    }

    #[test]
    fn test_range_strict_rejects_interleaved() {
        let table = ranked(&[("010001110mmmm000", "BX_t1")]);
        let config = EmitConfig {
            backend: Backend::Range,
            range_policy: RangePolicy::Strict,
        };

        assert_eq!(
            emit(&table, &config).unwrap_err(),
            CompileError::NonContiguousWildcards {
                tag: "BX_t1".to_string()
            }
        );
    }

    #[test]
    fn test_range_fallback_degrades_only_offenders() {
        let table = ranked(&[
            ("0001100mmmnnnddd", "ADD_reg_t1"),
            ("010001110mmmm000", "BX_t1"),
        ]);
        let config = EmitConfig {
            backend: Backend::Range,
            range_policy: RangePolicy::MaskFallback,
        };
        let records = emit(&table, &config).unwrap();

        assert_eq!(records[0].tag, "BX_t1");
        assert!(matches!(records[0].guard, Guard::Mask { .. }));
        assert_eq!(
            records[1].guard,
            Guard::Range {
                low: 0x1800,
                high: 0x19FF
            }
        );
    }
}
