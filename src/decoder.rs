use crate::emit::{EmitRecord, Guard};

/// The reserved outcome when no guard matches.
pub const UNDEFINED: &str = "UNDEFINED";

/// One decoded word: the winning tag plus its operand fields, extracted
/// MSB-first in template order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded<'a> {
    pub tag: &'a str,
    pub fields: Vec<(char, u32)>,
}

/// The generated decision procedure: guards evaluated in emitted order,
/// first match wins. Evaluating never fails; a word outside every guard
/// is an undefined encoding, not an error.
pub struct DecisionTable {
    records: Vec<EmitRecord>,
}

impl DecisionTable {
    pub fn new(records: Vec<EmitRecord>) -> Self {
        DecisionTable { records }
    }

    pub fn records(&self) -> &[EmitRecord] {
        &self.records
    }

    pub fn decode(&self, opcode: u32) -> Option<Decoded<'_>> {
        for record in &self.records {
            if guard_matches(&record.guard, opcode) {
                return Some(Decoded {
                    tag: &record.tag,
                    fields: record
                        .fields
                        .iter()
                        .map(|f| (f.name, f.extract(opcode)))
                        .collect(),
                });
            }
        }

        None
    }

    /// Tag-only decode with the [`UNDEFINED`] fallback built in.
    pub fn decode_tag(&self, opcode: u32) -> &str {
        self.decode(opcode).map_or(UNDEFINED, |d| d.tag)
    }
}

fn guard_matches(guard: &Guard, opcode: u32) -> bool {
    match *guard {
        Guard::Mask { mask, value } => (opcode & mask) == value,
        Guard::Range { low, high } => (low..=high).contains(&opcode),
    }
}
