use smallvec::{SmallVec, smallvec};

use crate::error::CompileError;

/// Declared word width of one encoding table. 16-bit and 32-bit tables
/// are compiled and consumed independently; selecting which one applies
/// to a raw word is the caller's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    W16,
    W32,
}

impl Width {
    pub const fn bits(self) -> u32 {
        match self {
            Width::W16 => 16,
            Width::W32 => 32,
        }
    }

    pub const fn word_mask(self) -> u32 {
        match self {
            Width::W16 => 0xFFFF,
            Width::W32 => 0xFFFF_FFFF,
        }
    }
}

/// The generic filler wildcard: unconstrained and anonymous.
const FILLER: char = '.';

/// A named operand field: every template position sharing one field
/// letter, kept MSB-first. Positions need not be contiguous (BL splits
/// its immediate across both halfwords).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: char,
    pub bits: SmallVec<[u8; 16]>,
}

impl FieldDescriptor {
    /// Read the field out of a concrete opcode as an unsigned integer,
    /// MSB-first.
    pub fn extract(&self, opcode: u32) -> u32 {
        self.bits
            .iter()
            .fold(0, |acc, &pos| (acc << 1) | ((opcode >> pos) & 1))
    }
}

/// One template, parsed. `fixed_mask` selects the bits a match requires,
/// `fixed_value` gives their required values, and `specificity` counts
/// them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPattern {
    pub fixed_mask: u32,
    pub fixed_value: u32,
    pub specificity: u32,
    pub tag: String,
    pub fields: Vec<FieldDescriptor>,
    pub width: Width,
}

impl CompiledPattern {
    pub fn matches(&self, opcode: u32) -> bool {
        (opcode & self.fixed_mask) == self.fixed_value
    }

    pub fn wildcard_mask(&self) -> u32 {
        !self.fixed_mask & self.width.word_mask()
    }
}

/// Parse one template string against its declared width.
///
/// Alphabet: `0`/`1` fix a bit, `.` is the anonymous wildcard, and any
/// ASCII letter (case-sensitive) is a wildcard grouped into the named
/// field for that letter. A 32-bit template is two 16-character halves
/// joined by exactly one space, concatenated into bit positions 31..0.
pub fn parse_template(
    pattern: &str,
    width: Width,
    tag: &str,
) -> Result<CompiledPattern, CompileError> {
    let cells = template_cells(pattern, width)?;

    let mut fixed_mask = 0u32;
    let mut fixed_value = 0u32;
    let mut fields: Vec<FieldDescriptor> = Vec::new();

    for (idx, ch) in cells.iter().enumerate() {
        let pos = (width.bits() - 1 - idx as u32) as u8;
        match *ch {
            '0' | '1' => {
                fixed_mask |= 1 << pos;
                if *ch == '1' {
                    fixed_value |= 1 << pos;
                }
            }
            FILLER => {}
            c if c.is_ascii_alphabetic() => match fields.iter_mut().find(|f| f.name == c) {
                Some(field) => field.bits.push(pos),
                None => fields.push(FieldDescriptor {
                    name: c,
                    bits: smallvec![pos],
                }),
            },
            c => {
                return Err(malformed(
                    pattern,
                    format!("character {c:?} is outside the template alphabet"),
                ));
            }
        }
    }

    Ok(CompiledPattern {
        fixed_mask,
        fixed_value,
        specificity: fixed_mask.count_ones(),
        tag: tag.to_string(),
        fields,
        width,
    })
}

/// Flatten the template into one cell per bit position, validating
/// length and (for 32-bit) the halfword separator.
fn template_cells(pattern: &str, width: Width) -> Result<Vec<char>, CompileError> {
    let chars: Vec<char> = pattern.chars().collect();

    match width {
        Width::W16 => {
            if chars.len() != 16 {
                return Err(malformed(
                    pattern,
                    format!("expected 16 characters, got {}", chars.len()),
                ));
            }
            Ok(chars)
        }
        Width::W32 => {
            if chars.len() != 33 {
                return Err(malformed(
                    pattern,
                    format!(
                        "expected two 16-character halves joined by one space, got {} characters",
                        chars.len()
                    ),
                ));
            }
            if chars[16] != ' ' {
                return Err(malformed(
                    pattern,
                    "halfword separator must be a single space after the first 16 characters"
                        .to_string(),
                ));
            }
            let mut cells = Vec::with_capacity(32);
            cells.extend_from_slice(&chars[..16]);
            cells.extend_from_slice(&chars[17..]);
            Ok(cells)
        }
    }
}

fn malformed(pattern: &str, reason: String) -> CompileError {
    CompileError::MalformedTemplate {
        template: pattern.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fixed_and_fields() {
        let p = parse_template("010001110mmmm000", Width::W16, "BX_t1").unwrap();

        assert_eq!(p.fixed_mask, 0b1111_1111_1000_0111);
        assert_eq!(p.fixed_value, 0b0100_0111_0000_0000);
        assert_eq!(p.specificity, 12);
        assert_eq!(p.tag, "BX_t1");

        assert_eq!(p.fields.len(), 1);
        let m = &p.fields[0];
        assert_eq!(m.name, 'm');
        assert_eq!(m.bits.as_slice(), &[6, 5, 4, 3]);
    }

    #[test]
    fn test_parse_filler_is_anonymous() {
        let p = parse_template("1011.0.1........", Width::W16, "CBZ_t1").unwrap();
        assert_eq!(p.fixed_mask, 0b1111_0101_0000_0000);
        assert_eq!(p.fixed_value, 0b1011_0001_0000_0000);
        assert!(p.fields.is_empty());
    }

    #[test]
    fn test_parse_two_fields() {
        let p = parse_template("1101cccciiiiiiii", Width::W16, "B_t1").unwrap();
        assert_eq!(p.specificity, 4);
        assert_eq!(p.fields.len(), 2);
        assert_eq!(p.fields[0].name, 'c');
        assert_eq!(p.fields[0].bits.as_slice(), &[11, 10, 9, 8]);
        assert_eq!(p.fields[1].name, 'i');
        assert_eq!(p.fields[1].bits.len(), 8);
    }

    #[test]
    fn test_parse_32bit_separator() {
        let p = parse_template(
            "11110Siiiiiiiiii 11j1Jiiiiiiiiiii",
            Width::W32,
            "BL_t1",
        )
        .unwrap();

        assert_eq!(p.specificity, 8);
        // i spans both halves: bits 25..16 of the first half plus
        // 10..0 of the second, MSB-first in one descriptor.
        let i = p.fields.iter().find(|f| f.name == 'i').unwrap();
        assert_eq!(i.bits.len(), 21);
        assert_eq!(i.bits[0], 25);
        assert_eq!(*i.bits.last().unwrap(), 0);

        // S, j and J are case-sensitive one-bit fields.
        for (name, pos) in [('S', 26), ('j', 13), ('J', 11)] {
            let f = p.fields.iter().find(|f| f.name == name).unwrap();
            assert_eq!(f.bits.as_slice(), &[pos]);
        }
    }

    #[test]
    fn test_field_extract_msb_first() {
        let p = parse_template("0001100mmmnnnddd", Width::W16, "ADD_reg_t1").unwrap();
        let opcode = 0b0001100_101_011_110u32;

        let get = |name| {
            p.fields
                .iter()
                .find(|f| f.name == name)
                .unwrap()
                .extract(opcode)
        };
        assert_eq!(get('m'), 0b101);
        assert_eq!(get('n'), 0b011);
        assert_eq!(get('d'), 0b110);
    }

    #[test]
    fn test_wrong_length_is_malformed() {
        // 15 characters against a 16-bit table: rejected, never padded.
        let err = parse_template("010001110mm0000", Width::W16, "BX_t1").unwrap_err();
        assert!(matches!(err, CompileError::MalformedTemplate { .. }));
    }

    #[test]
    fn test_bad_alphabet_is_malformed() {
        let err = parse_template("2101cccciiiiiiii", Width::W16, "B_t1").unwrap_err();
        assert!(matches!(err, CompileError::MalformedTemplate { .. }));
    }

    #[test]
    fn test_misplaced_separator_is_malformed() {
        // Right length, space in the wrong column.
        let err = parse_template(
            "11110Siiiiiiiiiii 1j1Jiiiiiiiiiii",
            Width::W32,
            "BL_t1",
        )
        .unwrap_err();
        assert!(matches!(err, CompileError::MalformedTemplate { .. }));

        let err = parse_template("1111001111101111", Width::W32, "MRS_t1").unwrap_err();
        assert!(matches!(err, CompileError::MalformedTemplate { .. }));
    }

    #[test]
    fn test_matches_and_wildcard_mask() {
        let p = parse_template("010001110mmmm000", Width::W16, "BX_t1").unwrap();
        assert!(p.matches(0x4770));
        assert!(!p.matches(0x4771));
        assert_eq!(p.wildcard_mask(), 0b0000_0000_0111_1000);
    }
}
