/// Bit indices set in `mask`, most significant first.
pub fn bit_positions(mask: u32) -> Vec<u8> {
    (0..32u8)
        .rev()
        .filter(|&b| mask & (1 << b) != 0)
        .collect()
}
