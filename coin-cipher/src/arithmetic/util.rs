//! Limb helpers shared by the field and scalar implementations.

/// Computes `a + b + carry`, returning the result along with the new carry.
#[inline(always)]
pub(crate) const fn adc64(a: u64, b: u64, carry: u64) -> (u64, u64) {
    let ret = (a as u128) + (b as u128) + (carry as u128);
    (ret as u64, (ret >> 64) as u64)
}

/// Computes `a - (b + borrow)`, returning the result along with the new borrow.
/// The borrow is either `0` or `u64::MAX`.
#[inline(always)]
pub(crate) const fn sbb64(a: u64, b: u64, borrow: u64) -> (u64, u64) {
    let ret = (a as u128).wrapping_sub((b as u128) + ((borrow >> 63) as u128));
    (ret as u64, (ret >> 64) as u64)
}

/// Splits 32 big-endian bytes into four little-endian ordered 64-bit words.
pub(crate) const fn be_bytes_to_words(bytes: &[u8; 32]) -> [u64; 4] {
    let mut words = [0u64; 4];
    let mut i = 0;
    while i < 32 {
        let word = 3 - i / 8;
        words[word] = (words[word] << 8) | bytes[i] as u64;
        i += 1;
    }
    words
}

/// Inverse of [`be_bytes_to_words`].
pub(crate) fn words_to_be_bytes(words: &[u64; 4]) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    for (chunk, word) in bytes.chunks_exact_mut(8).zip(words.iter().rev()) {
        chunk.copy_from_slice(&word.to_be_bytes());
    }
    bytes
}
