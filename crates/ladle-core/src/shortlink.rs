//! Reversible short-link codec.
//!
//! Encodes a numeric identifier into a compact token for shareable
//! URLs: the id is mixed with an odd multiplicative constant (a
//! bijection on `u64`, so consecutive ids do not yield adjacent
//! tokens), then written in base-N over a shuffled alphabet. An offset
//! of `base^(min_length - 1)` guarantees the minimum token length
//! without breaking reversibility.
//!
//! The codec is an explicitly constructed component — build it once at
//! startup and keep it in the application state.

/// Shuffled token alphabet. Lowercase plus digits, with the easily
/// confused characters (`0`, `o`, `1`, `l`, `i`) left out.
pub const DEFAULT_ALPHABET: &str = "xkq7w2mrj9t4vz8dn3pbc5fgh6y";

/// Minimum token length used for recipe short links.
pub const DEFAULT_MIN_LENGTH: usize = 6;

const MIX: u64 = 0x9E37_79B9_7F4A_7C15;
// Modular inverse of MIX over 2^64: MIX.wrapping_mul(UNMIX) == 1.
const UNMIX: u64 = 0xF1DE_83E1_9937_733D;

#[derive(Debug, Clone)]
pub struct ShortLinkCodec {
    alphabet: Vec<char>,
    min_length: usize,
    offset: u128,
}

impl ShortLinkCodec {
    /// Build a codec over `alphabet` with tokens padded to at least
    /// `min_length` characters.
    ///
    /// # Panics
    ///
    /// Panics if the alphabet has fewer than two characters or contains
    /// duplicates — both are construction-time configuration errors.
    pub fn new(alphabet: &str, min_length: usize) -> Self {
        let alphabet: Vec<char> = alphabet.chars().collect();
        assert!(alphabet.len() >= 2, "short-link alphabet too small");
        for (i, c) in alphabet.iter().enumerate() {
            assert!(
                !alphabet[i + 1..].contains(c),
                "short-link alphabet has duplicate {c:?}"
            );
        }
        let base = alphabet.len() as u128;
        let offset = base.pow(min_length.saturating_sub(1) as u32);
        Self {
            alphabet,
            min_length,
            offset,
        }
    }

    /// Codec configuration used for recipe short links.
    pub fn default_config() -> Self {
        Self::new(DEFAULT_ALPHABET, DEFAULT_MIN_LENGTH)
    }

    /// Encode an identifier into a token of at least `min_length` characters.
    pub fn encode(&self, id: u64) -> String {
        let base = self.alphabet.len() as u128;
        let mut v = u128::from(id.wrapping_mul(MIX)) + self.offset;

        let mut token = Vec::with_capacity(self.min_length);
        loop {
            token.push(self.alphabet[(v % base) as usize]);
            v /= base;
            if v == 0 {
                break;
            }
        }
        token.iter().rev().collect()
    }

    /// Decode a token back into its identifier.
    ///
    /// Returns `None` for anything that is not a canonical token
    /// produced by [`encode`](Self::encode): empty strings, characters
    /// outside the alphabet, values out of range, or non-canonical
    /// spellings (leading pad digits). Never panics.
    pub fn decode(&self, token: &str) -> Option<u64> {
        if token.is_empty() {
            return None;
        }
        let base = self.alphabet.len() as u128;
        let limit = u128::from(u64::MAX) + self.offset;

        let mut v: u128 = 0;
        for c in token.chars() {
            let digit = self.alphabet.iter().position(|&a| a == c)? as u128;
            v = v.checked_mul(base)?.checked_add(digit)?;
            if v > limit {
                return None;
            }
        }

        let mixed = u64::try_from(v.checked_sub(self.offset)?).ok()?;
        let id = mixed.wrapping_mul(UNMIX);

        // Reject non-canonical spellings of the same value.
        if self.encode(id) != token {
            return None;
        }
        Some(id)
    }
}
