use serde::{Deserialize, Serialize};

/// A fixed-length strand of signed bytes.
///
/// All bytes but the last encode network coefficients; the last byte encodes
/// the hue of the phenotype.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dna {
    pub data: Vec<i8>,
}

impl Dna {
    /// Creates an all-zero strand of `len` bytes.
    #[must_use]
    pub fn zeroed(len: usize) -> Self {
        Self { data: vec![0; len] }
    }

    #[must_use]
    pub fn from_bytes(data: Vec<i8>) -> Self {
        Self { data }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Length of the strand in bits.
    #[must_use]
    pub fn bit_len(&self) -> usize {
        self.data.len() * 8
    }

    /// Reads bit `i` (least significant bit of each byte first).
    #[must_use]
    pub fn bit(&self, i: usize) -> u8 {
        ((self.data[i / 8] as u8) >> (i % 8)) & 1
    }

    /// Sets bit `i` to one.
    pub fn set_bit(&mut self, i: usize) {
        self.data[i / 8] = ((self.data[i / 8] as u8) | (1 << (i % 8))) as i8;
    }
}
