//! Conversion between raw artifact bytes and 256-bit words.
//!
//! A buffer is cut into 32-byte chunks in file order and each chunk becomes one
//! `U256`. Whether byte 0 of a chunk is the most or the least significant byte
//! is decided per call by [`ByteOrder`].

use std::fmt;
use std::str::FromStr;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::error::{Result, VerifierError};

/// Bytes per encoded word.
pub const WORD_BYTES: usize = 32;

/// One encoded artifact, ready to be passed as a `uint256[]` argument.
pub type EncodedWords = Vec<U256>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ByteOrder {
    #[serde(rename = "be", alias = "big_endian")]
    BigEndian,
    #[serde(rename = "le", alias = "little_endian")]
    LittleEndian,
}

impl ByteOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            ByteOrder::BigEndian => "be",
            ByteOrder::LittleEndian => "le",
        }
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ByteOrder {
    type Err = VerifierError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "be" | "big_endian" => Ok(ByteOrder::BigEndian),
            "le" | "little_endian" => Ok(ByteOrder::LittleEndian),
            other => Err(VerifierError::InvalidConfig(format!(
                "Unknown byte order: {} (expected be or le)",
                other
            ))),
        }
    }
}

/// Decode a single 32-byte chunk.
pub fn decode_word(chunk: &[u8; WORD_BYTES], order: ByteOrder) -> U256 {
    match order {
        ByteOrder::BigEndian => U256::from_be_bytes(*chunk),
        ByteOrder::LittleEndian => U256::from_le_bytes(*chunk),
    }
}

/// Inverse of [`decode_word`].
pub fn encode_word(word: U256, order: ByteOrder) -> [u8; WORD_BYTES] {
    match order {
        ByteOrder::BigEndian => word.to_be_bytes::<WORD_BYTES>(),
        ByteOrder::LittleEndian => word.to_le_bytes::<WORD_BYTES>(),
    }
}

/// Encode a whole buffer into words, one per 32-byte chunk.
///
/// Fails with [`VerifierError::MalformedInput`] before decoding anything when
/// the buffer has trailing bytes that do not fill a word.
pub fn encode(buffer: &[u8], order: ByteOrder) -> Result<EncodedWords> {
    if buffer.len() % WORD_BYTES != 0 {
        return Err(VerifierError::MalformedInput { len: buffer.len() });
    }

    let words = buffer
        .chunks_exact(WORD_BYTES)
        .map(|chunk| {
            let mut word = [0u8; WORD_BYTES];
            word.copy_from_slice(chunk);
            decode_word(&word, order)
        })
        .collect();

    Ok(words)
}

/// Turn words back into the byte stream they were decoded from.
pub fn decode(words: &[U256], order: ByteOrder) -> Vec<u8> {
    let mut out = Vec::with_capacity(words.len() * WORD_BYTES);
    for word in words {
        out.extend_from_slice(&encode_word(*word, order));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    // Reference decoders that accumulate byte by byte in 256-bit arithmetic.
    fn accumulate_be(chunk: &[u8; 32]) -> U256 {
        let mut v = U256::ZERO;
        for b in chunk {
            v = v * U256::from(256u64) + U256::from(*b);
        }
        v
    }

    fn accumulate_le(chunk: &[u8; 32]) -> U256 {
        let mut v = U256::ZERO;
        let mut shift = U256::from(1u64);
        for (j, b) in chunk.iter().enumerate() {
            v += shift * U256::from(*b);
            if j + 1 < chunk.len() {
                shift *= U256::from(256u64);
            }
        }
        v
    }

    fn sample_chunk(seed: u8) -> [u8; 32] {
        let mut chunk = [0u8; 32];
        for (i, b) in chunk.iter_mut().enumerate() {
            *b = seed.wrapping_mul(31).wrapping_add(i as u8 * 7);
        }
        chunk
    }

    #[test]
    fn test_trailing_one_big_endian_is_one() {
        let mut chunk = [0u8; 32];
        chunk[31] = 0x01;
        assert_eq!(decode_word(&chunk, ByteOrder::BigEndian), U256::from(1u64));
        assert_eq!(
            decode_word(&chunk, ByteOrder::LittleEndian),
            U256::from(1u64) << 248usize
        );
    }

    #[test]
    fn test_leading_one_little_endian_is_one() {
        let mut chunk = [0u8; 32];
        chunk[0] = 0x01;
        assert_eq!(decode_word(&chunk, ByteOrder::LittleEndian), U256::from(1u64));
        assert_eq!(
            decode_word(&chunk, ByteOrder::BigEndian),
            U256::from(1u64) << 248usize
        );
    }

    #[test]
    fn test_all_ff_is_max_in_both_orders() {
        let chunk = [0xffu8; 32];
        assert_eq!(decode_word(&chunk, ByteOrder::BigEndian), U256::MAX);
        assert_eq!(decode_word(&chunk, ByteOrder::LittleEndian), U256::MAX);
    }

    #[test]
    fn test_matches_bytewise_accumulation() {
        for seed in 0..16u8 {
            let chunk = sample_chunk(seed);
            assert_eq!(decode_word(&chunk, ByteOrder::BigEndian), accumulate_be(&chunk));
            assert_eq!(decode_word(&chunk, ByteOrder::LittleEndian), accumulate_le(&chunk));
        }
        let max = [0xffu8; 32];
        assert_eq!(accumulate_le(&max), U256::MAX);
    }

    #[test]
    fn test_big_endian_equals_little_endian_of_reversed_chunk() {
        for seed in 0..16u8 {
            let chunk = sample_chunk(seed);
            let mut reversed = chunk;
            reversed.reverse();
            assert_eq!(
                decode_word(&chunk, ByteOrder::BigEndian),
                decode_word(&reversed, ByteOrder::LittleEndian)
            );
        }
    }

    #[test]
    fn test_orders_differ_on_non_palindromic_chunk() {
        let chunk = sample_chunk(3);
        assert_ne!(
            decode_word(&chunk, ByteOrder::BigEndian),
            decode_word(&chunk, ByteOrder::LittleEndian)
        );
    }

    #[test]
    fn test_single_byte_difference_gives_distinct_words() {
        let base = sample_chunk(9);
        for order in [ByteOrder::BigEndian, ByteOrder::LittleEndian] {
            let reference = decode_word(&base, order);
            for i in 0..32 {
                let mut changed = base;
                changed[i] ^= 0x01;
                assert_ne!(decode_word(&changed, order), reference, "byte {} order {}", i, order);
            }
        }
    }

    #[test]
    fn test_encode_two_words_in_order() {
        let mut buffer = vec![0u8; 64];
        buffer[31] = 0x01;
        buffer[63] = 0x02;
        let words = encode(&buffer, ByteOrder::BigEndian).unwrap();
        assert_eq!(words, vec![U256::from(1u64), U256::from(2u64)]);
    }

    #[test]
    fn test_encode_length_is_buffer_over_32() {
        for n in [0usize, 1, 2, 5, 17] {
            let buffer = vec![0xabu8; n * 32];
            assert_eq!(encode(&buffer, ByteOrder::BigEndian).unwrap().len(), n);
            assert_eq!(encode(&buffer, ByteOrder::LittleEndian).unwrap().len(), n);
        }
    }

    #[test]
    fn test_encode_rejects_ragged_buffer() {
        for len in [1usize, 31, 33, 63, 65] {
            let buffer = vec![0u8; len];
            match encode(&buffer, ByteOrder::BigEndian) {
                Err(VerifierError::MalformedInput { len: reported }) => assert_eq!(reported, len),
                other => panic!("expected MalformedInput, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_word_round_trip() {
        for order in [ByteOrder::BigEndian, ByteOrder::LittleEndian] {
            for seed in 0..8u8 {
                let chunk = sample_chunk(seed);
                assert_eq!(encode_word(decode_word(&chunk, order), order), chunk);
            }
        }
    }

    #[test]
    fn test_buffer_round_trip() {
        let buffer: Vec<u8> = (0..96u32).map(|i| (i * 13 % 251) as u8).collect();
        for order in [ByteOrder::BigEndian, ByteOrder::LittleEndian] {
            let words = encode(&buffer, order).unwrap();
            assert_eq!(decode(&words, order), buffer);
        }
    }

    #[test]
    fn test_byte_order_parse_and_display() {
        assert_eq!("be".parse::<ByteOrder>().unwrap(), ByteOrder::BigEndian);
        assert_eq!("LE".parse::<ByteOrder>().unwrap(), ByteOrder::LittleEndian);
        assert_eq!("big_endian".parse::<ByteOrder>().unwrap(), ByteOrder::BigEndian);
        assert_eq!(ByteOrder::LittleEndian.to_string(), "le");
        assert!("middle".parse::<ByteOrder>().is_err());
    }

    #[test]
    fn test_byte_order_serde() {
        let json = serde_json::to_value(ByteOrder::BigEndian).unwrap();
        assert_eq!(json, "be");
        let order: ByteOrder = serde_json::from_str(r#""little_endian""#).unwrap();
        assert_eq!(order, ByteOrder::LittleEndian);
    }
}
