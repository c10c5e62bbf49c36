/*
 * Responsibility
 * - 公開 ID ↔ 内部 ID の変換 (encode/decode)
 * - sqids の実装詳細をここに閉じ込める (方式変更の影響を局所化)
 *
 * thiserror を使わない理由:
 * - このモジュール内で完結するエラー型なので
 * - 外部に公開する必要がないので
 */
use sqids::{Error as SqidsError, Sqids};
use std::{error::Error, fmt};

pub type Result<T> = std::result::Result<T, IdCodecError>;

#[derive(Debug)]
pub enum IdCodecError {
    /// Construction-time: the configured minimum length does not fit in u8.
    InvalidMinLength { value: usize },
    /// Construction/encode-time failures inside sqids itself.
    Sqids(SqidsError),
    /// Encode-time: store ids are non-negative by construction.
    NegativeId { value: i64 },
    /// Decode-time: the public id did not decode to exactly one number.
    DecodeInvalidFormat,
    /// Decode-time: the decoded number does not fit an i64.
    DecodeOutOfRange,
}

impl fmt::Display for IdCodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdCodecError::InvalidMinLength { value } => {
                write!(f, "SQIDS_MIN_LENGTH must fit in 0..=255, got {}", value)
            }
            IdCodecError::Sqids(e) => write!(f, "sqids error: {}", e),
            IdCodecError::NegativeId { value } => {
                write!(f, "id must be non-negative, got {}", value)
            }
            IdCodecError::DecodeInvalidFormat => write!(f, "invalid public id format"),
            IdCodecError::DecodeOutOfRange => write!(f, "decoded id is out of range"),
        }
    }
}

impl Error for IdCodecError {}

impl From<SqidsError> for IdCodecError {
    fn from(e: SqidsError) -> Self {
        IdCodecError::Sqids(e)
    }
}

#[derive(Clone, Debug)]
pub struct IdCodec {
    sqids: Sqids,
}

impl IdCodec {
    pub fn new(min_length: usize, alphabet: &str) -> Result<Self> {
        let min_length: u8 = min_length
            .try_into()
            .map_err(|_| IdCodecError::InvalidMinLength { value: min_length })?;

        let sqids = Sqids::builder()
            .min_length(min_length)
            .alphabet(alphabet.chars().collect())
            .build()?;

        Ok(Self { sqids })
    }

    pub fn encode(&self, id: i64) -> Result<String> {
        if id < 0 {
            return Err(IdCodecError::NegativeId { value: id });
        }

        Ok(self.sqids.encode(&[id as u64])?)
    }

    pub fn decode(&self, public_id: &str) -> Result<i64> {
        match self.sqids.decode(public_id).as_slice() {
            [n] => i64::try_from(*n).map_err(|_| IdCodecError::DecodeOutOfRange),
            _ => Err(IdCodecError::DecodeInvalidFormat),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> IdCodec {
        IdCodec::new(
            10,
            "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789",
        )
        .unwrap()
    }

    #[test]
    fn encodes_and_decodes_back() {
        let codec = codec();
        for id in [0i64, 1, 42, 9_000_000_000] {
            let public = codec.encode(id).unwrap();
            assert!(public.len() >= 10);
            assert_eq!(codec.decode(&public).unwrap(), id);
        }
    }

    #[test]
    fn rejects_negative_ids() {
        assert!(matches!(
            codec().encode(-1),
            Err(IdCodecError::NegativeId { value: -1 })
        ));
    }

    #[test]
    fn rejects_garbage_public_ids() {
        let codec = codec();
        assert!(matches!(
            codec.decode("!!!not-an-id!!!"),
            Err(IdCodecError::DecodeInvalidFormat)
        ));
        assert!(matches!(
            codec.decode(""),
            Err(IdCodecError::DecodeInvalidFormat)
        ));
    }
}
