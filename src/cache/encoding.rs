//! Transport encoding for the distributed tier.
//!
//! The shared tier carries text only, so blobs and the serialized
//! listing are hex-encoded on write and decoded on read. The transform
//! is reversible for every byte sequence, including empty ones.

use bytes::Bytes;

use super::error::{LookupError, Stage};

/// Encode raw bytes into the text form the distributed tier stores.
pub fn encode_payload(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decode a distributed-tier payload back into raw bytes.
///
/// A payload that does not decode is a corrupt cache entry, reported
/// against the stage that produced it.
pub fn decode_payload(stage: Stage, text: &str) -> Result<Bytes, LookupError> {
    hex::decode(text)
        .map(Bytes::from)
        .map_err(|err| LookupError::decode(stage, err))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(input: &[u8]) -> Bytes {
        let encoded = encode_payload(input);
        decode_payload(Stage::Distributed, &encoded).expect("round trip")
    }

    #[test]
    fn round_trips_arbitrary_bytes() {
        let input: Vec<u8> = (0..=255).collect();
        assert_eq!(round_trip(&input), Bytes::from(input));
    }

    #[test]
    fn round_trips_empty_payload() {
        assert_eq!(round_trip(b""), Bytes::new());
    }

    #[test]
    fn round_trips_all_zero_payload() {
        let zeros = vec![0u8; 64];
        assert_eq!(round_trip(&zeros), Bytes::from(zeros.clone()));
    }

    #[test]
    fn rejects_corrupt_payloads() {
        let error = decode_payload(Stage::Distributed, "zz").expect_err("not hex");
        assert!(matches!(
            error,
            LookupError::Decode {
                stage: Stage::Distributed,
                ..
            }
        ));

        let error = decode_payload(Stage::Listing, "abc").expect_err("odd length");
        assert!(matches!(
            error,
            LookupError::Decode {
                stage: Stage::Listing,
                ..
            }
        ));
    }
}
