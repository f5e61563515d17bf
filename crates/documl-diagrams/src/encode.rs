//! PlantUML transport encoding.
//!
//! Diagram descriptions travel inside URL path segments: the text is
//! compressed with raw DEFLATE at maximum effort, then written out in groups
//! of four characters from the alphabet `0-9A-Za-z-_`. A trailing partial
//! group is completed with zero bits, so the output length is always a
//! multiple of four and no `=` padding is ever produced.

use std::io::{Read, Write};

use base64::Engine;
use base64::alphabet::Alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use flate2::Compression;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;

const PLANTUML_ALPHABET: Alphabet =
    match Alphabet::new("0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz-_") {
        Ok(alphabet) => alphabet,
        Err(_) => panic!("invalid PlantUML alphabet"),
    };

const PLANTUML_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &PLANTUML_ALPHABET,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Symbol for a zero-valued sextet.
const ZERO_SYMBOL: char = '0';

/// Error decoding a transport-encoded description.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid character in encoded diagram: {0}")]
    Alphabet(#[from] base64::DecodeError),
    #[error("corrupt compressed diagram: {0}")]
    Inflate(#[from] std::io::Error),
    #[error("decoded diagram is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Encode a diagram description for use in a PlantUML URL.
///
/// The empty description encodes to the empty string.
pub fn encode(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let mut encoder = DeflateEncoder::new(Vec::with_capacity(raw.len()), Compression::best());
    let compressed = encoder
        .write_all(raw.as_bytes())
        .and_then(|()| encoder.finish())
        .expect("deflating into a Vec cannot fail");

    encode_groups(&compressed)
}

/// Map bytes to the alphabet, completing a trailing partial group with
/// zero-valued symbols.
fn encode_groups(bytes: &[u8]) -> String {
    let mut encoded = PLANTUML_ENGINE.encode(bytes);
    while encoded.len() % 4 != 0 {
        encoded.push(ZERO_SYMBOL);
    }
    encoded
}

/// Decode a transport-encoded description back into text.
///
/// Accepts the zero-filled trailing group written by [`encode`]: the extra
/// zero bytes land after the end of the DEFLATE stream and are ignored.
pub fn decode(encoded: &str) -> Result<String, DecodeError> {
    if encoded.is_empty() {
        return Ok(String::new());
    }

    let compressed = PLANTUML_ENGINE.decode(encoded)?;
    let mut bytes = Vec::with_capacity(compressed.len() * 4);
    DeflateDecoder::new(compressed.as_slice()).read_to_end(&mut bytes)?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compressed_len(raw: &str) -> usize {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(raw.as_bytes()).unwrap();
        encoder.finish().unwrap().len()
    }

    #[test]
    fn test_encode_empty() {
        assert_eq!(encode(""), "");
        assert_eq!(decode("").unwrap(), "");
    }

    #[test]
    fn test_encode_uses_plantuml_alphabet() {
        let encoded = encode("@startuml\nAlice -> Bob: hello\n@enduml");
        assert!(
            encoded
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
        assert!(!encoded.contains('='));
    }

    #[test]
    fn test_encode_length_is_full_groups() {
        for raw in ["class A", "A <|-- B", "x", "hide empty fields\nclass Dog {\n}"] {
            let encoded = encode(raw);
            assert_eq!(encoded.len(), compressed_len(raw).div_ceil(3) * 4, "{raw}");
        }
    }

    #[test]
    fn test_encode_groups_zero_fills_partial_group() {
        // Sextets 63, 48, then two zero-filled symbols.
        assert_eq!(encode_groups(&[0xFF]), "_m00");
        // Sextets 63, 63, 60, then one zero-filled symbol.
        assert_eq!(encode_groups(&[0xFF, 0xFF]), "__y0");
        // Boundary values 0, 10, 36, 62 of a full group.
        assert_eq!(encode_groups(&[0x00, 0xA9, 0x3E]), "0Aa-");
    }

    #[test]
    fn test_encode_two_byte_trailing_group() {
        let letters = "abcdefghijklmnopqrstuvwxyz";
        let raw = (1..=letters.len())
            .map(|n| &letters[..n])
            .find(|raw| compressed_len(raw) % 3 == 2)
            .expect("some prefix compresses to 2 mod 3 bytes");

        let encoded = encode(raw);
        assert_eq!(encoded.len(), compressed_len(raw).div_ceil(3) * 4);
        assert!(encoded.ends_with(ZERO_SYMBOL));
        assert_eq!(decode(&encoded).unwrap(), raw);
    }

    #[test]
    fn test_encode_is_deterministic() {
        assert_eq!(encode("class A"), encode("class A"));
        assert_ne!(encode("class A"), encode("class B"));
    }

    #[test]
    fn test_round_trip() {
        let descriptions = [
            "class A",
            "class Animal {\n}\nclass Dog {\n}\nAnimal <|-- Dog",
            "note \"unicode: äöü → ✓\" as N",
            &"interface Very { }\n".repeat(200),
        ];
        for raw in descriptions {
            assert_eq!(decode(&encode(raw)).unwrap(), raw);
        }
    }

    #[test]
    fn test_decode_rejects_foreign_characters() {
        let err = decode("ab+/").unwrap_err();
        assert!(matches!(err, DecodeError::Alphabet(_)));
    }

    #[test]
    fn test_decode_rejects_garbage_stream() {
        assert!(decode("____").is_err());
    }
}
