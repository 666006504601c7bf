//! Codec - release payload のデコード
//!
//! # デコードフロー
//! 1. base64（標準アルファベット）をデコード
//! 2. 先頭 3 バイトが gzip magic なら展開（圧縮導入前の payload はそのまま）
//! 3. protobuf（`hapi.release.Release`）としてデシリアライズ
//! 4. namespace と manifest を ReleaseRecord に射影
//!
//! どの段階で失敗しても全体が失敗します。I/O はしません。

mod proto;

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use flate2::Compression as GzLevel;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use prost::Message;
use std::io::{self, Read, Write};

use crate::domain::{DecodeError, ReleaseRecord};

pub use self::proto::ReleaseProto;

/// gzip magic (ID1, ID2) followed by CM=8 (deflate).
///
/// This exact 3-byte prefix is the discriminator; stored data written before
/// compression was introduced never starts with it.
pub const GZIP_MAGIC: [u8; 3] = [0x1f, 0x8b, 0x08];

/// Whether [`encode`] gzips the record before base64.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Gzip,
    None,
}

/// Decode one raw release payload.
pub fn decode(raw: &str) -> Result<ReleaseRecord, DecodeError> {
    let bytes = BASE64
        .decode(raw)
        .map_err(|e| DecodeError::InvalidEncoding(e.to_string()))?;

    if bytes.len() < GZIP_MAGIC.len() {
        return Err(DecodeError::InvalidEncoding(format!(
            "payload too short: {} bytes",
            bytes.len()
        )));
    }

    let bytes = if bytes[..GZIP_MAGIC.len()] == GZIP_MAGIC {
        gunzip(&bytes)?
    } else {
        bytes
    };

    let release = ReleaseProto::decode(bytes.as_slice())
        .map_err(|e| DecodeError::MalformedRecord(e.to_string()))?;

    if release.namespace.is_empty() {
        return Err(DecodeError::MalformedRecord(
            "release has no namespace".to_string(),
        ));
    }

    Ok(ReleaseRecord {
        name: release.name,
        version: release.version,
        namespace: release.namespace,
        manifest: release.manifest,
    })
}

/// Encode a record the way Tiller stores it: protobuf, optional gzip, base64.
///
/// Used to build fixtures for the in-memory cluster and tests.
pub fn encode(record: &ReleaseRecord, compression: Compression) -> io::Result<String> {
    let bytes = ReleaseProto {
        name: record.name.clone(),
        manifest: record.manifest.clone(),
        version: record.version,
        namespace: record.namespace.clone(),
    }
    .encode_to_vec();

    Ok(match compression {
        Compression::None => BASE64.encode(bytes),
        Compression::Gzip => BASE64.encode(gzip(&bytes)?),
    })
}

fn gunzip(bytes: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let mut out = Vec::new();
    GzDecoder::new(bytes)
        .read_to_end(&mut out)
        .map_err(DecodeError::CorruptCompression)?;
    Ok(out)
}

fn gzip(bytes: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), GzLevel::best());
    encoder.write_all(bytes)?;
    encoder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const MANIFEST: &str = "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: myapp\n";

    fn record() -> ReleaseRecord {
        ReleaseRecord::new("prod", MANIFEST)
            .with_name("myapp")
            .with_version(3)
    }

    #[test]
    fn decodes_gzip_payload() {
        let raw = encode(&record(), Compression::Gzip).unwrap();
        let decoded = decode(&raw).unwrap();
        assert_eq!(decoded, record());
    }

    #[test]
    fn decodes_uncompressed_payload() {
        let raw = encode(&record(), Compression::None).unwrap();
        let bytes = BASE64.decode(&raw).unwrap();
        assert_ne!(bytes[..3], GZIP_MAGIC);

        let decoded = decode(&raw).unwrap();
        assert_eq!(decoded.namespace, "prod");
        assert_eq!(decoded.manifest, MANIFEST);
    }

    #[test]
    fn compressed_payload_starts_with_magic() {
        let raw = encode(&record(), Compression::Gzip).unwrap();
        let bytes = BASE64.decode(&raw).unwrap();
        assert_eq!(bytes[..3], GZIP_MAGIC);
    }

    #[test]
    fn encode_writes_a_complete_gzip_stream() {
        let raw = encode(&record(), Compression::Gzip).unwrap();
        let unpacked = gunzip(&BASE64.decode(&raw).unwrap()).unwrap();
        let expected = ReleaseProto {
            name: "myapp".to_string(),
            manifest: MANIFEST.to_string(),
            version: 3,
            namespace: "prod".to_string(),
        }
        .encode_to_vec();
        assert_eq!(unpacked, expected);
    }

    #[test]
    fn decoding_is_deterministic() {
        let raw = encode(&record(), Compression::Gzip).unwrap();
        let first = decode(&raw).unwrap();
        let second = decode(&raw).unwrap();
        assert_eq!(first, second);
    }

    #[rstest]
    #[case::ascii("default", "kind: Service\n")]
    #[case::empty_manifest("kube-public", "")]
    #[case::unicode("prod", "data:\n  greeting: こんにちは\n")]
    #[case::large("prod", &"- item: value\n".repeat(10_000))]
    fn gzip_round_trip(#[case] namespace: &str, #[case] manifest: &str) {
        let original = ReleaseRecord::new(namespace, manifest);
        let decoded = decode(&encode(&original, Compression::Gzip).unwrap()).unwrap();
        assert_eq!(decoded.namespace, namespace);
        assert_eq!(decoded.manifest, manifest);
    }

    #[rstest]
    #[case::empty("")]
    #[case::one_byte("AA==")]
    #[case::two_bytes("AAA=")]
    fn short_buffer_is_invalid_encoding(#[case] raw: &str) {
        let err = decode(raw).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidEncoding(_)), "{err:?}");
    }

    #[test]
    fn bad_base64_is_invalid_encoding() {
        let err = decode("not base64 at all!").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidEncoding(_)));
    }

    #[test]
    fn truncated_gzip_is_corrupt_compression() {
        let raw = BASE64.encode([0x1f, 0x8b, 0x08, 0x00, 0x01]);
        let err = decode(&raw).unwrap_err();
        assert!(matches!(err, DecodeError::CorruptCompression(_)), "{err:?}");
    }

    #[test]
    fn garbage_bytes_are_malformed_record() {
        // 0xff だけの varint は終端しない
        let raw = BASE64.encode([0xff, 0xff, 0xff, 0xff]);
        let err = decode(&raw).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedRecord(_)), "{err:?}");
    }

    #[test]
    fn gzipped_garbage_is_malformed_record() {
        let raw = BASE64.encode(gzip(&[0xff, 0xff, 0xff, 0xff]).unwrap());
        let err = decode(&raw).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedRecord(_)), "{err:?}");
    }

    #[test]
    fn missing_namespace_is_malformed_record() {
        let raw = encode(&ReleaseRecord::new("", MANIFEST), Compression::Gzip).unwrap();
        let err = decode(&raw).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedRecord(_)));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        // tag 2 (info) の length-delimited フィールドを先頭に足す
        let mut bytes = vec![0x12, 0x02, 0x08, 0x01];
        bytes.extend(
            ReleaseProto {
                name: "myapp".to_string(),
                manifest: MANIFEST.to_string(),
                version: 1,
                namespace: "prod".to_string(),
            }
            .encode_to_vec(),
        );
        let decoded = decode(&BASE64.encode(bytes)).unwrap();
        assert_eq!(decoded.name, "myapp");
        assert_eq!(decoded.namespace, "prod");
    }
}
