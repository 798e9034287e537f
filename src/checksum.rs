//! ETag computation for object-storage payloads and manifests.

use digest::Digest;

use crate::models::Segment;

/// Hex-encoded MD5 digest of `data`, the form Swift reports in `ETag`
/// headers.
pub fn md5_hex(data: &[u8]) -> String {
    let hash = md5::Md5::digest(data);
    hex::encode(hash)
}

/// Expected ETag of a static large object manifest.
///
/// Swift defines it as the MD5 of the concatenated ETag values of the
/// segments, in manifest order. Surrounding quotes on segment etags are
/// ignored. Callers compare this against the tag returned by a manifest
/// PUT to verify acceptance without re-reading the assembled object.
pub fn manifest_etag(segments: &[Segment]) -> String {
    let mut concatenated = String::with_capacity(segments.len() * 32);
    for segment in segments {
        concatenated.push_str(segment.etag.trim_matches('"'));
    }
    md5_hex(concatenated.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn md5_hex_known_vectors() {
        assert_eq!(md5_hex(b""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(md5_hex(b"hello"), "5d41402abc4b2a76b9719d911017c592");
    }

    #[test]
    fn manifest_etag_is_hash_of_concatenated_etags() {
        let segments = vec![
            Segment::new("/videos/part-1", "5d41402abc4b2a76b9719d911017c592", 1024),
            Segment::new("/videos/part-2", "d41d8cd98f00b204e9800998ecf8427e", 512),
        ];

        let expected = md5_hex(
            b"5d41402abc4b2a76b9719d911017c592d41d8cd98f00b204e9800998ecf8427e",
        );
        assert_eq!(manifest_etag(&segments), expected);
    }

    #[test]
    fn manifest_etag_is_deterministic_and_order_sensitive() {
        let a = Segment::new("/c/a", "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", 1);
        let b = Segment::new("/c/b", "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb", 2);

        let forward = vec![a.clone(), b.clone()];
        let reversed = vec![b, a];

        assert_eq!(manifest_etag(&forward), manifest_etag(&forward.clone()));
        assert_ne!(manifest_etag(&forward), manifest_etag(&reversed));
    }

    #[test]
    fn manifest_etag_strips_segment_etag_quotes() {
        let quoted = vec![Segment::new("/c/a", "\"5d41402abc4b2a76b9719d911017c592\"", 1)];
        let bare = vec![Segment::new("/c/a", "5d41402abc4b2a76b9719d911017c592", 1)];

        assert_eq!(manifest_etag(&quoted), manifest_etag(&bare));
    }
}
