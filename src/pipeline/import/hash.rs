use base64::Engine;
use sha2::{Digest, Sha256};

/// SHA-256 of the raw bytes, base64-encoded.
pub fn compute_content_hash(bytes: &[u8]) -> String {
    let hash = Sha256::digest(bytes);
    base64::engine::general_purpose::STANDARD.encode(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_hash_deterministic() {
        let bytes = "Glicemia: 102 mg/dL".as_bytes().to_vec();
        let hash1 = compute_content_hash(&bytes);
        let hash2 = compute_content_hash(b"Glicemia: 102 mg/dL");
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 44);
    }

    #[test]
    fn different_content_different_hash() {
        assert_ne!(
            compute_content_hash(b"Peso: 74 kg"),
            compute_content_hash(b"Peso: 47 kg")
        );
    }

    #[test]
    fn known_digest() {
        // SHA-256("") base64
        assert_eq!(
            compute_content_hash(b""),
            "47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU="
        );
    }
}
