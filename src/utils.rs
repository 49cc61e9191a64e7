use crate::{NotifierConfig, ProjectConfig};
use tracing::error;

// For signature verification
use hex::decode as hex_decode;
use hmac::{Hmac, Mac};
use sha2::Sha256;
type HmacSha256 = Hmac<Sha256>;

/// Header carrying the HMAC of an inbound build event
pub const SIGNATURE_HEADER: &str = "x-signature-256";

/// Verifies a `sha256=<hex>` HMAC signature of `payload` made with `secret`
pub fn verify_signature(secret: &str, payload: &[u8], signature_header: &str) -> bool {
    let Some(signature_hex) = signature_header.strip_prefix("sha256=") else {
        return false;
    };

    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return false,
    };
    mac.update(payload);

    match hex_decode(signature_hex) {
        // verify_slice compares in constant time
        Ok(signature_bytes) => mac.verify_slice(&signature_bytes).is_ok(),
        Err(_) => {
            error!("Signature is not valid hex");
            false
        }
    }
}

/// Signs `payload` the way [`verify_signature`] expects
pub fn sign_payload(secret: &str, payload: &[u8]) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(payload);
    Some(format!("sha256={}", hex::encode(mac.finalize().into_bytes())))
}

/// Finds the project config with the given name.
pub fn find_project<'a>(config: &'a NotifierConfig, name: &str) -> Option<&'a ProjectConfig> {
    config.project.iter().find(|proj| proj.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_round_trip() {
        let body = br#"{"build_id":"1"}"#;
        let header = sign_payload("s3cret", body).unwrap();
        assert!(header.starts_with("sha256="));
        assert!(verify_signature("s3cret", body, &header));
        assert!(!verify_signature("other", body, &header));
        assert!(!verify_signature("s3cret", b"tampered", &header));
    }

    #[test]
    fn malformed_signatures_are_rejected() {
        assert!(!verify_signature("s3cret", b"x", "sha1=abcd"));
        assert!(!verify_signature("s3cret", b"x", "sha256=not-hex"));
        assert!(!verify_signature("s3cret", b"x", ""));
    }

    #[test]
    fn finds_project_by_name() {
        let config = crate::parse_config("[[project]]\nname = \"demo\"\n").unwrap();
        assert!(find_project(&config, "demo").is_some());
        assert!(find_project(&config, "other").is_none());
    }
}
