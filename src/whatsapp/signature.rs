// X-Hub-Signature-256 verification for Meta webhook deliveries

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Checks an `X-Hub-Signature-256` header value (`sha256=<hex>`) against
/// the raw request body. Comparison happens inside `verify_slice`, which
/// is constant-time.
pub fn verify(secret: &[u8], payload: &[u8], signature_header: &str) -> bool {
    let Some(signature_hex) = signature_header.strip_prefix("sha256=") else {
        return false;
    };

    let Ok(signature) = hex::decode(signature_hex) else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret) else {
        return false;
    };

    mac.update(payload);
    mac.verify_slice(&signature).is_ok()
}

/// Produces the header value Meta would send for `payload`.
/// Used to sign simulated deliveries in tests and tooling.
pub fn sign(secret: &[u8], payload: &[u8]) -> String {
    let mut mac: HmacSha256 =
        HmacSha256::new_from_slice(secret).expect("HMAC accepts keys of any length");
    mac.update(payload);
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}
