use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::models::user::Role;

type HmacSha256 = Hmac<Sha256>;

/// Assertions older or newer than this many seconds are refused.
pub const MAX_CLOCK_SKEW_SECS: i64 = 300;

fn canonical_message(user_id: Uuid, email: &str, role: Role, issued_at: i64) -> String {
    format!("{}:{}:{}:{}", user_id, email, role, issued_at)
}

/// Hex HMAC-SHA256 over `{userId}:{email}:{role}:{issuedAt}`.
pub fn sign_exchange(
    secret: &str,
    user_id: Uuid,
    email: &str,
    role: Role,
    issued_at: i64,
) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(canonical_message(user_id, email, role, issued_at).as_bytes());
    Some(hex::encode(mac.finalize().into_bytes()))
}

pub fn verify_exchange(
    secret: &str,
    user_id: Uuid,
    email: &str,
    role: Role,
    issued_at: i64,
    signature: &str,
    now: i64,
) -> bool {
    if now.abs_diff(issued_at) > MAX_CLOCK_SKEW_SECS.unsigned_abs() {
        return false;
    }
    let Some(expected) = sign_exchange(secret, user_id, email, role, issued_at) else {
        return false;
    };
    let provided = signature.trim().to_ascii_lowercase();
    expected.as_bytes().ct_eq(provided.as_bytes()).into()
}
