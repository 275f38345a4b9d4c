// ─── Microsoft Error Codes ───
// Flat mapping from Microsoft/XSTS error responses to a closed set of
// launcher-facing codes. A pure table, not an exception hierarchy.

use serde_json::Value;

/// Error conditions surfaced by the Microsoft authentication endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MicrosoftErrorCode {
    /// Anything we cannot classify.
    Unknown,
    /// The account has no Minecraft profile or does not own the game.
    /// Game Pass accounts that never opened the official launcher also land
    /// here until they log in once and pick a username.
    NoProfile,
    /// The account has no Xbox account yet (XSTS 2148916233).
    NoXboxAccount,
    /// Xbox Live is unavailable or banned in the account's country
    /// (XSTS 2148916235).
    XblBanned,
    /// Child account that must be added to a family first (XSTS 2148916238).
    Under18,
}

const XERR_NO_XBOX_ACCOUNT: u64 = 2_148_916_233;
const XERR_XBL_BANNED: u64 = 2_148_916_235;
const XERR_UNDER_18: u64 = 2_148_916_238;

/// Classify a Microsoft error response body by its `XErr` field.
pub fn decipher_error_code(body: &Value) -> MicrosoftErrorCode {
    match body.get("XErr").and_then(Value::as_u64) {
        Some(XERR_NO_XBOX_ACCOUNT) => MicrosoftErrorCode::NoXboxAccount,
        Some(XERR_XBL_BANNED) => MicrosoftErrorCode::XblBanned,
        Some(XERR_UNDER_18) => MicrosoftErrorCode::Under18,
        _ => MicrosoftErrorCode::Unknown,
    }
}
