use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::RngCore;

/// Random bytes behind each service secret
const SECRET_BYTES: usize = 32;

/// Fresh high-entropy secret, URL-safe base64 without padding
pub fn generate_service_secret() -> String {
    let mut bytes = [0u8; SECRET_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
