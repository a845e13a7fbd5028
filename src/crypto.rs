use {
    crate::{constants::SHA256_OUTPUT_LEN, PresignError},
    hmac::{Hmac, Mac},
    sha2::{Digest, Sha256},
};

#[cfg(test)]
thread_local! {
    /// Number of hash/HMAC primitive invocations made by the current thread.
    static PRIMITIVE_CALLS: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}

#[cfg(test)]
#[inline(always)]
fn record_primitive_call() {
    PRIMITIVE_CALLS.with(|calls| calls.set(calls.get() + 1));
}

#[cfg(not(test))]
#[inline(always)]
fn record_primitive_call() {}

/// Number of hash/HMAC primitive invocations made by the current thread so far.
#[cfg(test)]
pub(crate) fn primitive_calls() -> usize {
    PRIMITIVE_CALLS.with(|calls| calls.get())
}

/// Wrapper function to form a HMAC-SHA256 operation, returning the raw (not hex) digest.
#[inline(always)]
pub(crate) fn hmac_sha256(key: &[u8], value: &[u8]) -> Result<[u8; SHA256_OUTPUT_LEN], PresignError> {
    record_primitive_call();
    let mut mac = Hmac::<Sha256>::new_from_slice(key)
        .map_err(|e| PresignError::CryptographicFailure(format!("Unable to key HMAC-SHA256: {}", e)))?;
    mac.update(value);
    let mut result = [0; SHA256_OUTPUT_LEN];
    result.copy_from_slice(mac.finalize().into_bytes().as_slice());
    Ok(result)
}

#[inline(always)]
pub(crate) fn sha256(value: &[u8]) -> [u8; SHA256_OUTPUT_LEN] {
    record_primitive_call();
    let mut result = [0; SHA256_OUTPUT_LEN];
    result.copy_from_slice(Sha256::digest(value).as_slice());
    result
}

#[cfg(test)]
mod tests {
    use super::{hmac_sha256, primitive_calls, sha256};

    #[test_log::test]
    fn test_sha256_empty() {
        assert_eq!(hex::encode(sha256(b"")), "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855");
    }

    #[test_log::test]
    fn test_hmac_rfc4231_case2() {
        let tag = hmac_sha256(b"Jefe", b"what do ya want for nothing?").unwrap();
        assert_eq!(hex::encode(tag), "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843");
    }

    #[test_log::test]
    fn test_primitive_calls_counted() {
        let before = primitive_calls();
        let _ = sha256(b"abc");
        let _ = hmac_sha256(b"key", b"abc").unwrap();
        assert_eq!(primitive_calls(), before + 2);
    }
}
