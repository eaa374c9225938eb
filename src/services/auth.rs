use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use uuid::Uuid;

type HmacSha1 = Hmac<Sha1>;

const SESSION_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// Proof that the caller holds a live admin session. Only
/// [`AdminSessions::authorize`] hands these out.
#[derive(Debug)]
pub struct AdminGrant {
    _private: (),
}

#[cfg(test)]
impl AdminGrant {
    pub(crate) fn for_tests() -> Self {
        AdminGrant { _private: () }
    }
}

/// Admin sessions backed by a single shared password.
///
/// Tokens have the form `<nonce>.<sig>` where `sig` is the HMAC-SHA1 of the
/// nonce under the server secret. A token is valid while its nonce is in the
/// active set and younger than the session ttl; logging out removes it.
pub struct AdminSessions {
    secret: Vec<u8>,
    password: String,
    ttl: Duration,
    active: Mutex<HashMap<String, Instant>>,
}

impl AdminSessions {
    pub fn new(secret: &str, password: &str) -> Self {
        Self::with_ttl(secret, password, SESSION_TTL)
    }

    pub fn with_ttl(secret: &str, password: &str, ttl: Duration) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
            password: password.to_string(),
            ttl,
            active: Mutex::new(HashMap::new()),
        }
    }

    fn mac(&self, data: &[u8]) -> Option<HmacSha1> {
        let mut mac = HmacSha1::new_from_slice(&self.secret).ok()?;
        mac.update(data);
        Some(mac)
    }

    /// Returns a fresh session token when `password` matches.
    pub fn login(&self, password: &str) -> Option<String> {
        // constant-time: compare HMAC tags, not the strings
        let expected = self.mac(self.password.as_bytes())?.finalize().into_bytes();
        self.mac(password.as_bytes())?.verify_slice(&expected).ok()?;

        let nonce = Uuid::new_v4().simple().to_string();
        let sig = URL_SAFE_NO_PAD.encode(self.mac(nonce.as_bytes())?.finalize().into_bytes());

        let mut active = self.active.lock().ok()?;
        let before = active.len();
        active.retain(|_, issued| issued.elapsed() < self.ttl);
        if active.len() < before {
            tracing::debug!(expired = before - active.len(), "pruned admin sessions");
        }
        active.insert(nonce.clone(), Instant::now());
        tracing::info!("admin session opened");
        Some(format!("{nonce}.{sig}"))
    }

    pub fn authorize(&self, token: &str) -> Option<AdminGrant> {
        let nonce = self.verified_nonce(token)?;
        let active = self.active.lock().ok()?;
        let issued = active.get(nonce)?;
        (issued.elapsed() < self.ttl).then_some(AdminGrant { _private: () })
    }

    /// Ends the session. Returns false for unknown or forged tokens.
    pub fn logout(&self, token: &str) -> bool {
        let Some(nonce) = self.verified_nonce(token) else {
            return false;
        };
        match self.active.lock() {
            Ok(mut active) => active.remove(nonce).is_some(),
            Err(_) => false,
        }
    }

    fn verified_nonce<'a>(&self, token: &'a str) -> Option<&'a str> {
        let (nonce, sig) = token.split_once('.')?;
        let sig = URL_SAFE_NO_PAD.decode(sig).ok()?;
        self.mac(nonce.as_bytes())?.verify_slice(&sig).ok()?;
        Some(nonce)
    }
}
