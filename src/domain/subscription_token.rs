use rand::rngs::OsRng;
use rand::RngCore;

const DEFAULT_TOKEN_BYTES: usize = 32;

/// What a token authorizes its bearer to do. Every token is single use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Confirm,
    Unsubscribe,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Confirm => "confirm",
            TokenKind::Unsubscribe => "unsubscribe",
        }
    }
}

impl TryFrom<String> for TokenKind {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_str() {
            "confirm" => Ok(Self::Confirm),
            "unsubscribe" => Ok(Self::Unsubscribe),
            other => Err(format!("{} is not a known token type.", other)),
        }
    }
}

/// Opaque, URL-safe credential sent to subscribers inside links.
#[derive(Clone, PartialEq, Eq)]
pub struct SubscriptionToken(String);

impl SubscriptionToken {
    pub fn generate() -> SubscriptionToken {
        Self::generate_with_len(DEFAULT_TOKEN_BYTES)
    }

    /// `n` bytes from the OS CSPRNG, base64url encoded without padding.
    pub fn generate_with_len(n: usize) -> SubscriptionToken {
        let mut bytes = vec![0u8; n];
        OsRng.fill_bytes(&mut bytes);
        Self(base64::encode_config(&bytes, base64::URL_SAFE_NO_PAD))
    }
}

impl AsRef<str> for SubscriptionToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SubscriptionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SubscriptionToken([REDACTED])")
    }
}
