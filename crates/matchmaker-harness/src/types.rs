//! Core types for the scenario harness

use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{HarnessError, HarnessResult};

/// Length in characters of every content address and agent identity.
///
/// Addresses are base58-encoded SHA-256 multihashes (0x12 0x20 prefix +
/// 32 digest bytes), which always encode to exactly 46 characters.
pub const ADDRESS_LEN: usize = 46;

/// Encode a 32-byte digest as a base58 multihash string
fn encode_multihash(digest: &[u8; 32]) -> String {
    let mut multihash = Vec::with_capacity(34);
    multihash.push(0x12);
    multihash.push(0x20);
    multihash.extend_from_slice(digest);
    bs58::encode(multihash).into_string()
}

/// Decode and validate a base58 multihash string
fn decode_multihash(s: &str) -> HarnessResult<[u8; 32]> {
    if s.len() != ADDRESS_LEN {
        return Err(HarnessError::InvalidAddress(format!(
            "expected {} characters, got {}",
            ADDRESS_LEN,
            s.len()
        )));
    }
    let bytes = bs58::decode(s)
        .into_vec()
        .map_err(|e| HarnessError::InvalidAddress(e.to_string()))?;
    if bytes.len() != 34 || bytes[0] != 0x12 || bytes[1] != 0x20 {
        return Err(HarnessError::InvalidAddress(
            "not a sha2-256 multihash".to_string(),
        ));
    }
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&bytes[2..]);
    Ok(digest)
}

/// Content address of a published entry
///
/// Minted by hashing the canonical serialized entry content. Two identical
/// entries always share one address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Mint the address of a piece of entry content
    pub fn from_content(content: &[u8]) -> Self {
        let digest: [u8; 32] = Sha256::digest(content).into();
        Self(encode_multihash(&digest))
    }

    /// Parse and validate an address string
    pub fn parse(s: &str) -> HarnessResult<Self> {
        decode_multihash(s)?;
        Ok(Self(s.to_string()))
    }

    /// The address as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a simulated participant
///
/// Same encoding as [`Address`]: base58 multihash of the agent's (random)
/// key material.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(String);

impl AgentId {
    /// Generate a fresh random agent identity
    pub fn generate() -> Self {
        let mut seed = [0u8; 32];
        rand::rng().fill_bytes(&mut seed);
        let digest: [u8; 32] = Sha256::digest(seed).into();
        Self(encode_multihash(&digest))
    }

    /// Parse and validate an agent identity string
    pub fn parse(s: &str) -> HarnessResult<Self> {
        decode_multihash(s)?;
        Ok(Self(s.to_string()))
    }

    /// The identity as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of one remote call
///
/// Tagged union with exactly one side populated: `{"Ok": value}` on
/// success, `{"Err": value}` on an application-level failure. Transport
/// problems never land here; they surface as [`HarnessError`] instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CallResult {
    Ok(serde_json::Value),
    Err(serde_json::Value),
}

impl CallResult {
    /// The success payload, if this is an `Ok` result
    pub fn ok(&self) -> Option<&serde_json::Value> {
        match self {
            CallResult::Ok(value) => Some(value),
            CallResult::Err(_) => None,
        }
    }

    /// The failure payload, if this is an `Err` result
    pub fn err(&self) -> Option<&serde_json::Value> {
        match self {
            CallResult::Ok(_) => None,
            CallResult::Err(value) => Some(value),
        }
    }

    /// True when the `Err` side is populated
    pub fn is_err(&self) -> bool {
        matches!(self, CallResult::Err(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_address_length() {
        let addr = Address::from_content(b"some entry content");
        assert_eq!(addr.as_str().len(), ADDRESS_LEN);
    }

    #[test]
    fn test_address_deterministic() {
        let a = Address::from_content(b"same bytes");
        let b = Address::from_content(b"same bytes");
        assert_eq!(a, b);
        assert_ne!(a, Address::from_content(b"other bytes"));
    }

    #[test]
    fn test_address_starts_with_qm() {
        // sha2-256 multihash prefix encodes to "Qm" in base58
        let addr = Address::from_content(b"anything");
        assert!(addr.as_str().starts_with("Qm"));
    }

    #[test]
    fn test_address_roundtrip() {
        let addr = Address::from_content(b"entry");
        let parsed = Address::parse(addr.as_str()).unwrap();
        assert_eq!(addr, parsed);
    }

    #[test]
    fn test_address_parse_rejects_wrong_length() {
        assert!(Address::parse("Qmshort").is_err());
    }

    #[test]
    fn test_address_parse_rejects_bad_encoding() {
        // 46 chars of '0', which is not a base58 digit
        let s = "0".repeat(ADDRESS_LEN);
        assert!(Address::parse(&s).is_err());
    }

    #[test]
    fn test_agent_id_length_and_uniqueness() {
        let a = AgentId::generate();
        let b = AgentId::generate();
        assert_eq!(a.as_str().len(), ADDRESS_LEN);
        assert_ne!(a, b);
    }

    #[test]
    fn test_agent_id_roundtrip() {
        let agent = AgentId::generate();
        let parsed = AgentId::parse(agent.as_str()).unwrap();
        assert_eq!(agent, parsed);
        assert!(AgentId::parse("not an identity").is_err());
    }

    #[test]
    fn test_agent_id_serde_plain_string() {
        let agent = AgentId::generate();
        let encoded = serde_json::to_value(&agent).unwrap();
        assert_eq!(encoded, json!(agent.as_str()));
    }

    #[test]
    fn test_call_result_wire_shape() {
        let ok = CallResult::Ok(json!("payload"));
        assert_eq!(serde_json::to_value(&ok).unwrap(), json!({"Ok": "payload"}));

        let err = CallResult::Err(json!({"code": 1}));
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"Err": {"code": 1}})
        );
    }

    #[test]
    fn test_call_result_exactly_one_side() {
        let ok = CallResult::Ok(json!(5));
        assert!(ok.ok().is_some());
        assert!(ok.err().is_none());
        assert!(!ok.is_err());

        let err = CallResult::Err(json!("boom"));
        assert!(err.ok().is_none());
        assert!(err.err().is_some());
        assert!(err.is_err());
    }

    #[test]
    fn test_call_result_rejects_both_sides() {
        let both = json!({"Ok": 1, "Err": 2});
        assert!(serde_json::from_value::<CallResult>(both).is_err());
    }
}
