//! Digest value and its text renderings
//!
//! The digest is rendered most-significant byte first, which means walking
//! the finalized block from index 19 down to index 0.

use super::block::{Block, BLOCK_BYTES};
use crate::error::{QuickXorError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Length of a hex-rendered digest
pub const HEX_LEN: usize = BLOCK_BYTES * 2;

/// Text encoding used when printing digests
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DigestEncoding {
    /// Lowercase hexadecimal (reference tool output)
    #[default]
    Hex,
    /// Standard base64 (cloud storage API form)
    Base64,
}

impl DigestEncoding {
    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Hex => "hex",
            Self::Base64 => "base64",
        }
    }
}

/// Final 160-bit QuickXorHash value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Digest(Block);

impl Digest {
    /// Wrap a finalized block
    pub const fn from_block(block: Block) -> Self {
        Self(block)
    }

    /// The finalized block in internal byte order
    pub fn block(&self) -> &Block {
        &self.0
    }

    /// Bytes in display order (most significant first)
    pub fn display_bytes(&self) -> [u8; BLOCK_BYTES] {
        self.0.reverse_bytes().into_bytes()
    }

    /// Build a digest from display-order bytes
    pub fn from_display_bytes(bytes: [u8; BLOCK_BYTES]) -> Self {
        Self(Block::from_bytes(bytes).reverse_bytes())
    }

    /// Lowercase hex rendering
    pub fn to_hex(&self) -> String {
        hex::encode(self.display_bytes())
    }

    /// Base64 rendering of the display-order bytes
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.display_bytes())
    }

    /// Render with the requested encoding
    pub fn encode(&self, encoding: DigestEncoding) -> String {
        match encoding {
            DigestEncoding::Hex => self.to_hex(),
            DigestEncoding::Base64 => self.to_base64(),
        }
    }

    /// Parse a 40-character hex digest
    pub fn from_hex(text: &str) -> Result<Self> {
        let bytes = hex::decode(text.trim())
            .map_err(|e| QuickXorError::InvalidDigest(format!("{}: {}", text, e)))?;
        Self::from_slice(text, &bytes)
    }

    /// Parse a base64 digest
    pub fn from_base64(text: &str) -> Result<Self> {
        let bytes = STANDARD
            .decode(text.trim())
            .map_err(|e| QuickXorError::InvalidDigest(format!("{}: {}", text, e)))?;
        Self::from_slice(text, &bytes)
    }

    fn from_slice(text: &str, bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; BLOCK_BYTES] = bytes.try_into().map_err(|_| {
            QuickXorError::InvalidDigest(format!(
                "{}: expected {} bytes, got {}",
                text,
                BLOCK_BYTES,
                bytes.len()
            ))
        })?;
        Ok(Self::from_display_bytes(bytes))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0.as_bytes().iter().rev() {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl FromStr for Digest {
    type Err = QuickXorError;

    /// Accepts either hex or base64, told apart by length
    fn from_str(s: &str) -> Result<Self> {
        if s.trim().len() == HEX_LEN {
            Self::from_hex(s)
        } else {
            Self::from_base64(s)
        }
    }
}

impl From<Block> for Digest {
    fn from(block: Block) -> Self {
        Self(block)
    }
}

impl Serialize for Digest {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
