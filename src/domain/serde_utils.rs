//! Serde utilities for gifportal.

use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};
use std::fmt;

use crate::domain::entities::Pubkey;

struct PubkeyVisitor;

impl Visitor<'_> for PubkeyVisitor {
    type Value = Pubkey;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a base58 encoded 32-byte public key")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        value.parse().map_err(E::custom)
    }
}

/// Module to (de)serialize an optional public key as a base58 string.
pub mod option_base58 {
    use super::{Deserializer, Pubkey, PubkeyVisitor, Serializer, de, fmt};
    use serde::de::Visitor;

    /// Serializes the key as base58, or nothing when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the serializer fails.
    #[allow(clippy::ref_option)]
    pub fn serialize<S>(value: &Option<Pubkey>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(key) => serializer.serialize_some(&key.to_string()),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes an optional base58 key.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid key.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Pubkey>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OptionVisitor;

        impl<'de> Visitor<'de> for OptionVisitor {
            type Value = Option<Pubkey>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an optional base58 public key")
            }

            fn visit_none<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(None)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                deserializer.deserialize_str(PubkeyVisitor).map(Some)
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                if value.trim().is_empty() {
                    return Ok(None);
                }
                PubkeyVisitor.visit_str(value).map(Some)
            }
        }

        deserializer.deserialize_option(OptionVisitor)
    }
}
