use std::{fmt, str::FromStr};

use primitive_types::U256;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Quantity of the smallest indivisible unit of the asset.
pub type Amount = U256;

pub const ACCOUNT_ID_LEN: usize = 20;

/// Opaque holder identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct AccountId([u8; ACCOUNT_ID_LEN]);

#[derive(Debug, Error, PartialEq)]
#[error("Invalid account id `{input}`: {source}")]
pub struct ParseAccountIdError {
    input: String,
    source: hex::FromHexError,
}

impl AccountId {
    /// Reserved sender of the genesis issuance. Nobody can sign for it.
    pub const NULL: AccountId = AccountId([0; ACCOUNT_ID_LEN]);

    pub const fn repeat_byte(byte: u8) -> Self {
        Self([byte; ACCOUNT_ID_LEN])
    }

    pub fn is_null(&self) -> bool {
        *self == Self::NULL
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for AccountId {
    type Err = ParseAccountIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let mut bytes = [0; ACCOUNT_ID_LEN];
        hex::decode_to_slice(digits, &mut bytes).map_err(|source| ParseAccountIdError {
            input: s.to_string(),
            source,
        })?;
        Ok(Self(bytes))
    }
}

impl Serialize for AccountId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Serializes an [`Amount`] as a plain decimal string.
pub fn serialize_amount<S>(amount: &Amount, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(amount)
}
