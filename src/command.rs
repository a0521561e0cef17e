use serde::Deserialize;
use thiserror::Error;

use crate::account::{AccountId, Amount, ParseAccountIdError};

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    Transfer,
    Approve,
    TransferFrom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerAction {
    Transfer {
        to: AccountId,
        amount: Amount,
    },
    Approve {
        spender: AccountId,
        amount: Amount,
    },
    TransferFrom {
        from: AccountId,
        to: AccountId,
        amount: Amount,
    },
}

/// An action together with the account the hosting environment attributed it to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerCommand {
    pub caller: AccountId,
    pub action: LedgerAction,
}

/// Loosely typed command input, as it comes from a batch file.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandFields<'a> {
    pub caller: Option<&'a str>,
    pub from: Option<&'a str>,
    pub to: Option<&'a str>,
    pub spender: Option<&'a str>,
    pub amount: Option<&'a str>,
}

#[derive(Debug, Error)]
pub enum LedgerCommandError {
    #[error("Field `{field}` is required for {kind:?}")]
    FieldRequired {
        kind: CommandKind,
        field: &'static str,
    },
    #[error(transparent)]
    InvalidAccount(#[from] ParseAccountIdError),
    #[error("Amount `{input}` is not a valid unsigned integer for {kind:?}")]
    InvalidAmount { kind: CommandKind, input: String },
}

impl LedgerCommand {
    pub fn parse_command(
        kind: CommandKind,
        fields: CommandFields<'_>,
    ) -> Result<Self, LedgerCommandError> {
        let caller = Self::parse_account(kind, "caller", fields.caller)?;
        let amount = Self::parse_amount(kind, fields.amount)?;
        let action = match kind {
            CommandKind::Transfer => LedgerAction::Transfer {
                to: Self::parse_account(kind, "to", fields.to)?,
                amount,
            },
            CommandKind::Approve => LedgerAction::Approve {
                spender: Self::parse_account(kind, "spender", fields.spender)?,
                amount,
            },
            CommandKind::TransferFrom => LedgerAction::TransferFrom {
                from: Self::parse_account(kind, "from", fields.from)?,
                to: Self::parse_account(kind, "to", fields.to)?,
                amount,
            },
        };
        Ok(Self { caller, action })
    }

    fn parse_account(
        kind: CommandKind,
        field: &'static str,
        value: Option<&str>,
    ) -> Result<AccountId, LedgerCommandError> {
        let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return Err(LedgerCommandError::FieldRequired { kind, field });
        };
        Ok(value.parse::<AccountId>()?)
    }

    fn parse_amount(kind: CommandKind, value: Option<&str>) -> Result<Amount, LedgerCommandError> {
        let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return Err(LedgerCommandError::FieldRequired {
                kind,
                field: "amount",
            });
        };
        Amount::from_dec_str(value).map_err(|_| LedgerCommandError::InvalidAmount {
            kind,
            input: value.to_string(),
        })
    }
}
