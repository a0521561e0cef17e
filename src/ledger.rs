use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, info};

use crate::account::{AccountId, Amount};

/// Static display configuration of the asset. The ledger never computes with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl Default for TokenMetadata {
    fn default() -> Self {
        Self {
            name: "Ashhanai Token".to_string(),
            symbol: "ASHT".to_string(),
            decimals: 18,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LedgerConfig {
    pub metadata: TokenMetadata,
    pub initial_supply: Amount,
    pub admin: AccountId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEvent {
    /// Funds moved from `from` to `to`. `operator` is the account that initiated the move,
    /// which differs from `from` for delegated transfers.
    Transfer {
        from: AccountId,
        to: AccountId,
        value: Amount,
        operator: AccountId,
    },
    Approval {
        owner: AccountId,
        spender: AccountId,
        value: Amount,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: Amount, need: Amount },
    #[error("Insufficient allowance: have {have}, need {need}")]
    InsufficientAllowance { have: Amount, need: Amount },
    #[error("Arithmetic overflow")]
    ArithmeticOverflow,
}

#[derive(Debug)]
enum AllowanceChange {
    Set(Amount),
    Spend(Amount),
}

/// Changes requested by one mutating operation, relative to the state they are applied to,
/// plus the event describing them.
#[derive(Debug)]
struct Posting {
    debit: Option<(AccountId, Amount)>,
    allowance: Option<((AccountId, AccountId), AllowanceChange)>,
    credit: Option<(AccountId, Amount)>,
    event: LedgerEvent,
}

impl Posting {
    fn transfer(caller: AccountId, to: AccountId, amount: Amount) -> Self {
        Self {
            debit: Some((caller, amount)),
            allowance: None,
            credit: Some((to, amount)),
            event: LedgerEvent::Transfer {
                from: caller,
                to,
                value: amount,
                operator: caller,
            },
        }
    }

    fn approve(caller: AccountId, spender: AccountId, amount: Amount) -> Self {
        Self {
            debit: None,
            allowance: Some(((caller, spender), AllowanceChange::Set(amount))),
            credit: None,
            event: LedgerEvent::Approval {
                owner: caller,
                spender,
                value: amount,
            },
        }
    }

    fn transfer_from(caller: AccountId, from: AccountId, to: AccountId, amount: Amount) -> Self {
        Self {
            debit: Some((from, amount)),
            allowance: Some(((from, caller), AllowanceChange::Spend(amount))),
            credit: Some((to, amount)),
            event: LedgerEvent::Transfer {
                from,
                to,
                value: amount,
                operator: caller,
            },
        }
    }
}

#[derive(Debug)]
pub struct Ledger {
    metadata: TokenMetadata,
    total_supply: Amount,
    balances: HashMap<AccountId, Amount>,
    allowances: HashMap<(AccountId, AccountId), Amount>,
    // grows until the host drains it with `take_events`
    events: Vec<LedgerEvent>,
}

impl Ledger {
    /// Creates the ledger and credits the whole supply to `admin`.
    pub fn new(initial_supply: Amount, admin: AccountId) -> Self {
        Self::with_config(LedgerConfig {
            metadata: TokenMetadata::default(),
            initial_supply,
            admin,
        })
    }

    pub fn with_config(config: LedgerConfig) -> Self {
        let LedgerConfig {
            metadata,
            initial_supply,
            admin,
        } = config;
        info!(
            %admin,
            %initial_supply,
            symbol = %metadata.symbol,
            "issuing genesis supply"
        );
        let mut ledger = Self {
            metadata,
            total_supply: initial_supply,
            balances: HashMap::new(),
            allowances: HashMap::new(),
            events: Vec::new(),
        };
        ledger.balances.insert(admin, initial_supply);
        ledger.events.push(LedgerEvent::Transfer {
            from: AccountId::NULL,
            to: admin,
            value: initial_supply,
            operator: admin,
        });
        ledger
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn symbol(&self) -> &str {
        &self.metadata.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.metadata.decimals
    }

    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    pub fn balance_of(&self, account: AccountId) -> Amount {
        self.balances.get(&account).copied().unwrap_or_default()
    }

    pub fn allowance(&self, owner: AccountId, spender: AccountId) -> Amount {
        self.allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or_default()
    }

    /// Accounts with a recorded balance entry, zero entries included.
    pub fn holders(&self) -> impl Iterator<Item = (AccountId, Amount)> + '_ {
        self.balances
            .iter()
            .map(|(account, balance)| (*account, *balance))
    }

    /// Events journaled since the last [`Ledger::take_events`], genesis first.
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Drains the event journal. Hosts forwarding events to observers are expected to
    /// call this after every successful operation, otherwise the journal keeps growing.
    pub fn take_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn transfer(
        &mut self,
        caller: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<bool, LedgerError> {
        self.apply(Posting::transfer(caller, to, amount))
            .inspect_err(|err| debug!(%caller, %to, %amount, %err, "transfer rejected"))?;
        Ok(true)
    }

    pub fn approve(
        &mut self,
        caller: AccountId,
        spender: AccountId,
        amount: Amount,
    ) -> Result<bool, LedgerError> {
        self.apply(Posting::approve(caller, spender, amount))?;
        Ok(true)
    }

    /// Balance is checked before allowance, so when both are short the caller
    /// sees [`LedgerError::InsufficientBalance`].
    pub fn transfer_from(
        &mut self,
        caller: AccountId,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<bool, LedgerError> {
        self.apply(Posting::transfer_from(caller, from, to, amount))
            .inspect_err(|err| {
                debug!(%caller, %from, %to, %amount, %err, "delegated transfer rejected")
            })?;
        Ok(true)
    }

    /// Validates a posting against the current state, then writes it and journals its
    /// event. Nothing is written when validation fails.
    fn apply(&mut self, posting: Posting) -> Result<(), LedgerError> {
        // written in order, so a self-transfer ends on the credited value
        let mut balances = Vec::with_capacity(2);
        if let Some((account, amount)) = posting.debit {
            let have = self.balance_of(account);
            let left = have
                .checked_sub(amount)
                .ok_or(LedgerError::InsufficientBalance { have, need: amount })?;
            balances.push((account, left));
        }
        let allowance = match posting.allowance {
            Some((key, AllowanceChange::Set(value))) => Some((key, value)),
            Some(((owner, spender), AllowanceChange::Spend(amount))) => {
                let have = self.allowance(owner, spender);
                let left = have
                    .checked_sub(amount)
                    .ok_or(LedgerError::InsufficientAllowance { have, need: amount })?;
                Some(((owner, spender), left))
            }
            None => None,
        };
        if let Some((account, amount)) = posting.credit {
            let base = balances
                .iter()
                .find(|(debited, _)| *debited == account)
                .map(|(_, balance)| *balance)
                .unwrap_or_else(|| self.balance_of(account));
            let credited = base
                .checked_add(amount)
                .ok_or(LedgerError::ArithmeticOverflow)?;
            balances.push((account, credited));
        }

        for (account, balance) in balances {
            self.balances.insert(account, balance);
        }
        if let Some((key, value)) = allowance {
            self.allowances.insert(key, value);
        }
        debug!(event = ?posting.event, "posting applied");
        self.events.push(posting.event);
        Ok(())
    }
}
