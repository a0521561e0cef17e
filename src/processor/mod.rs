use thiserror::Error;

use crate::{
    account::{AccountId, Amount},
    command::{CommandFields, CommandKind, LedgerAction, LedgerCommand, LedgerCommandError},
    ledger::{Ledger, LedgerError, LedgerEvent},
};

pub mod in_memory_processor;
pub mod shared_ledger;

#[derive(Debug, Error)]
pub enum LedgerProcessError {
    #[error(transparent)]
    CommandErr(#[from] LedgerCommandError),
    #[error(transparent)]
    LedgerErr(#[from] LedgerError),
}

pub trait LedgerProcessor {
    fn process_command(
        &mut self,
        kind: CommandKind,
        fields: CommandFields<'_>,
    ) -> Result<(), LedgerProcessError>;

    /// Drains events journaled since the previous call.
    fn take_events(&mut self) -> Vec<LedgerEvent>;

    fn balances(&self) -> Vec<(AccountId, Amount)>;
}

/// Runs a parsed command against the ledger.
pub fn execute(ledger: &mut Ledger, command: LedgerCommand) -> Result<bool, LedgerError> {
    let caller = command.caller;
    match command.action {
        LedgerAction::Transfer { to, amount } => ledger.transfer(caller, to, amount),
        LedgerAction::Approve { spender, amount } => ledger.approve(caller, spender, amount),
        LedgerAction::TransferFrom { from, to, amount } => {
            ledger.transfer_from(caller, from, to, amount)
        }
    }
}
