use crate::{
    account::{AccountId, Amount},
    command::{CommandFields, CommandKind, LedgerCommand},
    ledger::{Ledger, LedgerEvent},
};

use super::{LedgerProcessError, LedgerProcessor, execute};

pub struct InMemoryLedgerProcessor {
    pub ledger: Ledger,
}

impl InMemoryLedgerProcessor {
    pub fn new(ledger: Ledger) -> Self {
        Self { ledger }
    }
}

impl LedgerProcessor for InMemoryLedgerProcessor {
    fn process_command(
        &mut self,
        kind: CommandKind,
        fields: CommandFields<'_>,
    ) -> Result<(), LedgerProcessError> {
        let cmd = LedgerCommand::parse_command(kind, fields)?;
        execute(&mut self.ledger, cmd)?;
        Ok(())
    }

    fn take_events(&mut self) -> Vec<LedgerEvent> {
        self.ledger.take_events()
    }

    fn balances(&self) -> Vec<(AccountId, Amount)> {
        self.ledger.holders().collect()
    }
}
