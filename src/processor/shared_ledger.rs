use std::sync::Arc;

use parking_lot::RwLock;

use crate::{
    account::{AccountId, Amount},
    command::{CommandFields, CommandKind, LedgerCommand},
    ledger::{Ledger, LedgerError, LedgerEvent},
};

use super::{LedgerProcessError, LedgerProcessor, execute};

/// Cloneable handle to a ledger shared between threads.
///
/// Every mutation holds the write lock for its whole validate and apply step, so
/// queries never see a half applied transfer. Events from every clone land in the same
/// journal; drain it through [`LedgerProcessor::take_events`].
#[derive(Clone)]
pub struct SharedLedger {
    inner: Arc<RwLock<Ledger>>,
}

impl SharedLedger {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ledger)),
        }
    }

    pub fn execute(&self, command: LedgerCommand) -> Result<bool, LedgerError> {
        execute(&mut self.inner.write(), command)
    }

    pub fn transfer(
        &self,
        caller: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<bool, LedgerError> {
        self.inner.write().transfer(caller, to, amount)
    }

    pub fn approve(
        &self,
        caller: AccountId,
        spender: AccountId,
        amount: Amount,
    ) -> Result<bool, LedgerError> {
        self.inner.write().approve(caller, spender, amount)
    }

    pub fn transfer_from(
        &self,
        caller: AccountId,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<bool, LedgerError> {
        self.inner.write().transfer_from(caller, from, to, amount)
    }

    pub fn balance_of(&self, account: AccountId) -> Amount {
        self.inner.read().balance_of(account)
    }

    pub fn allowance(&self, owner: AccountId, spender: AccountId) -> Amount {
        self.inner.read().allowance(owner, spender)
    }

    pub fn total_supply(&self) -> Amount {
        self.inner.read().total_supply()
    }

    /// Runs `f` against a consistent view of the ledger.
    pub fn read<T>(&self, f: impl FnOnce(&Ledger) -> T) -> T {
        f(&self.inner.read())
    }
}

impl LedgerProcessor for SharedLedger {
    fn process_command(
        &mut self,
        kind: CommandKind,
        fields: CommandFields<'_>,
    ) -> Result<(), LedgerProcessError> {
        let cmd = LedgerCommand::parse_command(kind, fields)?;
        self.execute(cmd)?;
        Ok(())
    }

    fn take_events(&mut self) -> Vec<LedgerEvent> {
        self.inner.write().take_events()
    }

    fn balances(&self) -> Vec<(AccountId, Amount)> {
        self.read(|ledger| ledger.holders().collect())
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use crate::command::LedgerAction;

    use super::*;

    const ADMIN: AccountId = AccountId::repeat_byte(0xad);

    #[test]
    fn concurrent_transfers_conserve_supply() {
        let supply = Amount::from(10_000);
        let ledger = SharedLedger::new(Ledger::new(supply, ADMIN));
        let workers: Vec<AccountId> = (1..=8).map(AccountId::repeat_byte).collect();
        for worker in &workers {
            ledger.transfer(ADMIN, *worker, Amount::from(1_000)).unwrap();
        }

        let handles: Vec<_> = workers
            .iter()
            .enumerate()
            .map(|(i, worker)| {
                let ledger = ledger.clone();
                let worker = *worker;
                let next = workers[(i + 1) % workers.len()];
                thread::spawn(move || {
                    for _ in 0..200 {
                        // may fail when a neighbour drained us, which is fine
                        let _ = ledger.transfer(worker, next, Amount::from(7));
                        let total = ledger.read(|l| {
                            l.holders()
                                .fold(Amount::zero(), |sum, (_, balance)| sum + balance)
                        });
                        assert_eq!(total, supply);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let total = ledger
            .balances()
            .into_iter()
            .fold(Amount::zero(), |sum, (_, balance)| sum + balance);
        assert_eq!(total, ledger.total_supply());
    }

    #[test]
    fn clones_share_one_event_journal() {
        let mut ledger = SharedLedger::new(Ledger::new(Amount::from(10), ADMIN));
        let other = ledger.clone();
        let bob = AccountId::repeat_byte(0xb0);
        other.transfer(ADMIN, bob, Amount::from(3)).unwrap();
        other.approve(bob, ADMIN, Amount::from(1)).unwrap();
        assert!(ledger.transfer(bob, ADMIN, Amount::from(4)).is_err());

        let events = ledger.take_events();
        assert_eq!(events.len(), 3);
        assert_eq!(
            events[1],
            LedgerEvent::Transfer {
                from: ADMIN,
                to: bob,
                value: Amount::from(3),
                operator: ADMIN,
            }
        );
        assert!(ledger.take_events().is_empty());
        assert!(other.read(|l| l.events().is_empty()));
    }

    #[test]
    fn delegated_spend_from_many_threads() {
        let ledger = SharedLedger::new(Ledger::new(Amount::from(1_000), ADMIN));
        let spender = AccountId::repeat_byte(0x55);
        let sink = AccountId::repeat_byte(0x66);
        ledger.approve(ADMIN, spender, Amount::from(100)).unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ledger = ledger.clone();
                thread::spawn(move || {
                    (0..50)
                        .filter(|_| {
                            ledger
                                .execute(LedgerCommand {
                                    caller: spender,
                                    action: LedgerAction::TransferFrom {
                                        from: ADMIN,
                                        to: sink,
                                        amount: Amount::one(),
                                    },
                                })
                                .is_ok()
                        })
                        .count()
                })
            })
            .collect();
        let succeeded: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

        // allowance is never overspent
        assert_eq!(succeeded, 100);
        assert_eq!(ledger.allowance(ADMIN, spender), Amount::zero());
        assert_eq!(ledger.balance_of(sink), Amount::from(100));
        assert_eq!(ledger.balance_of(ADMIN), Amount::from(900));
    }
}
