/// Account identifiers and the amount type.
pub mod account;

/// The ledger itself: balances, allowances and the fixed total supply.
/// Operations are validated into a posting first and only then applied,
/// so a rejected operation never touches state.
pub mod ledger;

/// Build ledger commands from loosely typed input, later executed by [`processor`].
pub mod command;

/// Command processor interface, plus an owned and a lock-guarded shared implementation.
pub mod processor;

/// CSV front end used by the binary and by the integration tests.
pub mod bin_utils;
