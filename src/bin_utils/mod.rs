//! This module could be a separate crate on its own, to bootstrap [`crate::ledger`] within
//! a binary, but it is also what the integration tests drive, so it lives here.

use std::io::{Read, Write};

use crate::{
    ledger::LedgerEvent,
    processor::{LedgerProcessError, LedgerProcessor},
};
use anyhow::{Context, Result};
use csv_parser::CsvOperationParser;
use csv_printer::{Holder, print_holders};
pub mod csv_parser;
pub mod csv_printer;

pub struct Service<'w, R, W: 'w, P> {
    pub input: R,
    pub output: &'w mut W,
    pub processor: P,
    pub error_printer: Box<dyn FnMut(u64, LedgerProcessError)>,
    pub event_sink: Box<dyn FnMut(&LedgerEvent)>,
}

impl<'w, R, W, P> Service<'w, R, W, P>
where
    R: Read,
    W: Write + 'w,
    P: LedgerProcessor,
{
    pub fn run(mut self) -> Result<()> {
        let parser = CsvOperationParser::new(self.input);

        // genesis goes out before anything else
        for event in self.processor.take_events() {
            (self.event_sink)(&event);
        }

        for (line, row) in parser {
            let row = row.with_context(|| format!("Malformed operation at line {line}"))?;
            match self.processor.process_command(row.kind, row.fields()) {
                Ok(()) => {
                    for event in self.processor.take_events() {
                        (self.event_sink)(&event);
                    }
                }
                Err(err) => (self.error_printer)(line, err),
            }
        }

        let mut holders = self.processor.balances();
        holders.sort_by_key(|(account, _)| *account);
        print_holders(
            self.output,
            holders
                .into_iter()
                .map(|(account, balance)| Holder { account, balance }),
        )
    }
}
