use std::io::Read;

use crate::command::{CommandFields, CommandKind};
use csv::{DeserializeRecordsIntoIter, Trim};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Operation {
    #[serde(rename = "type")]
    pub kind: CommandKind,
    pub caller: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub spender: Option<String>,
    pub amount: Option<String>,
}

impl Operation {
    pub fn fields(&self) -> CommandFields<'_> {
        CommandFields {
            caller: self.caller.as_deref(),
            from: self.from.as_deref(),
            to: self.to.as_deref(),
            spender: self.spender.as_deref(),
            amount: self.amount.as_deref(),
        }
    }
}

/// Parses a ledger operation list in CSV format, yielding each row with its line number.
pub struct CsvOperationParser<R> {
    iter: DeserializeRecordsIntoIter<R, Operation>,
}

impl<R> CsvOperationParser<R>
where
    R: Read,
{
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(source);

        Self {
            iter: reader.into_deserialize(),
        }
    }
}

impl<R> Iterator for CsvOperationParser<R>
where
    R: Read,
{
    type Item = (u64, csv::Result<Operation>);

    fn next(&mut self) -> Option<Self::Item> {
        let curr_line = self.iter.reader().position().line();
        self.iter.next().map(|row| (curr_line, row))
    }
}
