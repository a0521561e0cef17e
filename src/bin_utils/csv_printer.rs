use std::io::Write;

use crate::account::{AccountId, Amount, serialize_amount};
use csv::Writer;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Holder {
    pub account: AccountId,
    #[serde(serialize_with = "serialize_amount")]
    pub balance: Amount,
}

pub fn print_holders<W>(output: &mut W, holders: impl Iterator<Item = Holder>) -> anyhow::Result<()>
where
    W: Write,
{
    let mut writer = Writer::from_writer(output);
    for holder in holders {
        if let Err(err) = writer.serialize(holder) {
            anyhow::bail!("Failed to write to CSV: {err}")
        }
    }
    // Ensure all data is flushed to the output
    if let Err(err) = writer.flush() {
        anyhow::bail!("Failed to flush CSV writer: {err}")
    }
    Ok(())
}
