//! Payment aggregation

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::{
    error::CommitmentError,
    types::{Address, PaymentEntry, RawPayment},
};

/// Collapse a raw payment list into one entry per recipient.
///
/// Entries without a recipient, without an amount or with a zero amount are
/// skipped. Amounts of repeated recipients are summed. Recipients keep the
/// position of their first occurrence.
pub fn reduce_payments<I, P>(payments: I) -> Result<Vec<PaymentEntry>, CommitmentError>
where
    I: IntoIterator<Item = P>,
    P: Into<RawPayment>,
{
    let mut reduced: Vec<PaymentEntry> = Vec::new();
    let mut positions: HashMap<Address, usize> = HashMap::new();
    let mut skipped = 0usize;

    for raw in payments {
        let Some(entry) = raw.into().entry() else {
            skipped += 1;
            continue;
        };

        match positions.get(&entry.recipient) {
            Some(&idx) => {
                let total = &mut reduced[idx].amount;
                *total = total
                    .checked_add(entry.amount)
                    .ok_or(CommitmentError::AmountOverflow { recipient: entry.recipient })?;
            }
            None => {
                positions.insert(entry.recipient, reduced.len());
                reduced.push(entry);
            }
        }
    }

    if skipped > 0 {
        warn!(skipped, "dropped payments without recipient or amount");
    }
    debug!(recipients = reduced.len(), "reduced payment list");

    Ok(reduced)
}
