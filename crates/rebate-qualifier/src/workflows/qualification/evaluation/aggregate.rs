use super::super::amounts::parse_decimal;
use super::super::domain::Transaction;
use super::super::filters::{Period, SkuSet};
use rust_decimal::Decimal;

/// Sum of the stored line totals for transactions whose SKU is in `skus` and
/// whose date falls inside `period`. Unreadable totals count as zero; the
/// running sum is not rounded.
pub fn sum_totals(transactions: &[Transaction], skus: &SkuSet, period: Period) -> Decimal {
    transactions
        .iter()
        .filter(|txn| skus.contains(&txn.sku) && period.admits(&txn.date))
        .map(|txn| parse_decimal(&txn.total, Decimal::ZERO))
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Number of transactions whose SKU is in `skus`, ignoring dates.
pub fn count_matching(transactions: &[Transaction], skus: &SkuSet) -> usize {
    transactions
        .iter()
        .filter(|txn| skus.contains(&txn.sku))
        .count()
}
