use crate::workflows::qualification::{IdSource, Transaction};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

#[derive(Debug)]
pub enum TransactionImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for TransactionImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionImportError::Io(err) => {
                write!(f, "failed to read transaction file: {}", err)
            }
            TransactionImportError::Csv(err) => write!(f, "invalid transaction CSV: {}", err),
        }
    }
}

impl std::error::Error for TransactionImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransactionImportError::Io(err) => Some(err),
            TransactionImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for TransactionImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for TransactionImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Loads transaction lines from a `Date,SKU,Quantity,Price` CSV export.
pub struct TransactionImporter;

impl TransactionImporter {
    pub fn from_path(
        path: &Path,
        ids: &dyn IdSource,
    ) -> Result<Vec<Transaction>, TransactionImportError> {
        let file = File::open(path)?;
        Self::from_reader(file, ids)
    }

    /// Rows with every column blank are skipped; ids are minted per kept row.
    pub fn from_reader<R: Read>(
        reader: R,
        ids: &dyn IdSource,
    ) -> Result<Vec<Transaction>, TransactionImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);
        let mut transactions = Vec::new();

        for record in csv_reader.deserialize::<TransactionRow>() {
            let row = record?;
            if row.is_blank() {
                continue;
            }
            transactions.push(Transaction::new(
                ids.transaction_id(),
                row.date,
                row.sku,
                row.quantity,
                row.price,
            ));
        }

        debug!(rows = transactions.len(), "imported transaction lines");
        Ok(transactions)
    }
}

#[derive(Debug, Deserialize)]
struct TransactionRow {
    #[serde(rename = "Date", alias = "date", alias = "DATE", default)]
    date: String,
    #[serde(rename = "SKU", alias = "sku", alias = "Sku", default)]
    sku: String,
    #[serde(
        rename = "Quantity",
        alias = "quantity",
        alias = "QUANTITY",
        alias = "Qty",
        default
    )]
    quantity: String,
    #[serde(rename = "Price", alias = "price", alias = "PRICE", default)]
    price: String,
}

impl TransactionRow {
    fn is_blank(&self) -> bool {
        [&self.date, &self.sku, &self.quantity, &self.price]
            .iter()
            .all(|value| value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::qualification::SequentialIds;

    #[test]
    fn reads_rows_and_derives_totals() {
        let data = "\
Date,SKU,Quantity,Price
2024-03-01, SKU001 ,10,96
2023-03-01,SKU002,3,19.995
";
        let ids = SequentialIds::new();
        let transactions =
            TransactionImporter::from_reader(data.as_bytes(), &ids).expect("csv parses");

        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].id, "txn_000001");
        assert_eq!(transactions[0].sku, "SKU001");
        assert_eq!(transactions[0].total, "960.00");
        assert_eq!(transactions[1].id, "txn_000002");
        assert_eq!(transactions[1].total, "59.99");
    }

    #[test]
    fn accepts_lowercase_headers_and_skips_blank_rows() {
        let data = "\
date,sku,quantity,price
2024-01-05,A,2,5
,,,
2024-01-06,B,,7
";
        let ids = SequentialIds::new();
        let transactions =
            TransactionImporter::from_reader(data.as_bytes(), &ids).expect("csv parses");

        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].total, "10.00");
        assert_eq!(transactions[1].quantity, "");
        assert_eq!(transactions[1].total, "0.00");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let ids = SequentialIds::new();
        let err = TransactionImporter::from_path(&dir.path().join("missing.csv"), &ids)
            .expect_err("file is absent");
        assert!(matches!(err, TransactionImportError::Io(_)));
    }
}
