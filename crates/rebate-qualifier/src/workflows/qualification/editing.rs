use super::amounts::line_total;
use super::domain::{
    PriorYearTimeframe, Scenario, ScenarioTest, TestResult, TestType, Timeframe, Transaction,
};
use super::evaluation::{evaluate, ConfigurationError};

pub const MIN_PRIOR_YEARS: u8 = 1;
pub const MAX_PRIOR_YEARS: u8 = 10;

/// Editable columns of a transaction line. `total` is derived and never set directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionField {
    Date,
    Sku,
    Quantity,
    Price,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("transaction {index} out of range (test has {len})")]
    TransactionOutOfRange { index: usize, len: usize },
    #[error("no test numbers left to assign")]
    TestNumbersExhausted,
}

impl Scenario {
    /// Blank YoY scenario with a single prior-year window, as the editor starts one.
    pub fn draft(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            test_type: TestType::Yoy,
            qualifying_skus: String::new(),
            earning_skus: String::new(),
            target_percent: String::new(),
            num_prior_years: MIN_PRIOR_YEARS,
            prior_year_timeframes: vec![PriorYearTimeframe::numbered(1)],
            current_year_timeframe: Timeframe::default(),
            current_year_earning_rate: String::new(),
            min_qualification_percent: String::new(),
            earning_percent: String::new(),
            tests: Vec::new(),
            next_test_number: 1,
            last_modified: None,
        }
    }

    /// Resizes the prior-year windows, keeping existing entries by position.
    pub fn set_prior_year_count(&mut self, count: u8) {
        let count = count.clamp(MIN_PRIOR_YEARS, MAX_PRIOR_YEARS);
        let len = usize::from(count);

        self.prior_year_timeframes.truncate(len);
        while self.prior_year_timeframes.len() < len {
            let position = self.prior_year_timeframes.len() + 1;
            self.prior_year_timeframes
                .push(PriorYearTimeframe::numbered(position));
        }
        self.num_prior_years = count;
    }

    /// Appends a new empty test.
    ///
    /// The number starts at `next_test_number` but never below one past the
    /// highest numeric id already present, and skips any id still in use.
    pub fn add_test(&mut self) -> Result<&mut ScenarioTest, EditError> {
        let after_existing = self
            .tests
            .iter()
            .filter_map(|test| test.id.parse::<u32>().ok())
            .max()
            .map_or(1, |highest| highest.saturating_add(1));

        let mut number = self.next_test_number.max(after_existing).max(1);
        while self.test(&ScenarioTest::id_for(number)).is_some() {
            number = number
                .checked_add(1)
                .ok_or(EditError::TestNumbersExhausted)?;
        }

        self.next_test_number = number.saturating_add(1);
        self.tests.push(ScenarioTest::numbered(number));
        let index = self.tests.len() - 1;
        Ok(&mut self.tests[index])
    }

    pub fn remove_test(&mut self, id: &str) -> Option<ScenarioTest> {
        let index = self.tests.iter().position(|test| test.id == id)?;
        Some(self.tests.remove(index))
    }

    pub fn test(&self, id: &str) -> Option<&ScenarioTest> {
        self.tests.iter().find(|test| test.id == id)
    }

    pub fn test_mut(&mut self, id: &str) -> Option<&mut ScenarioTest> {
        self.tests.iter_mut().find(|test| test.id == id)
    }

    /// Re-evaluates every test and replaces its stored results.
    pub fn recalculate(&mut self) -> Result<(), ConfigurationError> {
        let results = self
            .tests
            .iter()
            .map(|test| evaluate(self, test))
            .collect::<Result<Vec<_>, _>>()?;

        for (test, result) in self.tests.iter_mut().zip(results) {
            test.results = Some(result);
        }
        Ok(())
    }
}

impl ScenarioTest {
    pub fn numbered(number: u32) -> Self {
        Self {
            id: Self::id_for(number),
            label: format!("Test {number}"),
            transactions: Vec::new(),
            results: None,
        }
    }

    fn id_for(number: u32) -> String {
        format!("{number:06}")
    }

    /// Fresh evaluation against `scenario`; the stored snapshot is not consulted.
    pub fn evaluate(&self, scenario: &Scenario) -> Result<TestResult, ConfigurationError> {
        evaluate(scenario, self)
    }

    pub fn invalidate(&mut self) {
        self.results = None;
    }

    pub fn add_transaction(&mut self, id: String) -> &mut Transaction {
        self.invalidate();
        self.transactions.push(Transaction {
            id,
            ..Transaction::default()
        });
        let index = self.transactions.len() - 1;
        &mut self.transactions[index]
    }

    pub fn extend_transactions<I>(&mut self, transactions: I)
    where
        I: IntoIterator<Item = Transaction>,
    {
        self.invalidate();
        self.transactions.extend(transactions);
    }

    pub fn set_transaction_field(
        &mut self,
        index: usize,
        field: TransactionField,
        value: impl Into<String>,
    ) -> Result<(), EditError> {
        let len = self.transactions.len();
        let transaction = self
            .transactions
            .get_mut(index)
            .ok_or(EditError::TransactionOutOfRange { index, len })?;
        transaction.set_field(field, value);
        self.invalidate();
        Ok(())
    }

    pub fn remove_transaction(&mut self, index: usize) -> Result<Transaction, EditError> {
        let len = self.transactions.len();
        if index >= len {
            return Err(EditError::TransactionOutOfRange { index, len });
        }
        self.invalidate();
        Ok(self.transactions.remove(index))
    }
}

impl Transaction {
    pub fn new(
        id: impl Into<String>,
        date: impl Into<String>,
        sku: impl Into<String>,
        quantity: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        let quantity = quantity.into();
        let price = price.into();
        let total = line_total(&quantity, &price);
        Self {
            id: id.into(),
            date: date.into(),
            sku: sku.into(),
            quantity,
            price,
            total,
        }
    }

    /// Quantity and price edits recompute `total` from the other field's current value.
    pub fn set_field(&mut self, field: TransactionField, value: impl Into<String>) {
        let value = value.into();
        match field {
            TransactionField::Date => self.date = value,
            TransactionField::Sku => self.sku = value,
            TransactionField::Quantity => {
                self.quantity = value;
                self.total = line_total(&self.quantity, &self.price);
            }
            TransactionField::Price => {
                self.price = value;
                self.total = line_total(&self.quantity, &self.price);
            }
        }
    }
}
