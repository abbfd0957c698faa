// 💸 Expense Entity - server-numbered spending records
//
// Identity: `id`, issued by the service from a monotonically increasing counter.
// Ids are never accepted from clients and never reused after a delete.
//
// Amounts are fixed-point decimals so totals are exact ("766.22", not
// "766.2199999999999"); on the wire they are plain JSON numbers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::attributes::{FieldDefinition, FieldType, Schema, ValidationRule};
use crate::collection::Collection;
use crate::error::{ServiceError, ServiceResult};
use crate::schema::{validate_into, ValidationError};

/// Largest accepted amount; keeps any realistic number of expenses summable
/// without leaving the Decimal range.
pub const MAX_AMOUNT: f64 = 1e15;

// ============================================================================
// EXPENSE ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: u64,
    pub title: String,
    #[serde(with = "amount_format")]
    pub amount: Decimal,
    pub expense_type: String,
}

/// Validated create payload - everything but the id
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub title: String,
    #[serde(with = "amount_format")]
    pub amount: Decimal,
    pub expense_type: String,
}

impl NewExpense {
    pub fn with_id(self, id: u64) -> Expense {
        Expense {
            id,
            title: self.title,
            amount: self.amount,
            expense_type: self.expense_type,
        }
    }
}

/// Decimal <-> JSON number
///
/// Goes through the shortest decimal text of the f64 in both directions, so
/// 156.75 on the wire is exactly 156.75 in memory and back.
pub mod amount_format {
    use rust_decimal::Decimal;
    use serde::{de, ser, Deserialize, Deserializer, Serializer};
    use std::str::FromStr;

    pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let number: f64 = value.to_string().parse().map_err(ser::Error::custom)?;
        serializer.serialize_f64(number)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let number = f64::deserialize(deserializer)?;
        Decimal::from_str(&number.to_string()).map_err(de::Error::custom)
    }
}

// ============================================================================
// SCHEMAS
// ============================================================================

/// Full expense schema, as stored and returned
pub fn expense_schema() -> Schema {
    Schema::new("Expense")
        .with_field(
            FieldDefinition::new("id", FieldType::Number)
                .with_description("Server-assigned identifier")
                .with_validation(ValidationRule::Required)
                .with_validation(ValidationRule::Positive),
        )
        .with_field(FieldDefinition::text("title", 3, 100).with_description("What the money was spent on"))
        .with_field(
            FieldDefinition::new("amount", FieldType::Number)
                .with_description("Amount spent")
                .with_validation(ValidationRule::Required)
                .with_validation(ValidationRule::Positive)
                .with_validation(ValidationRule::Max(MAX_AMOUNT)),
        )
        .with_field(FieldDefinition::text("expenseType", 3, 100).with_description("Free-form category, e.g. \"house\""))
}

/// Create schema: the full schema without the server-assigned id
pub fn new_expense_schema() -> Schema {
    expense_schema().without("id")
}

/// Parse an `:id` path segment.
///
/// Only plain ASCII digits that fit in a u64 are ids; anything else ("+1", "1.0",
/// "abc", "") is treated as an id that doesn't exist.
pub fn parse_id(segment: &str) -> Option<u64> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

// ============================================================================
// EXPENSE SERVICE
// ============================================================================

/// Owns the expense collection; the only way records get in or out
pub struct ExpenseService {
    expenses: Collection<Expense>,
    create_schema: Schema,
}

impl ExpenseService {
    /// Empty collection
    pub fn new() -> Self {
        Self::with_expenses(Vec::new())
    }

    /// Start from existing records; new ids continue after the highest one
    pub fn with_expenses(expenses: Vec<Expense>) -> Self {
        let last_id = expenses.iter().map(|e| e.id).max().unwrap_or(0);
        ExpenseService {
            expenses: Collection::seeded(expenses, last_id),
            create_schema: new_expense_schema(),
        }
    }

    /// Collection pre-loaded with the demo expenses
    pub fn seeded() -> Self {
        Self::with_expenses(default_expenses())
    }

    pub fn list(&self) -> Vec<Expense> {
        let expenses = self.expenses.all();
        debug!(count = expenses.len(), "listed expenses");
        expenses
    }

    pub fn count(&self) -> usize {
        self.expenses.len()
    }

    /// Exact sum of all amounts (zero when empty)
    pub fn total(&self) -> Decimal {
        self.expenses.fold(Decimal::ZERO, |acc, e| acc + e.amount)
    }

    pub fn get(&self, id: u64) -> ServiceResult<Expense> {
        self.expenses
            .find(|e| e.id == id)
            .ok_or_else(|| ServiceError::not_found("expense", id))
    }

    /// Validate the payload, assign the next id and append
    pub fn create(&self, payload: &Value) -> ServiceResult<Expense> {
        let new_expense = self.validate_new(payload).map_err(|err| {
            warn!(error = %err, "rejected expense");
            err
        })?;

        let expense = self.expenses.push_with_id(|id| new_expense.with_id(id));
        info!(id = expense.id, title = %expense.title, amount = %expense.amount, "created expense");
        Ok(expense)
    }

    /// Remove the expense with this id and hand it back
    pub fn delete(&self, id: u64) -> ServiceResult<Expense> {
        let removed = self
            .expenses
            .remove_first(|e| e.id == id)
            .ok_or_else(|| ServiceError::not_found("expense", id))?;
        info!(id = removed.id, "deleted expense");
        Ok(removed)
    }

    fn validate_new(&self, payload: &Value) -> Result<NewExpense, ValidationError> {
        let new_expense: NewExpense = validate_into(&self.create_schema, payload)?;

        // A tiny positive float can still round to zero once it becomes a decimal
        if new_expense.amount <= Decimal::ZERO {
            return Err(ValidationError::single(
                self.create_schema.name(),
                "amount",
                "Number must be greater than 0",
            ));
        }
        Ok(new_expense)
    }
}

impl Default for ExpenseService {
    fn default() -> Self {
        Self::new()
    }
}

/// Demo data the server starts with
pub fn default_expenses() -> Vec<Expense> {
    let expense = |id, title: &str, cents, expense_type: &str| Expense {
        id,
        title: title.to_string(),
        amount: Decimal::new(cents, 2),
        expense_type: expense_type.to_string(),
    };

    vec![
        expense(1, "Grocery Shopping", 15675, "house"),
        expense(2, "Internet Bill", 8999, "house"),
        expense(3, "Gas and Electric", 24550, "house"),
        expense(4, "Car Insurance", 17800, "car"),
        expense(5, "Phone Bill", 7599, "house"),
        expense(6, "Netflix Subscription", 1999, "house"),
    ]
}

// ============================================================================
// TESTS
// ============================================================================
