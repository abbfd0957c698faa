// Entity Models
//
// Each entity has:
// - A record type with its wire shape
// - A schema describing what a create payload must contain
// - A service that owns the collection and is the only way to change it

pub mod expense;
pub mod store;

pub use expense::{Expense, ExpenseService, NewExpense};
pub use store::{Store, StoreService};
