//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. Each repository is constructed with its own connection;
//! there is no shared registry of resource types.

pub mod credit;
pub mod debit;
pub mod paginate;

pub use credit::{
    CreateCreditInput, CreditError, CreditFilter, CreditRepository, UpdateCreditInput,
};
pub use debit::{CreateDebitInput, DebitError, DebitFilter, DebitRepository, UpdateDebitInput};
pub use paginate::{Paginable, paginate};
