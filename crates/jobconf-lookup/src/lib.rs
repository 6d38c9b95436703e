//! Membership lookups backed by a real store.
//!
//! [`MySqlMembershipLookup`] checks the candidate table of a MySQL database.
//! It is blocking and must not be called from inside an async runtime.
mod mysql;
pub use mysql::MySqlMembershipLookup;

mod table;
pub use table::SqlTable;
