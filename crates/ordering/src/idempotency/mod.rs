//! Request deduplication for identified commands.
//!
//! A [`RequestLedger`] remembers which client request ids have been seen,
//! the [`RequestManager`] records new ones, and the
//! [`IdentifiedCommandHandler`] runs a command only for a request id it has
//! not seen before.

mod handler;
mod ledger;
mod manager;
mod postgres;

pub use handler::IdentifiedCommandHandler;
pub use ledger::{ClientRequest, InMemoryRequestLedger, LedgerError, RequestLedger};
pub use manager::RequestManager;
pub use postgres::PostgresRequestLedger;
