mod client;
mod errors;
mod query;
pub mod types;
pub mod user_agent;
pub use self::client::Client;
pub use self::errors::Error;
pub use self::query::{LinkedItemsQuery, LinkedItemsSort, Query, QueryCommon};
