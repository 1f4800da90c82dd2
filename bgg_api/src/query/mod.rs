mod common;
pub use self::common::{Query, QueryCommon};

mod linked_items;
pub use self::linked_items::{LinkedItemsQuery, LinkedItemsSort};
