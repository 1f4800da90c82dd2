mod linked_item;
pub use self::linked_item::{LinkedItem, LinkedItemsResponse};

pub(crate) mod lenient;
