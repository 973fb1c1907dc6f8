//! Order placement and history.

mod history;
mod pipeline;
mod record;

pub use history::OrderHistory;
pub use pipeline::{OrderPipeline, OrderReceipt, OrderRequest};
pub use record::OrderRecord;
