//! Order book structures

mod order_book;
mod registry;

pub use order_book::OrderBook;
pub use registry::OrderBookRegistry;
