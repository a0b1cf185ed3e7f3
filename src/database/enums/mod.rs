pub mod ticker_kind;

pub use ticker_kind::TickerKind;
