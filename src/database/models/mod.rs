pub mod company;
pub mod ticker;

pub use company::{Company, NewCompany};
pub use ticker::{NewTicker, Ticker, TickerChanges};
