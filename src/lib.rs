// Lô đề bill parsing and settlement engine
pub mod combinatorics;
pub mod draw;
pub mod error;
pub mod parser;
pub mod payout;
pub mod profit;
pub mod revenue;
pub mod settlement;
pub mod stations;
pub mod tables;
pub mod types;
pub mod utils;

pub use draw::*;
pub use error::*;
pub use parser::*;
pub use payout::*;
pub use profit::*;
pub use revenue::*;
pub use settlement::*;
pub use tables::*;
pub use types::*;
pub use utils::*;
