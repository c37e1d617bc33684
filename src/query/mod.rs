pub mod executor;
pub mod parser;

pub use executor::NameQueryExecutor;
pub use parser::{NameQuery, parse_name_query};
