pub mod analyzers;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod rank;
pub mod record;
