pub mod categories;
pub mod serve;
pub mod token;
