pub mod client;
pub mod track;
