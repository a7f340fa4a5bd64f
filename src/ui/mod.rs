pub mod facts;
pub mod panels;
pub mod plot;
