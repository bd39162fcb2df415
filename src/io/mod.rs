pub mod demand;
pub mod reporting;
pub mod request;
