pub mod commerce;
pub mod exchange;
pub mod response;
