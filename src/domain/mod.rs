pub mod address;
pub mod derived;
pub mod history;
pub mod package;
pub mod session;
pub mod status;
pub mod validation;
