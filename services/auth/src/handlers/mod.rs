pub mod session;
pub mod token;
pub mod two_factor;
