pub mod challenge;
pub mod login;
pub mod recovery;
pub mod signup;
pub mod token;
pub mod two_factor;
