pub mod recovery_codes;
pub mod users;
