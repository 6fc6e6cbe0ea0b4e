mod helpers;
mod token_test;
mod two_factor_test;
