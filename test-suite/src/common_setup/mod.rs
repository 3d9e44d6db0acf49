pub mod app;
pub mod helpers;
pub mod setup_accounts_and_block;
pub mod setup_loan;
