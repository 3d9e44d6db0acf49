pub mod error;
pub mod form;
pub mod repayment;
pub mod state;
pub mod units;

pub use error::LoanError;
pub use form::LoanForm;
pub use repayment::{total_repayment, RepaymentPreview};
pub use state::{LoanRequest, LoanStatus, LoanTerms, LocalLoanRecord};
