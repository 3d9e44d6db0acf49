use std::future::Future;

use micro_loan_client::ClientError;

/// Drives a flow action to completion. The mock chain never suspends.
pub fn run<F: Future>(future: F) -> F::Output {
    futures::executor::block_on(future)
}

pub fn assert_error<T: std::fmt::Debug>(res: Result<T, ClientError>, expected: &str) {
    assert_eq!(res.unwrap_err().to_string(), expected);
}
