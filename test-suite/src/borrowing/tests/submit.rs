#[cfg(test)]
mod tests {
    use alloy_primitives::{Address, U256};
    use alloy_sol_types::SolInterface;
    use micro_loan::{LoanError, LoanForm, LoanStatus};
    use micro_loan_client::{
        abi::IMicroLoan::{requestLoanCall, IMicroLoanCalls},
        BorrowingFlow, BorrowingState, ClientError, RpcError,
    };

    use crate::common_setup::{
        app::MockChain,
        helpers::{assert_error, run},
        setup_accounts_and_block::{
            chain, connected_wallet, contract, setup_wallet, BORROWER_ADDR, CONTRACT_ADDR,
        },
        setup_loan::coin,
    };

    fn fill_form(form: &mut LoanForm, amount: &str, collateral: &str, days: &str, rate: &str) {
        form.set_loan_amount(amount);
        form.set_collateral_amount(collateral);
        form.set_duration(days);
        form.set_interest_rate(rate);
    }

    fn submitted_request(chain: &MockChain, index: usize) -> requestLoanCall {
        let txs = chain.sent_transactions();
        match IMicroLoanCalls::abi_decode(&txs[index].data, true).unwrap() {
            IMicroLoanCalls::requestLoan(call) => call,
            _ => panic!("expected a requestLoan call"),
        }
    }

    #[test]
    fn preview_follows_the_form() {
        let wallet = setup_wallet(BORROWER_ADDR);
        let mut flow = BorrowingFlow::new(&wallet, contract());
        assert!(flow.preview().is_none());

        fill_form(flow.form_mut(), "1", "2", "30", "5");
        let preview = flow.preview().unwrap();
        assert_eq!(preview.total_display(), "1.0041");
        assert_eq!(preview.period_interest_display(), "0.41");

        flow.form_mut().set_loan_amount("");
        assert!(flow.preview().is_none());
    }

    #[test]
    fn submit_while_disconnected() {
        let wallet = setup_wallet(BORROWER_ADDR);
        let mut flow = BorrowingFlow::new(&wallet, contract());
        fill_form(flow.form_mut(), "1", "2", "30", "5");
        assert!(!flow.can_submit());

        let res = run(flow.submit());
        assert!(matches!(res, Err(ClientError::NotConnected {})));
        assert_eq!(flow.status(), "Please connect MetaMask!");
        assert!(chain(&wallet).sent_transactions().is_empty());
        assert!(flow.history().is_empty());
        // the input survives so the user can connect and retry
        assert_eq!(flow.form().loan_amount(), "1");
    }

    #[test]
    fn submit_loan_request() {
        let wallet = connected_wallet(BORROWER_ADDR);
        let mut flow = BorrowingFlow::new(&wallet, contract());
        fill_form(flow.form_mut(), "1", "2", "30", "5");
        assert!(flow.can_submit());

        run(flow.submit()).unwrap();
        assert_eq!(flow.state(), BorrowingState::Confirmed);
        assert_eq!(flow.status(), "Loan requested successfully on-chain!");

        let chain = chain(&wallet);
        let txs = chain.sent_transactions();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].from, BORROWER_ADDR);
        assert_eq!(txs[0].to, CONTRACT_ADDR);
        assert_eq!(txs[0].value, U256::ZERO);

        let request = submitted_request(chain, 0).request;
        assert_eq!(request.amount, coin("1"));
        assert_eq!(request.interest, U256::from(5u64));
        assert_eq!(request.duration, U256::from(30u64 * 86_400));
        assert_eq!(request.collateralAmount, coin("2"));
        assert_eq!(request.collateralToken, Address::ZERO);

        let stored = chain.loan(1).unwrap();
        assert_eq!(stored.borrower, BORROWER_ADDR);
        assert_eq!(stored.status, LoanStatus::Requested.code());
        assert_eq!(chain.open_ids(), vec![1]);

        let record = &flow.history()[0];
        assert_eq!(record.amount, "1");
        assert_eq!(record.collateral, "2");
        assert_eq!(record.duration, "30");
        assert_eq!(record.interest_rate, "5");
        assert_eq!(record.total_repayment.as_deref(), Some("1.0041"));
        assert_eq!(record.status, LoanStatus::Requested);

        assert_eq!(flow.form(), &LoanForm::default());
    }

    #[test]
    fn history_is_newest_first_with_unique_ids() {
        let wallet = connected_wallet(BORROWER_ADDR);
        let mut flow = BorrowingFlow::new(&wallet, contract());

        fill_form(flow.form_mut(), "1", "2", "30", "5");
        run(flow.submit()).unwrap();
        fill_form(flow.form_mut(), "0.5", "1", "10", "8");
        run(flow.submit()).unwrap();

        let history = flow.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].amount, "0.5");
        assert_eq!(history[1].amount, "1");
        assert!(history[0].id > history[1].id);
        assert_eq!(chain(&wallet).open_ids(), vec![1, 2]);
    }

    #[test]
    fn submit_with_incomplete_terms() {
        let wallet = connected_wallet(BORROWER_ADDR);
        let mut flow = BorrowingFlow::new(&wallet, contract());
        fill_form(flow.form_mut(), "1", "  ", "30", "5");
        assert!(!flow.can_submit());

        let res = run(flow.submit());
        assert!(matches!(res, Err(ClientError::IncompleteTerms {})));
        assert_eq!(flow.state(), BorrowingState::WalletConnected);
        assert!(chain(&wallet).sent_transactions().is_empty());
    }

    #[test]
    fn submit_malformed_amount() {
        let wallet = connected_wallet(BORROWER_ADDR);
        let mut flow = BorrowingFlow::new(&wallet, contract());
        fill_form(flow.form_mut(), "abc", "2", "30", "5");

        let res = run(flow.submit());
        assert!(matches!(
            res,
            Err(ClientError::Loan(LoanError::Parse { .. }))
        ));
        assert_eq!(flow.state(), BorrowingState::Failed);
        assert!(flow.status().starts_with("Error requesting loan: invalid amount \"abc\""));
        assert!(chain(&wallet).sent_transactions().is_empty());
        assert!(flow.history().is_empty());
    }

    #[test]
    fn submit_zero_amount() {
        let wallet = connected_wallet(BORROWER_ADDR);
        let mut flow = BorrowingFlow::new(&wallet, contract());
        fill_form(flow.form_mut(), "0", "2", "30", "5");

        assert_error(run(flow.submit()), "The loan amount must be greater than zero");
        assert_eq!(
            flow.status(),
            "Error requesting loan: The loan amount must be greater than zero"
        );
    }

    #[test]
    fn submit_fails_in_wallet() {
        let wallet = connected_wallet(BORROWER_ADDR);
        chain(&wallet).behaviour().send_error =
            Some(RpcError::new(-32000, "insufficient funds for gas"));
        let mut flow = BorrowingFlow::new(&wallet, contract());
        fill_form(flow.form_mut(), "1", "2", "30", "5");

        let res = run(flow.submit());
        assert!(matches!(res, Err(ClientError::TransactionFailed(_))));
        assert_eq!(flow.state(), BorrowingState::Failed);
        assert_eq!(
            flow.status(),
            "Error requesting loan: insufficient funds for gas"
        );
        assert!(flow.history().is_empty());
        // a failed submit keeps the input
        assert_eq!(flow.form().loan_amount(), "1");
    }

    #[test]
    fn submit_rejected_by_user() {
        let wallet = connected_wallet(BORROWER_ADDR);
        chain(&wallet).behaviour().send_error = Some(RpcError::user_rejected());
        let mut flow = BorrowingFlow::new(&wallet, contract());
        fill_form(flow.form_mut(), "1", "2", "30", "5");

        let res = run(flow.submit());
        assert!(res.unwrap_err().is_user_rejection());
        assert_eq!(
            flow.status(),
            "Error requesting loan: User rejected the request."
        );
    }

    #[test]
    fn submit_reverted_on_chain() {
        let wallet = connected_wallet(BORROWER_ADDR);
        chain(&wallet).behaviour().revert_on_mine = true;
        let mut flow = BorrowingFlow::new(&wallet, contract());
        fill_form(flow.form_mut(), "1", "2", "30", "5");

        let res = run(flow.submit());
        assert!(matches!(res, Err(ClientError::TransactionFailed(_))));
        assert!(flow.status().ends_with("reverted"));
        assert_eq!(chain(&wallet).sent_transactions().len(), 1);
        assert!(chain(&wallet).loan(1).is_none());
        assert!(flow.history().is_empty());
    }

    #[test]
    fn duration_above_widget_range_is_submitted() {
        let wallet = connected_wallet(BORROWER_ADDR);
        let mut flow = BorrowingFlow::new(&wallet, contract());
        fill_form(flow.form_mut(), "1", "2", "400", "5");
        assert_eq!(flow.form().duration(), "400");

        run(flow.submit()).unwrap();
        let request = submitted_request(chain(&wallet), 0).request;
        assert_eq!(request.duration, U256::from(400u64 * 86_400));
    }

    #[test]
    fn fractional_rate_is_truncated_on_submit() {
        let wallet = connected_wallet(BORROWER_ADDR);
        let mut flow = BorrowingFlow::new(&wallet, contract());
        fill_form(flow.form_mut(), "1", "2", "30", "7.9");
        assert_eq!(flow.form().interest_rate(), "7.9");

        run(flow.submit()).unwrap();
        let request = submitted_request(chain(&wallet), 0).request;
        assert_eq!(request.interest, U256::from(7u64));
        // the local record keeps what the user typed
        assert_eq!(flow.history()[0].interest_rate, "7.9");
    }

    #[test]
    fn cleared_duration_snaps_to_floor() {
        let wallet = setup_wallet(BORROWER_ADDR);
        let mut flow = BorrowingFlow::new(&wallet, contract());
        for input in ["", "0", "1", "abc"] {
            flow.form_mut().set_duration(input);
            assert_eq!(flow.form().duration(), "2");
        }
        flow.form_mut().set_interest_rate("0");
        assert_eq!(flow.form().interest_rate(), "2");
    }
}
