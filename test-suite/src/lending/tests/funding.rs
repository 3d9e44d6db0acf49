#[cfg(test)]
mod tests {
    use alloy_primitives::U256;
    use micro_loan::LoanStatus;
    use micro_loan_client::{ClientError, LendingFlow, RpcError};

    use crate::common_setup::{
        app::MockChain,
        helpers::run,
        setup_accounts_and_block::{
            chain, connected_wallet, contract, setup_wallet, CONTRACT_ADDR, LENDER_ADDR,
        },
        setup_loan::{coin, open_loan, seed_open_loans},
    };

    fn loan_ids(flow: &LendingFlow<'_, MockChain>) -> Vec<u64> {
        flow.open_loans().iter().map(|loan| loan.id).collect()
    }

    #[test]
    fn fund_without_selection() {
        let wallet = connected_wallet(LENDER_ADDR);
        let mut flow = LendingFlow::new(&wallet, contract());

        let res = run(flow.fund_selected());
        assert!(matches!(res, Err(ClientError::NoLoanSelected {})));
        assert!(chain(&wallet).sent_transactions().is_empty());
    }

    #[test]
    fn fund_while_disconnected() {
        let wallet = setup_wallet(LENDER_ADDR);
        seed_open_loans(chain(&wallet));
        let mut flow = LendingFlow::new(&wallet, contract());
        run(flow.refresh()).unwrap();
        flow.select(1);
        assert!(!flow.can_fund());

        let res = run(flow.fund_selected());
        assert!(matches!(res, Err(ClientError::NotConnected {})));
        assert_eq!(flow.status(), "Please connect your wallet first");
        assert!(chain(&wallet).sent_transactions().is_empty());
        assert_eq!(flow.selected().unwrap().id, 1);
        assert!(!flow.is_processing());
    }

    #[test]
    fn fund_loan_with_exact_principal() {
        let wallet = connected_wallet(LENDER_ADDR);
        seed_open_loans(chain(&wallet));
        chain(&wallet).insert_loan(4, open_loan("1.123456789012345678", 7, 90, "3"));
        let mut flow = LendingFlow::new(&wallet, contract());
        run(flow.refresh()).unwrap();
        assert!(flow.select(4));
        assert!(flow.can_fund());

        run(flow.fund_selected()).unwrap();
        assert_eq!(flow.status(), "Loan approved and funded!");
        assert!(flow.selected().is_none());
        assert!(!flow.is_processing());

        let chain = chain(&wallet);
        let txs = chain.sent_transactions();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].from, LENDER_ADDR);
        assert_eq!(txs[0].to, CONTRACT_ADDR);
        assert_eq!(txs[0].value, coin("1.123456789012345678"));
        assert_eq!(
            txs[0].value,
            U256::from(1_123_456_789_012_345_678u64)
        );

        let funded = chain.loan(4).unwrap();
        assert_eq!(funded.status, LoanStatus::Funded.code());
        assert_eq!(funded.lender, LENDER_ADDR);
        assert!(!funded.start_time.is_zero());

        // the listing was reloaded without the funded loan
        assert_eq!(loan_ids(&flow), vec![1, 2, 3]);
    }

    #[test]
    fn fund_rejected_by_user() {
        let wallet = connected_wallet(LENDER_ADDR);
        seed_open_loans(chain(&wallet));
        chain(&wallet).behaviour().send_error = Some(RpcError::user_rejected());
        let mut flow = LendingFlow::new(&wallet, contract());
        run(flow.refresh()).unwrap();
        flow.select(1);

        let res = run(flow.fund_selected());
        assert!(matches!(res, Err(ClientError::UserRejected(_))));
        assert_eq!(flow.status(), "Transaction rejected by user");
        assert!(!flow.is_processing());
        // the confirmation view stays open for another attempt
        assert_eq!(flow.selected().unwrap().id, 1);
        assert_eq!(
            chain(&wallet).loan(1).unwrap().status,
            LoanStatus::Requested.code()
        );
    }

    #[test]
    fn fund_fails_in_wallet() {
        let wallet = connected_wallet(LENDER_ADDR);
        seed_open_loans(chain(&wallet));
        chain(&wallet).behaviour().send_error =
            Some(RpcError::new(-32000, "insufficient funds for transfer"));
        let mut flow = LendingFlow::new(&wallet, contract());
        run(flow.refresh()).unwrap();
        flow.select(2);

        let res = run(flow.fund_selected());
        assert!(matches!(res, Err(ClientError::TransactionFailed(_))));
        assert_eq!(
            flow.status(),
            "Error approving loan: insufficient funds for transfer"
        );
        assert!(flow.selected().is_some());
    }

    #[test]
    fn fund_reverted_on_chain() {
        let wallet = connected_wallet(LENDER_ADDR);
        seed_open_loans(chain(&wallet));
        chain(&wallet).behaviour().revert_on_mine = true;
        let mut flow = LendingFlow::new(&wallet, contract());
        run(flow.refresh()).unwrap();
        flow.select(3);

        let res = run(flow.fund_selected());
        assert!(matches!(res, Err(ClientError::TransactionFailed(_))));
        assert!(flow.status().starts_with("Error approving loan: transaction 0x"));
        assert!(flow.status().ends_with("reverted"));
        assert_eq!(loan_ids(&flow), vec![1, 2, 3]);
    }

    #[test]
    fn fund_loan_already_taken_from_stale_listing() {
        let wallet = connected_wallet(LENDER_ADDR);
        seed_open_loans(chain(&wallet));
        let mut first = LendingFlow::new(&wallet, contract());
        let mut second = LendingFlow::new(&wallet, contract());
        run(first.refresh()).unwrap();
        run(second.refresh()).unwrap();
        first.select(1);
        second.select(1);

        run(first.fund_selected()).unwrap();
        let res = run(second.fund_selected());
        assert!(matches!(res, Err(ClientError::TransactionFailed(_))));
        assert_eq!(
            second.status(),
            "Error approving loan: execution reverted: \
             Can't change the state of the loan from FUNDED to FUNDED"
        );
        assert_eq!(chain(&wallet).sent_transactions().len(), 1);
    }

    #[test]
    fn funding_succeeds_even_if_reload_fails() {
        let wallet = connected_wallet(LENDER_ADDR);
        seed_open_loans(chain(&wallet));
        let mut flow = LendingFlow::new(&wallet, contract());
        run(flow.refresh()).unwrap();
        flow.select(1);

        chain(&wallet).behaviour().failing_loan_details.insert(2);
        run(flow.fund_selected()).unwrap();

        assert_eq!(
            chain(&wallet).loan(1).unwrap().status,
            LoanStatus::Funded.code()
        );
        assert!(flow.selected().is_none());
        // the stale listing stays until the next successful reload
        assert_eq!(loan_ids(&flow), vec![1, 2, 3]);
        assert_eq!(
            flow.status(),
            "Error fetching loans: could not decode result data for loan 2"
        );
    }

    #[test]
    fn cancel_closes_the_confirmation_view() {
        let wallet = connected_wallet(LENDER_ADDR);
        seed_open_loans(chain(&wallet));
        let mut flow = LendingFlow::new(&wallet, contract());
        run(flow.refresh()).unwrap();
        flow.select(1);
        flow.cancel();
        assert!(flow.selected().is_none());
        assert!(!flow.can_fund());
    }
}
