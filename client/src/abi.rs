//! Solidity interface of the micro-loan contract, limited to what the
//! front-end calls.

use alloy_sol_types::sol;

sol! {
    interface IMicroLoan {
        struct LoanRequestParams {
            uint256 amount;
            uint256 interest;
            uint256 duration;
            uint256 collateralAmount;
            address collateralToken;
        }

        event LoanRequested(
            uint256 indexed loanId,
            address indexed borrower,
            uint256 amount,
            uint256 collateralAmount
        );

        function requestLoan(LoanRequestParams calldata request) external;

        function getOpenLoanIds() external view returns (uint256[] memory);

        function loans(uint256 loanId)
            external
            view
            returns (
                address borrower,
                address lender,
                uint256 amount,
                uint256 interest,
                uint256 duration,
                uint256 startTime,
                uint256 collateralAmount,
                address collateralToken,
                uint8 status
            );

        function fundLoan(uint256 loanId) external payable;
    }
}
