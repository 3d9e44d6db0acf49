use micro_loan::LoanForm;
use micro_loan_client::{ClientConfig, MicroLoanContract};

pub const LOAN_AMOUNT: &str = "1";
pub const COLLATERAL_AMOUNT: &str = "2";
pub const DURATION_DAYS: &str = "30";
pub const INTEREST_RATE: &str = "5";

pub fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();
    let config = ClientConfig::from_env()?;

    let mut form = LoanForm::default();
    form.set_loan_amount(LOAN_AMOUNT);
    form.set_collateral_amount(COLLATERAL_AMOUNT);
    form.set_duration(DURATION_DAYS);
    form.set_interest_rate(INTEREST_RATE);

    if let Some(preview) = form.preview() {
        log::info!(
            "total repayment {} ETH ({}% interest for {} days)",
            preview.total_display(),
            preview.period_interest_display(),
            form.duration()
        );
    }

    let terms = form.to_terms()?;
    let calldata = MicroLoanContract::request_loan_calldata(&terms);

    println!("to: {}", config.contract_address);
    println!("value: 0");
    println!("data: 0x{}", hex::encode(&calldata));
    Ok(())
}
