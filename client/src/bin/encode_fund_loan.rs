use micro_loan::units::{parse_coin, to_abi_uint};
use micro_loan_client::{ClientConfig, MicroLoanContract};

pub const LOAN_ID: u64 = 2;
/// Must match the loan's requested principal exactly
pub const LOAN_AMOUNT: &str = "1";

pub fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();
    let config = ClientConfig::from_env()?;

    let value = parse_coin(LOAN_AMOUNT)?;
    let calldata = MicroLoanContract::fund_loan_calldata(LOAN_ID);
    log::info!("funding loan {LOAN_ID} with {value} base units");

    println!("to: {}", config.contract().addr());
    println!("value: {}", to_abi_uint(value));
    println!("data: 0x{}", hex::encode(&calldata));
    Ok(())
}
