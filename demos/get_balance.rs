mod common;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = common::client_from_env()?;
    let balance = client.get_balance()?;
    println!("balance: {}", balance.value());
    Ok(())
}
