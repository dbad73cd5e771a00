mod common;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = common::client_from_env()?;
    let message_id = common::required_env("PAYAMAK_MESSAGE_ID")?;

    let status = client.get_sms_status(&message_id)?;
    println!("status: {:?}", status.as_str());
    Ok(())
}
