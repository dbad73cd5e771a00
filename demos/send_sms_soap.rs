mod common;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = common::client_from_env()?;
    let recipients = common::required_env("PAYAMAK_TO")?;
    let message = std::env::var("PAYAMAK_MESSAGE")
        .unwrap_or_else(|_| "Hello over SOAP from the payamak example.".to_owned());

    let recipients = recipients.split(',').collect::<Vec<_>>();
    let accepted = match recipients.as_slice() {
        [single] => client.send_sms_soap(single, &message)?,
        many => client.send_bulk_sms_soap(many, &message)?,
    };
    println!("accepted: {accepted}");

    Ok(())
}
