mod common;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = common::client_from_env()?;
    let recipients = common::required_env("PAYAMAK_TO")?;
    let message = std::env::var("PAYAMAK_MESSAGE")
        .unwrap_or_else(|_| "Hello from the payamak example.".to_owned());

    // A comma-separated list goes through the bulk endpoint.
    let recipients = recipients.split(',').collect::<Vec<_>>();
    let sent = match recipients.as_slice() {
        [single] => match std::env::var("PAYAMAK_SEND_DATE") {
            Ok(send_date) => client.send_scheduled_sms(single, &message, &send_date)?,
            Err(_) => client.send_sms(single, &message)?,
        },
        many => client.send_bulk_sms(many, &message)?,
    };
    println!("sent: {sent}");

    Ok(())
}
