use crate::domain::{MESSAGE_ID_FIELD, SEND_DATE_FIELD, TEXT_FIELD, TO_FIELD, join_recipients};

pub fn encode_send_sms_form(to: &str, message: &str) -> Vec<(String, String)> {
    vec![
        (TO_FIELD.to_owned(), to.to_owned()),
        (TEXT_FIELD.to_owned(), message.to_owned()),
    ]
}

pub fn encode_send_bulk_sms_form<S: AsRef<str>>(
    recipients: &[S],
    message: &str,
) -> Vec<(String, String)> {
    encode_send_sms_form(&join_recipients(recipients), message)
}

pub fn encode_send_scheduled_sms_form(
    to: &str,
    message: &str,
    send_date: &str,
) -> Vec<(String, String)> {
    let mut params = encode_send_sms_form(to, message);
    params.push((SEND_DATE_FIELD.to_owned(), send_date.to_owned()));
    params
}

pub fn encode_get_balance_form() -> Vec<(String, String)> {
    Vec::new()
}

pub fn encode_get_sms_status_form(message_id: &str) -> Vec<(String, String)> {
    vec![(MESSAGE_ID_FIELD.to_owned(), message_id.to_owned())]
}
