//! Transport layer: wire-format details (form fields, balance bodies, SOAP XML).

mod balance;
mod form;
mod soap;

pub use balance::decode_balance_body;
pub use form::{
    encode_get_balance_form, encode_get_sms_status_form, encode_send_bulk_sms_form,
    encode_send_scheduled_sms_form, encode_send_sms_form,
};
pub use soap::{
    SEND_SMS_OPERATION, SoapError, SoapSession, decode_call_response,
    decode_service_description, encode_call,
};
