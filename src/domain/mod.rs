//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::{
    MESSAGE_ID_FIELD, OutboundRequest, RECIPIENT_SEPARATOR, SEND_DATE_FIELD, TEXT_FIELD, TO_FIELD,
    join_recipients,
};
pub use response::{Balance, DeliveryStatus, SOAP_STATUS_OK, SoapRecord};
pub use validation::ValidationError;
pub use value::{Credentials, Password, PhoneNumber, SenderId, Username};
