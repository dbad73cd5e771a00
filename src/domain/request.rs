use crate::domain::value::Credentials;

/// Recipient field (`to`). Bulk sends carry a comma-joined list here.
pub const TO_FIELD: &str = "to";
/// Message body field (`text`).
pub const TEXT_FIELD: &str = "text";
/// Scheduled send time field (`sendDate`), `YYYY-MM-DD HH:MM:SS`.
pub const SEND_DATE_FIELD: &str = "sendDate";
/// Message id field (`messageId`) used by status lookups.
pub const MESSAGE_ID_FIELD: &str = "messageId";

/// Separator used when several recipients share one `to` field.
pub const RECIPIENT_SEPARATOR: &str = ",";

/// Join recipients into a single `to` value.
///
/// Recipients are neither validated nor escaped: an embedded comma produces an
/// extra recipient on the gateway side.
pub fn join_recipients<S: AsRef<str>>(recipients: &[S]) -> String {
    recipients
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(RECIPIENT_SEPARATOR)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Ordered string mapping sent to the gateway for one call.
///
/// Keys are unique; inserting an existing key replaces its value in place.
pub struct OutboundRequest {
    fields: Vec<(String, String)>,
}

impl OutboundRequest {
    /// Start a request with the credential fields as defaults.
    pub fn with_credentials(credentials: &Credentials) -> Self {
        let mut request = Self::default();
        request.extend(credentials.form_fields());
        request
    }

    /// Layer a field on top of the current mapping.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn extend(&mut self, fields: impl IntoIterator<Item = (String, String)>) {
        for (key, value) in fields {
            self.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn into_fields(self) -> Vec<(String, String)> {
        self.fields
    }
}
