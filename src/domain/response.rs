use std::collections::BTreeMap;

/// Status value the SOAP interface reports for an accepted message.
pub const SOAP_STATUS_OK: &str = "OK";

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
/// Account balance as reported by the balance endpoint.
///
/// A body that does not start with a number yields `0.0`, which is
/// indistinguishable from an empty account.
pub struct Balance(f64);

impl Balance {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<Balance> for f64 {
    fn from(value: Balance) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Delivery status body exactly as returned by the status endpoint.
pub struct DeliveryStatus(String);

impl DeliveryStatus {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Leaf fields of a SOAP procedure result, keyed by element local name.
///
/// When a name repeats, the first occurrence wins.
pub struct SoapRecord {
    fields: BTreeMap<String, String>,
}

impl SoapRecord {
    pub fn new(fields: BTreeMap<String, String>) -> Self {
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// The `status` field, if the result carried one.
    pub fn status(&self) -> Option<&str> {
        self.get("status")
    }

    /// `true` only when `status` is exactly `"OK"` (case-sensitive, untrimmed).
    pub fn is_ok(&self) -> bool {
        self.status() == Some(SOAP_STATUS_OK)
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }
}
