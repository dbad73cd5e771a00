//! Client layer: orchestrates transport calls and maps transport ↔ domain.

use std::error::Error as StdError;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, trace, warn};

use crate::domain::{Balance, Credentials, DeliveryStatus, OutboundRequest, ValidationError};
use crate::transport::{SEND_SMS_OPERATION, SoapError, SoapSession};

const DEFAULT_SEND_ENDPOINT: &str = "https://api.payamak-iranian.com/sms/send";
const DEFAULT_BULK_ENDPOINT: &str = "https://api.payamak-iranian.com/sms/sendBulk";
const DEFAULT_BALANCE_ENDPOINT: &str = "https://api.payamak-iranian.com/sms/balance";
const DEFAULT_STATUS_ENDPOINT: &str = "https://api.payamak-iranian.com/sms/status";
const DEFAULT_SOAP_DESCRIPTOR: &str = "https://api.payamak-iranian.com/soap?wsdl";

type BoxError = Box<dyn StdError + Send + Sync>;

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn post_form(
        &self,
        url: &str,
        params: Vec<(String, String)>,
    ) -> Result<HttpResponse, BoxError>;

    fn get(&self, url: &str) -> Result<HttpResponse, BoxError>;

    fn post_xml(
        &self,
        url: &str,
        soap_action: &str,
        body: String,
    ) -> Result<HttpResponse, BoxError>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    fn read(response: reqwest::blocking::Response) -> Result<HttpResponse, BoxError> {
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(HttpResponse { status, body })
    }
}

impl HttpTransport for ReqwestTransport {
    fn post_form(
        &self,
        url: &str,
        params: Vec<(String, String)>,
    ) -> Result<HttpResponse, BoxError> {
        Self::read(self.client.post(url).form(&params).send()?)
    }

    fn get(&self, url: &str) -> Result<HttpResponse, BoxError> {
        Self::read(self.client.get(url).send()?)
    }

    fn post_xml(
        &self,
        url: &str,
        soap_action: &str,
        body: String,
    ) -> Result<HttpResponse, BoxError> {
        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "text/xml; charset=utf-8")
            .header("SOAPAction", format!("\"{soap_action}\""))
            .body(body)
            .send()?;
        Self::read(response)
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`GatewayClient`].
///
/// Non-numeric balance bodies and SOAP statuses other than `OK` are not errors;
/// they surface as `0.0` and `false` respectively.
pub enum GatewayError {
    /// Connection, TLS, DNS or body-read failure, or a SOAP protocol failure.
    ///
    /// The source is a `reqwest::Error` for HTTP failures and a [`SoapError`] for
    /// malformed service descriptions, malformed envelopes and SOAP faults.
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// One of the constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl GatewayError {
    /// The SOAP protocol failure behind this error, if there is one.
    pub fn soap_error(&self) -> Option<&SoapError> {
        match self {
            Self::Transport(source) => source.downcast_ref::<SoapError>(),
            Self::Validation(_) => None,
        }
    }
}

impl From<SoapError> for GatewayError {
    fn from(value: SoapError) -> Self {
        Self::Transport(Box::new(value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Endpoints {
    send: String,
    bulk: String,
    balance: String,
    status: String,
    soap_descriptor: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            send: DEFAULT_SEND_ENDPOINT.to_owned(),
            bulk: DEFAULT_BULK_ENDPOINT.to_owned(),
            balance: DEFAULT_BALANCE_ENDPOINT.to_owned(),
            status: DEFAULT_STATUS_ENDPOINT.to_owned(),
            soap_descriptor: DEFAULT_SOAP_DESCRIPTOR.to_owned(),
        }
    }
}

impl Endpoints {
    fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("send endpoint", &self.send),
            ("bulk endpoint", &self.bulk),
            ("balance endpoint", &self.balance),
            ("status endpoint", &self.status),
            ("SOAP descriptor", &self.soap_descriptor),
        ] {
            url::Url::parse(value).map_err(|_| ValidationError::InvalidUrl {
                field,
                input: value.clone(),
            })?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
/// Builder for [`GatewayClient`].
///
/// Use this when you need to point the client at another host (staging, a local
/// mock) or set the user-agent. There is no timeout setting; the HTTP client
/// default applies.
pub struct GatewayClientBuilder {
    credentials: Credentials,
    endpoints: Endpoints,
    user_agent: Option<String>,
}

impl GatewayClientBuilder {
    /// Create a builder with the gateway's default endpoints.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            endpoints: Endpoints::default(),
            user_agent: None,
        }
    }

    /// Override the `sms/send` endpoint (single and scheduled sends).
    pub fn send_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoints.send = endpoint.into();
        self
    }

    /// Override the `sms/sendBulk` endpoint.
    pub fn bulk_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoints.bulk = endpoint.into();
        self
    }

    /// Override the `sms/balance` endpoint.
    pub fn balance_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoints.balance = endpoint.into();
        self
    }

    /// Override the `sms/status` endpoint.
    pub fn status_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoints.status = endpoint.into();
        self
    }

    /// Override the URL of the SOAP service description (WSDL).
    pub fn soap_descriptor(mut self, url: impl Into<String>) -> Self {
        self.endpoints.soap_descriptor = url.into();
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a [`GatewayClient`].
    ///
    /// Fails with [`GatewayError::Validation`] when an endpoint is not an absolute URL.
    pub fn build(self) -> Result<GatewayClient, GatewayError> {
        self.endpoints.validate()?;

        // One connection per call: idle connections are never kept.
        let mut builder = reqwest::blocking::Client::builder().pool_max_idle_per_host(0);
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| GatewayError::Transport(Box::new(err)))?;

        Ok(GatewayClient::with_transport(
            self.credentials,
            self.endpoints,
            Arc::new(ReqwestTransport { client }),
        ))
    }
}

/// Blocking client for the Payamak Iranian SMS gateway.
///
/// Every operation performs one blocking round trip and returns once it completes
/// or fails. The REST operations post form-encoded bodies; the SOAP operations
/// fetch the service description on first use and reuse it for the lifetime of
/// the client.
///
/// The client is built on `reqwest::blocking` and must not be used from within an
/// async runtime's worker threads.
pub struct GatewayClient {
    credentials: Credentials,
    endpoints: Endpoints,
    http: Arc<dyn HttpTransport>,
    soap_session: Mutex<Option<Arc<SoapSession>>>,
}

impl GatewayClient {
    /// Create a client with the default endpoints.
    ///
    /// All three values must be non-empty; nothing else is checked.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        sender_id: impl Into<String>,
    ) -> Result<Self, GatewayError> {
        Self::builder(Credentials::new(username, password, sender_id)?).build()
    }

    /// Start building a client with custom settings.
    pub fn builder(credentials: Credentials) -> GatewayClientBuilder {
        GatewayClientBuilder::new(credentials)
    }

    fn with_transport(
        credentials: Credentials,
        endpoints: Endpoints,
        http: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            credentials,
            endpoints,
            http,
            soap_session: Mutex::new(None),
        }
    }

    /// Send one message to one recipient.
    ///
    /// Returns `true` whenever the gateway answered; the response body is not
    /// interpreted.
    pub fn send_sms(&self, to: impl AsRef<str>, message: &str) -> Result<bool, GatewayError> {
        let params = crate::transport::encode_send_sms_form(to.as_ref(), message);
        self.post_form("send_sms", &self.endpoints.send, params)?;
        Ok(true)
    }

    /// Send one message to several recipients through the bulk endpoint.
    ///
    /// Recipients are joined with `,` and are neither validated nor escaped.
    pub fn send_bulk_sms<S: AsRef<str>>(
        &self,
        recipients: &[S],
        message: &str,
    ) -> Result<bool, GatewayError> {
        let params = crate::transport::encode_send_bulk_sms_form(recipients, message);
        self.post_form("send_bulk_sms", &self.endpoints.bulk, params)?;
        Ok(true)
    }

    /// Schedule a message for `send_date` (`YYYY-MM-DD HH:MM:SS`).
    ///
    /// `send_date` is sent verbatim: it is not parsed, not checked to be in the future,
    /// and carries no timezone.
    pub fn send_scheduled_sms(
        &self,
        to: impl AsRef<str>,
        message: &str,
        send_date: &str,
    ) -> Result<bool, GatewayError> {
        let params =
            crate::transport::encode_send_scheduled_sms_form(to.as_ref(), message, send_date);
        self.post_form("send_scheduled_sms", &self.endpoints.send, params)?;
        Ok(true)
    }

    /// Fetch the account balance.
    ///
    /// A body that does not start with a number yields a zero balance (and a
    /// `warn!` event) rather than an error.
    pub fn get_balance(&self) -> Result<Balance, GatewayError> {
        let body = self.post_form(
            "get_balance",
            &self.endpoints.balance,
            crate::transport::encode_get_balance_form(),
        )?;

        match crate::transport::decode_balance_body(&body) {
            Some(balance) => Ok(balance),
            None => {
                warn!(
                    body_len = body.len(),
                    "balance response is not numeric; reporting zero"
                );
                Ok(Balance::default())
            }
        }
    }

    /// Look up the delivery status of a sent message.
    ///
    /// The body is returned unmodified.
    pub fn get_sms_status(&self, message_id: &str) -> Result<DeliveryStatus, GatewayError> {
        let params = crate::transport::encode_get_sms_status_form(message_id);
        let body = self.post_form("get_sms_status", &self.endpoints.status, params)?;
        Ok(DeliveryStatus::new(body))
    }

    /// Send one message to one recipient over SOAP.
    ///
    /// Returns `true` only when the result status is exactly `OK`.
    pub fn send_sms_soap(&self, to: impl AsRef<str>, message: &str) -> Result<bool, GatewayError> {
        self.send_soap("send_sms_soap", to.as_ref(), message)
    }

    /// Send one message to several recipients over SOAP.
    ///
    /// Recipients are joined exactly as in [`GatewayClient::send_bulk_sms`].
    pub fn send_bulk_sms_soap<S: AsRef<str>>(
        &self,
        recipients: &[S],
        message: &str,
    ) -> Result<bool, GatewayError> {
        let to = crate::domain::join_recipients(recipients);
        self.send_soap("send_bulk_sms_soap", &to, message)
    }

    fn post_form(
        &self,
        operation: &'static str,
        url: &str,
        params: Vec<(String, String)>,
    ) -> Result<String, GatewayError> {
        let mut request = OutboundRequest::with_credentials(&self.credentials);
        request.extend(params);

        debug!(operation, endpoint = url, "posting form request");
        let response = self
            .http
            .post_form(url, request.into_fields())
            .map_err(GatewayError::Transport)?;
        trace!(
            operation,
            status = response.status,
            body_len = response.body.len(),
            "received form response"
        );

        Ok(response.body)
    }

    fn send_soap(
        &self,
        operation: &'static str,
        to: &str,
        message: &str,
    ) -> Result<bool, GatewayError> {
        let session = self.soap_session()?;

        let mut request = OutboundRequest::with_credentials(&self.credentials);
        request.extend(crate::transport::encode_send_sms_form(to, message));
        let call = crate::transport::encode_call(&session, SEND_SMS_OPERATION, request.fields())?;

        debug!(
            operation,
            endpoint = %call.address,
            soap_action = %call.action,
            "invoking SOAP procedure"
        );
        let response = self
            .http
            .post_xml(&call.address, &call.action, call.envelope)
            .map_err(GatewayError::Transport)?;
        trace!(
            operation,
            status = response.status,
            body_len = response.body.len(),
            "received SOAP response"
        );

        let record = crate::transport::decode_call_response(&response.body)?;
        Ok(record.is_ok())
    }

    /// Return the cached SOAP session, creating it on first use.
    ///
    /// The lock is held across creation so concurrent first calls fetch the
    /// description once. A failed fetch leaves the cache empty.
    fn soap_session(&self) -> Result<Arc<SoapSession>, GatewayError> {
        let mut cached = self
            .soap_session
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(session) = cached.as_ref() {
            return Ok(Arc::clone(session));
        }

        let descriptor = &self.endpoints.soap_descriptor;
        debug!(descriptor = %descriptor, "creating SOAP session");
        let response = self
            .http
            .get(descriptor)
            .map_err(GatewayError::Transport)?;
        let session = Arc::new(crate::transport::decode_service_description(
            &response.body,
        )?);

        *cached = Some(Arc::clone(&session));
        Ok(session)
    }
}
