use std::collections::BTreeMap;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::domain::SoapRecord;

const SOAP_ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// Remote procedure used for both single and bulk SOAP sends.
pub const SEND_SMS_OPERATION: &str = "SendSMS";

#[derive(Debug, thiserror::Error)]
pub enum SoapError {
    #[error("invalid XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("failed to write XML: {0}")]
    Write(#[from] std::io::Error),

    #[error("service description has no SOAP address")]
    MissingServiceAddress,

    #[error("service description does not bind operation {operation}")]
    UnknownOperation { operation: String },

    #[error("response is not a SOAP envelope with a body")]
    MalformedEnvelope,

    #[error("SOAP fault {code:?}: {message:?}")]
    Fault {
        code: Option<String>,
        message: Option<String>,
    },
}

impl From<quick_xml::events::attributes::AttrError> for SoapError {
    fn from(value: quick_xml::events::attributes::AttrError) -> Self {
        Self::Xml(value.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Parsed service description: where to post envelopes and how to label them.
pub struct SoapSession {
    address: String,
    namespace: Option<String>,
    actions: BTreeMap<String, String>,
}

impl SoapSession {
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// `SOAPAction` for a bound operation; empty when the binding declares none.
    pub fn action(&self, operation: &str) -> Option<&str> {
        self.actions.get(operation).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapCall {
    pub address: String,
    pub action: String,
    pub envelope: String,
}

pub fn decode_service_description(wsdl: &str) -> Result<SoapSession, SoapError> {
    let mut reader = Reader::from_str(wsdl);
    reader.config_mut().trim_text(true);

    let mut address = None;
    let mut namespace = None;
    let mut actions = BTreeMap::<String, String>::new();
    let mut in_binding = false;
    let mut current_operation: Option<String> = None;

    loop {
        let (element, is_empty) = match reader.read_event()? {
            Event::Start(element) => (element, false),
            Event::Empty(element) => (element, true),
            Event::End(element) => {
                match element.local_name().as_ref() {
                    b"binding" => in_binding = false,
                    b"operation" if in_binding => current_operation = None,
                    _ => {}
                }
                continue;
            }
            Event::Eof => break,
            _ => continue,
        };

        match element.local_name().as_ref() {
            b"definitions" => namespace = attribute(&element, b"targetNamespace")?,
            b"binding" if !is_empty => in_binding = true,
            b"address" if address.is_none() => address = attribute(&element, b"location")?,
            b"operation" if in_binding => {
                if let Some(action) = attribute(&element, b"soapAction")? {
                    if let Some(operation) = current_operation.as_ref() {
                        actions.insert(operation.clone(), action);
                    }
                } else if let Some(name) = attribute(&element, b"name")? {
                    actions.entry(name.clone()).or_default();
                    if !is_empty {
                        current_operation = Some(name);
                    }
                }
            }
            _ => {}
        }
    }

    Ok(SoapSession {
        address: address.ok_or(SoapError::MissingServiceAddress)?,
        namespace: namespace.filter(|ns| !ns.is_empty()),
        actions,
    })
}

pub fn encode_call(
    session: &SoapSession,
    operation: &str,
    fields: &[(String, String)],
) -> Result<SoapCall, SoapError> {
    let action = session
        .action(operation)
        .ok_or_else(|| SoapError::UnknownOperation {
            operation: operation.to_owned(),
        })?
        .to_owned();

    let procedure = match session.namespace() {
        Some(_) => format!("tns:{operation}"),
        None => operation.to_owned(),
    };
    let mut procedure_start = BytesStart::new(procedure.as_str());
    if let Some(ns) = session.namespace() {
        procedure_start.push_attribute(("xmlns:tns", ns));
    }

    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer.write_event(Event::Start(
        BytesStart::new("soap:Envelope").with_attributes([("xmlns:soap", SOAP_ENVELOPE_NS)]),
    ))?;
    writer.write_event(Event::Start(BytesStart::new("soap:Body")))?;
    writer.write_event(Event::Start(procedure_start))?;
    for (key, value) in fields {
        writer.write_event(Event::Start(BytesStart::new(key.as_str())))?;
        writer.write_event(Event::Text(BytesText::new(value)))?;
        writer.write_event(Event::End(BytesEnd::new(key.as_str())))?;
    }
    writer.write_event(Event::End(BytesEnd::new(procedure.as_str())))?;
    writer.write_event(Event::End(BytesEnd::new("soap:Body")))?;
    writer.write_event(Event::End(BytesEnd::new("soap:Envelope")))?;

    Ok(SoapCall {
        address: session.address().to_owned(),
        action,
        envelope: String::from_utf8_lossy(&writer.into_inner()).into_owned(),
    })
}

/// Decode a response envelope into the leaf fields of its body.
///
/// When a leaf name repeats, the shallowest occurrence wins (the first one among
/// equals), so the result's own `status` is never shadowed by a nested one.
/// A `Fault` anywhere in the body is returned as [`SoapError::Fault`].
pub fn decode_call_response(xml: &str) -> Result<SoapRecord, SoapError> {
    // Leaf text is kept untrimmed.
    let mut reader = Reader::from_str(xml);

    let mut seen_envelope = false;
    let mut seen_body = false;
    let mut in_body = false;
    let mut fault = false;
    // (local name, text, has child elements) for every open element inside the body.
    let mut open = Vec::<(String, String, bool)>::new();
    // Leaf name -> (depth below Body, text).
    let mut leaves = BTreeMap::<String, (usize, String)>::new();

    loop {
        match reader.read_event()? {
            Event::Start(element) => {
                let name = local_name(&element);
                if in_body {
                    if name == "Fault" {
                        fault = true;
                    }
                    if let Some(parent) = open.last_mut() {
                        parent.2 = true;
                    }
                    open.push((name, String::new(), false));
                } else if name == "Envelope" {
                    seen_envelope = true;
                } else if name == "Body" && seen_envelope {
                    seen_body = true;
                    in_body = true;
                }
            }
            Event::Empty(element) => {
                let name = local_name(&element);
                if in_body {
                    if let Some(parent) = open.last_mut() {
                        parent.2 = true;
                    }
                    record_leaf(&mut leaves, name, open.len() + 1, String::new());
                } else if name == "Body" && seen_envelope {
                    seen_body = true;
                }
            }
            Event::Text(text) => {
                if let Some(current) = open.last_mut() {
                    current.1.push_str(&text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let Some(current) = open.last_mut() {
                    current.1.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::End(_) => {
                if let Some((name, text, has_children)) = open.pop() {
                    if !has_children {
                        record_leaf(&mut leaves, name, open.len() + 1, text);
                    }
                } else if in_body {
                    in_body = false;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_body {
        return Err(SoapError::MalformedEnvelope);
    }

    let fields = leaves
        .into_iter()
        .map(|(name, (_, text))| (name, text))
        .collect::<BTreeMap<_, _>>();

    if fault {
        return Err(SoapError::Fault {
            code: fields
                .get("faultcode")
                .or_else(|| fields.get("Value"))
                .cloned(),
            message: fields
                .get("faultstring")
                .or_else(|| fields.get("Text"))
                .cloned(),
        });
    }

    Ok(SoapRecord::new(fields))
}

fn record_leaf(
    leaves: &mut BTreeMap<String, (usize, String)>,
    name: String,
    depth: usize,
    text: String,
) {
    let keep_existing = leaves
        .get(&name)
        .is_some_and(|(existing, _)| *existing <= depth);
    if !keep_existing {
        leaves.insert(name, (depth, text));
    }
}

fn local_name(element: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(element.local_name().as_ref()).into_owned()
}

fn attribute(element: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>, SoapError> {
    for attr in element.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == name {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}
