//! SOAP envelopes for AtB InfoTransit.
//!
//! InfoTransit is a SOAP 1.2 service whose results are JSON documents
//! embedded as text in a `<{Method}Result>` element. Both envelopes are
//! modelled as serde types and go through quick-xml, so escaping, CDATA and
//! namespace prefixes are handled by the XML layer.

use serde::{Deserialize, Serialize};

use crate::domain::NodeId;

use super::error::AtbError;

/// InfoTransit XML namespace.
const NAMESPACE: &str = "http://miz.it/infotransit";

const SOAP12_NAMESPACE: &str = "http://www.w3.org/2003/05/soap-envelope";
const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

/// InfoTransit methods we call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// List every bus stop.
    BusStopsList,
    /// Real-time departure forecast for one stop.
    RealTimeForecast,
}

impl Method {
    /// The SOAP operation name.
    pub fn name(self) -> &'static str {
        match self {
            Method::BusStopsList => "GetBusStopsList",
            Method::RealTimeForecast => "getUserRealTimeForecast",
        }
    }
}

/// A call with its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    BusStopsList,
    RealTimeForecast(NodeId),
}

impl Call {
    pub fn method(self) -> Method {
        match self {
            Call::BusStopsList => Method::BusStopsList,
            Call::RealTimeForecast(_) => Method::RealTimeForecast,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename = "soap12:Envelope")]
struct RequestEnvelope<'a> {
    #[serde(rename = "@xmlns:xsi")]
    xsi: &'static str,
    #[serde(rename = "@xmlns:xsd")]
    xsd: &'static str,
    #[serde(rename = "@xmlns:soap12")]
    soap12: &'static str,
    #[serde(rename = "soap12:Body")]
    body: RequestBody<'a>,
}

#[derive(Debug, Serialize)]
struct RequestBody<'a> {
    #[serde(rename = "$value")]
    operation: Operation<'a>,
}

#[derive(Debug, Serialize)]
enum Operation<'a> {
    #[serde(rename = "GetBusStopsList")]
    BusStopsList {
        #[serde(rename = "@xmlns")]
        xmlns: &'static str,
        auth: Auth<'a>,
    },
    #[serde(rename = "getUserRealTimeForecast")]
    RealTimeForecast {
        #[serde(rename = "@xmlns")]
        xmlns: &'static str,
        auth: Auth<'a>,
        #[serde(rename = "busStopId")]
        bus_stop_id: u32,
    },
}

#[derive(Debug, Serialize)]
struct Auth<'a> {
    user: &'a str,
    password: &'a str,
}

/// Build the request envelope for `call`.
pub fn envelope(call: Call, username: &str, password: &str) -> Result<String, AtbError> {
    let auth = Auth {
        user: username,
        password,
    };
    let operation = match call {
        Call::BusStopsList => Operation::BusStopsList {
            xmlns: NAMESPACE,
            auth,
        },
        Call::RealTimeForecast(node_id) => Operation::RealTimeForecast {
            xmlns: NAMESPACE,
            auth,
            bus_stop_id: node_id.get(),
        },
    };

    let envelope = RequestEnvelope {
        xsi: XSI_NAMESPACE,
        xsd: XSD_NAMESPACE,
        soap12: SOAP12_NAMESPACE,
        body: RequestBody { operation },
    };

    let xml = quick_xml::se::to_string(&envelope)
        .map_err(|e| AtbError::Soap(format!("failed to build {} request: {e}", call.method().name())))?;
    Ok(format!("{XML_DECLARATION}{xml}"))
}

/// Response envelope. Element names are matched without their namespace
/// prefix, so `soap:Body` and `soap12:Body` both land here.
#[derive(Debug, Deserialize)]
struct ResponseEnvelope {
    #[serde(rename = "Body")]
    body: ResponseBody,
}

#[derive(Debug, Deserialize)]
struct ResponseBody {
    #[serde(rename = "$value")]
    content: BodyContent,
}

#[derive(Debug, Deserialize)]
enum BodyContent {
    #[serde(rename = "GetBusStopsListResponse")]
    BusStopsList(MethodResponse),
    #[serde(rename = "getUserRealTimeForecastResponse")]
    RealTimeForecast(MethodResponse),
    Fault(Fault),
}

#[derive(Debug, Deserialize)]
struct MethodResponse {
    #[serde(rename = "GetBusStopsListResult", alias = "getUserRealTimeForecastResult")]
    result: Option<String>,
}

/// SOAP fault. 1.2 puts the message in `Reason/Text`; 1.1 servers send
/// `faultstring`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Fault {
    #[serde(rename = "Reason")]
    reason: Option<FaultReason>,
    #[serde(rename = "faultstring")]
    fault_string: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FaultReason {
    #[serde(rename = "Text")]
    text: FaultText,
}

#[derive(Debug, Deserialize)]
struct FaultText {
    #[serde(rename = "$text", default)]
    value: String,
}

impl Fault {
    fn message(self) -> String {
        self.reason
            .map(|r| r.text.value)
            .or(self.fault_string)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "no reason given".to_string())
    }
}

/// Extract the text of the `<{Method}Result>` element.
pub fn extract_result(method: Method, body: &str) -> Result<String, AtbError> {
    let envelope: ResponseEnvelope = quick_xml::de::from_str(body)
        .map_err(|e| AtbError::Soap(format!("malformed {} response: {e}", method.name())))?;

    let response = match (method, envelope.body.content) {
        (Method::BusStopsList, BodyContent::BusStopsList(response))
        | (Method::RealTimeForecast, BodyContent::RealTimeForecast(response)) => response,
        (_, BodyContent::Fault(fault)) => {
            return Err(AtbError::Soap(format!("fault from {}: {}", method.name(), fault.message())));
        }
        (_, _) => {
            return Err(AtbError::Soap(format!(
                "response is not a {}Response",
                method.name()
            )));
        }
    };

    match response.result {
        Some(result) if !result.trim().is_empty() => Ok(result),
        Some(_) => Err(AtbError::Soap(format!("{}Result is empty", method.name()))),
        None => Err(AtbError::Soap(format!(
            "response has no {}Result element",
            method.name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(method: &str, result: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:soap="http://www.w3.org/2003/05/soap-envelope" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <soap:Body>
    <{method}Response xmlns="http://miz.it/infotransit">
      {result}
    </{method}Response>
  </soap:Body>
</soap:Envelope>"#
        )
    }

    #[test]
    fn method_names() {
        assert_eq!(Method::BusStopsList.name(), "GetBusStopsList");
        assert_eq!(Method::RealTimeForecast.name(), "getUserRealTimeForecast");
        assert_eq!(
            Call::RealTimeForecast(NodeId::from(1)).method(),
            Method::RealTimeForecast
        );
    }

    #[test]
    fn envelope_contains_auth_and_params() {
        let xml = envelope(
            Call::RealTimeForecast(NodeId::from(16011376)),
            "user",
            "secret",
        )
        .unwrap();

        assert!(xml.starts_with(XML_DECLARATION));
        assert!(xml.contains("<soap12:Envelope "));
        assert!(xml.contains(r#"xmlns:soap12="http://www.w3.org/2003/05/soap-envelope""#));
        assert!(xml.contains("<soap12:Body>"));
        assert!(xml.contains(r#"<getUserRealTimeForecast xmlns="http://miz.it/infotransit">"#));
        assert!(xml.contains("<auth><user>user</user><password>secret</password></auth>"));
        assert!(xml.contains("<busStopId>16011376</busStopId>"));
        assert!(xml.contains("</getUserRealTimeForecast>"));
    }

    #[test]
    fn stop_list_envelope_has_no_stop_id() {
        let xml = envelope(Call::BusStopsList, "user", "secret").unwrap();
        assert!(xml.contains(r#"<GetBusStopsList xmlns="http://miz.it/infotransit">"#));
        assert!(!xml.contains("busStopId"));
    }

    #[test]
    fn envelope_escapes_credentials() {
        let xml = envelope(Call::BusStopsList, "a&b", "<pw>").unwrap();
        assert!(xml.contains("<user>a&amp;b</user>"));
        assert!(xml.contains("<password>&lt;pw&gt;</password>"));
    }

    #[test]
    fn extracts_and_unescapes_result() {
        let body = response(
            "GetBusStopsList",
            "<GetBusStopsListResult>{&quot;Fermate&quot;:[]}</GetBusStopsListResult>",
        );

        let result = extract_result(Method::BusStopsList, &body).unwrap();
        assert_eq!(result, r#"{"Fermate":[]}"#);
    }

    #[test]
    fn extracts_forecast_result() {
        let body = response(
            "getUserRealTimeForecast",
            "<getUserRealTimeForecastResult>{&quot;total&quot;:0}</getUserRealTimeForecastResult>",
        );

        let result = extract_result(Method::RealTimeForecast, &body).unwrap();
        assert_eq!(result, r#"{"total":0}"#);
    }

    #[test]
    fn extracts_namespace_prefixed_result() {
        let body = r#"<s:Envelope xmlns:s="http://www.w3.org/2003/05/soap-envelope">
  <s:Body>
    <m:GetBusStopsListResponse xmlns:m="http://miz.it/infotransit">
      <m:GetBusStopsListResult>{&quot;Fermate&quot;:[]}</m:GetBusStopsListResult>
    </m:GetBusStopsListResponse>
  </s:Body>
</s:Envelope>"#;

        let result = extract_result(Method::BusStopsList, body).unwrap();
        assert_eq!(result, r#"{"Fermate":[]}"#);
    }

    #[test]
    fn extracts_cdata_result() {
        let body = response(
            "GetBusStopsList",
            r#"<GetBusStopsListResult><![CDATA[{"Fermate":[]}]]></GetBusStopsListResult>"#,
        );

        let result = extract_result(Method::BusStopsList, &body).unwrap();
        assert_eq!(result, r#"{"Fermate":[]}"#);
    }

    #[test]
    fn ignores_soap_header() {
        let body = r#"<soap:Envelope xmlns:soap="http://www.w3.org/2003/05/soap-envelope">
  <soap:Header><Session>abc</Session></soap:Header>
  <soap:Body>
    <GetBusStopsListResponse><GetBusStopsListResult>{}</GetBusStopsListResult></GetBusStopsListResponse>
  </soap:Body>
</soap:Envelope>"#;

        assert_eq!(extract_result(Method::BusStopsList, body).unwrap(), "{}");
    }

    #[test]
    fn missing_result_is_an_error() {
        let body = response("GetBusStopsList", "");
        let err = extract_result(Method::BusStopsList, &body).unwrap_err();
        assert!(matches!(err, AtbError::Soap(_)));
        assert!(err.to_string().contains("GetBusStopsListResult"));
    }

    #[test]
    fn empty_result_is_an_error() {
        let body = response("GetBusStopsList", "<GetBusStopsListResult></GetBusStopsListResult>");
        let err = extract_result(Method::BusStopsList, &body).unwrap_err();
        assert!(matches!(err, AtbError::Soap(_)));
        assert!(err.to_string().contains("GetBusStopsListResult"));
    }

    #[test]
    fn response_for_other_method_is_an_error() {
        let body = response(
            "GetBusStopsList",
            "<GetBusStopsListResult>{}</GetBusStopsListResult>",
        );
        let err = extract_result(Method::RealTimeForecast, &body).unwrap_err();
        assert!(err.to_string().contains("getUserRealTimeForecastResponse"));
    }

    #[test]
    fn fault_is_an_error_with_reason() {
        let body = r#"<soap:Envelope xmlns:soap="http://www.w3.org/2003/05/soap-envelope">
  <soap:Body>
    <soap:Fault>
      <soap:Code><soap:Value>soap:Receiver</soap:Value></soap:Code>
      <soap:Reason><soap:Text xml:lang="en">Server was unable to process request</soap:Text></soap:Reason>
    </soap:Fault>
  </soap:Body>
</soap:Envelope>"#;

        let err = extract_result(Method::BusStopsList, body).unwrap_err();
        assert!(matches!(err, AtbError::Soap(_)));
        assert!(err.to_string().contains("Server was unable to process request"));
    }

    #[test]
    fn malformed_xml_is_an_error() {
        assert!(matches!(
            extract_result(Method::BusStopsList, "<GetBusStopsListResult>{}"),
            Err(AtbError::Soap(_))
        ));
        assert!(matches!(
            extract_result(Method::BusStopsList, "not xml at all"),
            Err(AtbError::Soap(_))
        ));
    }
}
