use axum::http::{header, HeaderMap};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use pedidos_orders::{Order, OrderDraft};

// -------------------------
// Request DTOs
// -------------------------

/// One order in a JSON submission body. Field names follow the public API.
///
/// `valor` takes a JSON number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub numero_controle: String,
    #[serde(default)]
    pub data_cadastro: Option<NaiveDateTime>,
    pub nome: String,
    pub valor: Decimal,
    #[serde(default)]
    pub quantidade: Option<i32>,
    pub codigo_cliente: i64,
}

impl From<OrderRequest> for OrderDraft {
    fn from(req: OrderRequest) -> Self {
        OrderDraft {
            control_number: req.numero_controle,
            registered_at: req.data_cadastro,
            customer_name: req.nome,
            unit_price: req.valor,
            quantity: req.quantidade,
            customer_code: req.codigo_cliente,
        }
    }
}

/// One `<item>` of an XML submission body.
///
/// quick-xml only hands element text to scalar requests, so `valor` is read
/// through the string form of `Decimal`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct XmlOrderItem {
    numero_controle: String,
    #[serde(default)]
    data_cadastro: Option<NaiveDateTime>,
    nome: String,
    #[serde(deserialize_with = "rust_decimal::serde::str::deserialize")]
    valor: Decimal,
    #[serde(default)]
    quantidade: Option<i32>,
    codigo_cliente: i64,
}

impl From<XmlOrderItem> for OrderDraft {
    fn from(item: XmlOrderItem) -> Self {
        OrderDraft {
            control_number: item.numero_controle,
            registered_at: item.data_cadastro,
            customer_name: item.nome,
            unit_price: item.valor,
            quantity: item.quantidade,
            customer_code: item.codigo_cliente,
        }
    }
}

/// XML submission body: any root element wrapping repeated `<item>` orders.
#[derive(Debug, Deserialize)]
struct XmlOrderBatch {
    #[serde(rename = "item", default)]
    items: Vec<XmlOrderItem>,
}

#[derive(Debug, Error)]
pub enum BodyError {
    #[error("unsupported content type: {0}")]
    UnsupportedMediaType(String),
    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid XML body: {0}")]
    Xml(#[from] quick_xml::de::DeError),
    #[error("body is not valid UTF-8")]
    Utf8(#[from] std::str::Utf8Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyFormat {
    Json,
    Xml,
}

fn body_format(headers: &HeaderMap) -> Result<BodyFormat, BodyError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.as_str() {
        "application/json" => Ok(BodyFormat::Json),
        "application/xml" | "text/xml" => Ok(BodyFormat::Xml),
        _ => Err(BodyError::UnsupportedMediaType(content_type.to_string())),
    }
}

/// Decode a submission body according to its `Content-Type`.
pub fn parse_order_batch(headers: &HeaderMap, body: &[u8]) -> Result<Vec<OrderDraft>, BodyError> {
    let drafts = match body_format(headers)? {
        BodyFormat::Json => serde_json::from_slice::<Vec<OrderRequest>>(body)?
            .into_iter()
            .map(OrderDraft::from)
            .collect(),
        BodyFormat::Xml => {
            let text = std::str::from_utf8(body)?;
            quick_xml::de::from_str::<XmlOrderBatch>(text)?
                .items
                .into_iter()
                .map(OrderDraft::from)
                .collect()
        }
    };
    Ok(drafts)
}

/// Query string of `GET /api/consultar-pedidos`.
///
/// An empty `numeroControle` is still a control number filter (matching nothing);
/// an empty `dataCadastro` is no filter at all.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSearchParams {
    pub numero_controle: Option<String>,
    pub data_cadastro: Option<String>,
}

impl OrderSearchParams {
    /// ISO-8601 date filter; an empty value counts as absent.
    pub fn date(&self) -> Result<Option<NaiveDate>, chrono::ParseError> {
        match self.data_cadastro.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map(Some),
        }
    }
}

// -------------------------
// Response DTOs
// -------------------------

/// A stored order. `valor` is the discounted total; `valorUnitario` the unit price.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: i64,
    pub numero_controle: String,
    pub data_cadastro: NaiveDateTime,
    pub nome: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub valor: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub valor_unitario: Decimal,
    pub quantidade: i32,
    pub codigo_cliente: i64,
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        OrderResponse {
            id: order.id_typed().as_i64(),
            numero_controle: order.control_number().to_string(),
            data_cadastro: order.registered_at(),
            nome: order.customer_name().to_string(),
            valor: order.total_price(),
            valor_unitario: order.unit_price(),
            quantidade: order.quantity(),
            codigo_cliente: order.customer_code().value(),
        }
    }
}

pub fn orders_to_response(orders: &[Order]) -> Vec<OrderResponse> {
    orders.iter().map(OrderResponse::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(content_type: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(header::CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        h
    }

    #[test]
    fn parses_json_batch_with_optional_fields() {
        let body = br#"[
            {"numeroControle": "1", "nome": "Ana", "valor": 100, "quantidade": 7, "codigoCliente": 3},
            {"numeroControle": "2", "dataCadastro": "2024-01-10T10:15:00", "nome": "Rui", "valor": "12.50", "codigoCliente": 4}
        ]"#;

        let drafts = parse_order_batch(&headers("application/json; charset=utf-8"), body).unwrap();

        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].quantity, Some(7));
        assert_eq!(drafts[0].registered_at, None);
        assert_eq!(drafts[1].quantity, None);
        assert_eq!(drafts[1].unit_price, Decimal::new(1250, 2));
        assert_eq!(
            drafts[1].registered_at,
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap().and_hms_opt(10, 15, 0)
        );
    }

    #[test]
    fn parses_xml_batch() {
        let body = br#"<List>
            <item>
                <numeroControle>X1</numeroControle>
                <nome>Ana</nome>
                <valor>100</valor>
                <quantidade>10</quantidade>
                <codigoCliente>2</codigoCliente>
            </item>
            <item>
                <numeroControle>X2</numeroControle>
                <nome>Rui</nome>
                <valor>5.5</valor>
                <codigoCliente>9</codigoCliente>
            </item>
            <item>
                <numeroControle>X3</numeroControle>
                <dataCadastro>2024-01-10T10:15:00</dataCadastro>
                <nome>Lia</nome>
                <valor>19.99</valor>
                <quantidade>6</quantidade>
                <codigoCliente>1</codigoCliente>
            </item>
        </List>"#;

        let drafts = parse_order_batch(&headers("application/xml"), body).unwrap();

        assert_eq!(drafts.len(), 3);
        assert_eq!(drafts[0].control_number, "X1");
        assert_eq!(drafts[0].unit_price, Decimal::new(100, 0));
        assert_eq!(drafts[0].quantity, Some(10));
        assert_eq!(drafts[1].unit_price, Decimal::new(55, 1));
        assert_eq!(drafts[1].quantity, None);
        assert_eq!(drafts[1].customer_code, 9);
        assert_eq!(drafts[2].unit_price, Decimal::new(1999, 2));
        assert_eq!(
            drafts[2].registered_at,
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap().and_hms_opt(10, 15, 0)
        );
    }

    #[test]
    fn non_numeric_xml_price_is_a_body_error() {
        let body = br#"<List><item>
            <numeroControle>X1</numeroControle>
            <nome>Ana</nome>
            <valor>cem</valor>
            <codigoCliente>2</codigoCliente>
        </item></List>"#;

        let err = parse_order_batch(&headers("text/xml"), body).unwrap_err();
        assert!(matches!(err, BodyError::Xml(_)));
    }

    #[test]
    fn rejects_unknown_content_type() {
        let err = parse_order_batch(&headers("text/plain"), b"[]").unwrap_err();
        assert!(matches!(err, BodyError::UnsupportedMediaType(ct) if ct == "text/plain"));
    }

    #[test]
    fn missing_required_field_is_a_body_error() {
        let body = br#"[{"numeroControle": "1", "valor": 100, "codigoCliente": 3}]"#;
        let err = parse_order_batch(&headers("application/json"), body).unwrap_err();
        assert!(matches!(err, BodyError::Json(_)));
    }

    #[test]
    fn empty_date_param_counts_as_absent() {
        let params = OrderSearchParams {
            numero_controle: None,
            data_cadastro: Some(String::new()),
        };
        assert_eq!(params.date().unwrap(), None);

        let params = OrderSearchParams {
            numero_controle: None,
            data_cadastro: Some("2024-01-10".to_string()),
        };
        assert_eq!(params.date().unwrap(), NaiveDate::from_ymd_opt(2024, 1, 10));

        let params = OrderSearchParams {
            numero_controle: None,
            data_cadastro: Some("10/01/2024".to_string()),
        };
        assert!(params.date().is_err());
    }
}
