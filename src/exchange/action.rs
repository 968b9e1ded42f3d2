use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::ProxyError;

pub const ACTION_CANDLES: &str = "getCandles";
pub const ACTION_ORDER: &str = "placeOrder";

/// Inbound action, selected by the `action` field.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "action")]
pub enum ProxyAction {
    #[serde(rename = "getCandles")]
    Candles(CandlesRequest),
    #[serde(rename = "placeOrder")]
    Order(OrderRequest),
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandlesRequest {
    pub trading_pair: String,
    /// Seconds per bucket; the exchange rejects values it does not support
    pub granularity: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    /// Kept raw so an unknown or absent side is a validation error, not a decode error
    #[serde(default)]
    pub side: Option<String>,
    pub product_id: String,
    #[serde(rename = "type", default = "default_order_type")]
    pub order_type: String,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub funds: Option<String>,
}

fn default_order_type() -> String {
    "market".to_string()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn parse(side: &str) -> Option<Self> {
        if side.eq_ignore_ascii_case("buy") {
            Some(Self::Buy)
        } else if side.eq_ignore_ascii_case("sell") {
            Some(Self::Sell)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

/// Signed request target: the path includes the query string and `body` is the
/// exact string sent (empty for GET).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExchangeRequest {
    pub method: Method,
    pub path: String,
    pub body: String,
}

#[derive(Serialize)]
struct MarketOrderBody<'a> {
    side: &'a str,
    product_id: &'a str,
    #[serde(rename = "type")]
    order_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    funds: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<&'a str>,
}

impl ProxyAction {
    /// Decode a raw inbound payload. A missing or unrecognised `action` is
    /// reported separately from a recognised action with malformed fields.
    pub fn decode(raw: &[u8]) -> Result<Self, ProxyError> {
        let value: serde_json::Value =
            serde_json::from_slice(raw).map_err(|e| ProxyError::InvalidBody(e.to_string()))?;

        match value.get("action").and_then(serde_json::Value::as_str) {
            Some(ACTION_CANDLES) | Some(ACTION_ORDER) => {}
            _ => return Err(ProxyError::UnsupportedAction),
        }

        serde_json::from_value(value).map_err(|e| ProxyError::InvalidBody(e.to_string()))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Candles(_) => ACTION_CANDLES,
            Self::Order(_) => ACTION_ORDER,
        }
    }

    /// Verb phrase used in downstream failure messages
    pub fn failure_context(&self) -> &'static str {
        match self {
            Self::Candles(_) => "fetch candles",
            Self::Order(_) => "place order",
        }
    }

    /// Validate and build the downstream request. No I/O happens here.
    pub fn build_request(&self) -> Result<ExchangeRequest, ProxyError> {
        match self {
            Self::Candles(req) => req.build_request(),
            Self::Order(req) => req.build_request(),
        }
    }

    /// Turn a 200 body into the value relayed to the caller
    pub fn parse_success(&self, body: &str) -> Result<serde_json::Value, ProxyError> {
        match self {
            Self::Candles(_) => {
                // [[time, low, high, open, close, volume], ...]; numbers keep their form
                let candles: Vec<Vec<serde_json::Number>> = serde_json::from_str(body)
                    .map_err(|e| ProxyError::Internal(format!("Unexpected candles response: {}", e)))?;
                Ok(serde_json::Value::Array(
                    candles
                        .into_iter()
                        .map(|row| row.into_iter().map(serde_json::Value::Number).collect())
                        .collect(),
                ))
            }
            Self::Order(_) => serde_json::from_str(body)
                .map_err(|e| ProxyError::Internal(format!("Unexpected order response: {}", e))),
        }
    }
}

impl CandlesRequest {
    fn build_request(&self) -> Result<ExchangeRequest, ProxyError> {
        let pair_ok = !self.trading_pair.is_empty()
            && self
                .trading_pair
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !pair_ok {
            return Err(ProxyError::Validation("Invalid trading pair.".into()));
        }

        Ok(ExchangeRequest {
            method: Method::GET,
            path: format!(
                "/products/{}/candles?granularity={}",
                self.trading_pair, self.granularity
            ),
            body: String::new(),
        })
    }
}

impl OrderRequest {
    fn build_request(&self) -> Result<ExchangeRequest, ProxyError> {
        let side = self.side.as_deref().and_then(OrderSide::parse).ok_or_else(|| {
            ProxyError::Validation("Invalid order side. Must be 'buy' or 'sell'.".into())
        })?;

        let (funds, size) = match side {
            OrderSide::Buy => {
                let funds = non_empty(&self.funds).ok_or_else(|| {
                    ProxyError::Validation("Funds are required for market buy orders.".into())
                })?;
                (Some(funds), None)
            }
            OrderSide::Sell => {
                let size = non_empty(&self.size).ok_or_else(|| {
                    ProxyError::Validation("Size is required for market sell orders.".into())
                })?;
                (None, Some(size))
            }
        };

        let body = serde_json::to_string(&MarketOrderBody {
            side: side.as_str(),
            product_id: &self.product_id,
            order_type: &self.order_type,
            funds,
            size,
        })
        .map_err(|e| ProxyError::Internal(e.to_string()))?;

        Ok(ExchangeRequest {
            method: Method::POST,
            path: "/orders".to_string(),
            body,
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(side: &str, size: Option<&str>, funds: Option<&str>) -> ProxyAction {
        ProxyAction::Order(OrderRequest {
            side: Some(side.to_string()),
            product_id: "BTC-USD".to_string(),
            order_type: "market".to_string(),
            size: size.map(str::to_string),
            funds: funds.map(str::to_string),
        })
    }

    fn validation_message(action: &ProxyAction) -> String {
        match action.build_request() {
            Err(ProxyError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_candles() {
        let action =
            ProxyAction::decode(br#"{"action":"getCandles","tradingPair":"BTC-USD","granularity":60}"#)
                .unwrap();
        assert_eq!(
            action,
            ProxyAction::Candles(CandlesRequest {
                trading_pair: "BTC-USD".into(),
                granularity: 60,
            })
        );
    }

    #[test]
    fn test_decode_order_defaults_type() {
        let action = ProxyAction::decode(
            br#"{"action":"placeOrder","side":"sell","productId":"ETH-USD","size":"0.5"}"#,
        )
        .unwrap();
        match action {
            ProxyAction::Order(req) => {
                assert_eq!(req.order_type, "market");
                assert_eq!(req.product_id, "ETH-USD");
                assert_eq!(req.size.as_deref(), Some("0.5"));
                assert_eq!(req.funds, None);
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_decode_unknown_or_missing_action() {
        for raw in [
            &br#"{"action":"unknown"}"#[..],
            br#"{"tradingPair":"BTC-USD","granularity":60}"#,
            br#"{"action":42}"#,
            br#"[1,2,3]"#,
        ] {
            assert!(matches!(
                ProxyAction::decode(raw),
                Err(ProxyError::UnsupportedAction)
            ));
        }
    }

    #[test]
    fn test_decode_malformed() {
        assert!(matches!(
            ProxyAction::decode(b"{not json"),
            Err(ProxyError::InvalidBody(_))
        ));
        assert!(matches!(
            ProxyAction::decode(br#"{"action":"getCandles","tradingPair":"BTC-USD","granularity":"60"}"#),
            Err(ProxyError::InvalidBody(_))
        ));
    }

    #[test]
    fn test_candles_request_path() {
        let action = ProxyAction::Candles(CandlesRequest {
            trading_pair: "BTC-USD".into(),
            granularity: 3600,
        });
        let req = action.build_request().unwrap();
        assert_eq!(req.method, Method::GET);
        assert_eq!(req.path, "/products/BTC-USD/candles?granularity=3600");
        assert_eq!(req.body, "");
    }

    #[test]
    fn test_candles_rejects_path_characters() {
        for pair in ["", "BTC-USD/../orders", "BTC USD", "BTC-USD?x=1"] {
            let action = ProxyAction::Candles(CandlesRequest {
                trading_pair: pair.into(),
                granularity: 60,
            });
            assert_eq!(validation_message(&action), "Invalid trading pair.");
        }
    }

    #[test]
    fn test_buy_order_body() {
        let req = order("buy", None, Some("100.00")).build_request().unwrap();
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.path, "/orders");
        assert_eq!(
            req.body,
            r#"{"side":"buy","product_id":"BTC-USD","type":"market","funds":"100.00"}"#
        );
    }

    #[test]
    fn test_sell_order_body_ignores_funds() {
        let req = order("SELL", Some("0.01"), Some("100.00"))
            .build_request()
            .unwrap();
        assert_eq!(
            req.body,
            r#"{"side":"sell","product_id":"BTC-USD","type":"market","size":"0.01"}"#
        );
    }

    #[test]
    fn test_buy_requires_funds() {
        for funds in [None, Some("")] {
            assert_eq!(
                validation_message(&order("buy", Some("1"), funds)),
                "Funds are required for market buy orders."
            );
        }
    }

    #[test]
    fn test_sell_requires_size() {
        for size in [None, Some("")] {
            assert_eq!(
                validation_message(&order("sell", size, Some("100"))),
                "Size is required for market sell orders."
            );
        }
    }

    #[test]
    fn test_invalid_side() {
        for side in ["hold", "", "buying"] {
            assert_eq!(
                validation_message(&order(side, Some("1"), Some("100"))),
                "Invalid order side. Must be 'buy' or 'sell'."
            );
        }

        for raw in [
            &br#"{"action":"placeOrder","productId":"BTC-USD","type":"market","funds":"10"}"#[..],
            br#"{"action":"placeOrder","side":null,"productId":"BTC-USD","size":"1"}"#,
        ] {
            let action = ProxyAction::decode(raw).unwrap();
            assert_eq!(
                validation_message(&action),
                "Invalid order side. Must be 'buy' or 'sell'."
            );
        }
    }

    #[test]
    fn test_parse_candles_keeps_integers() {
        let action = ProxyAction::Candles(CandlesRequest {
            trading_pair: "BTC-USD".into(),
            granularity: 60,
        });
        let value = action
            .parse_success("[[1,2,3,4,5,6],[1700000000,35000.5,35100.25,35010,35050,12.5]]")
            .unwrap();
        assert_eq!(
            value.to_string(),
            "[[1,2,3,4,5,6],[1700000000,35000.5,35100.25,35010,35050,12.5]]"
        );
        assert!(matches!(
            action.parse_success(r#"{"message":"oops"}"#),
            Err(ProxyError::Internal(_))
        ));
    }
}
