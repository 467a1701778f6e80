//! Midgard v2 API client implementation.

use super::{ActionsPage, DataSource, DataSourceError, LIQUIDITY_ACTION_TYPES};
use crate::domain::{
    Action, ActionStatus, ActionType, Address, Asset, Coin, Decimal, MemberPool, PoolState,
    Position, PriceSample, TimeNs, TimeSecs, Transfer,
};
use async_trait::async_trait;
use backoff::future::retry;
use backoff::ExponentialBackoff;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Midgard data source over the public v2 HTTP API.
#[derive(Debug, Clone)]
pub struct MidgardDataSource {
    client: Client,
    base_url: String,
}

impl MidgardDataSource {
    /// Create a new Midgard data source; `base_url` includes the `/v2` prefix.
    pub fn new(base_url: String, request_timeout: Duration) -> Result<Self, DataSourceError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| DataSourceError::Other(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Value, DataSourceError> {
        let url = format!("{}{}", self.base_url, path);
        let backoff = ExponentialBackoff {
            max_elapsed_time: Some(Duration::from_secs(30)),
            ..Default::default()
        };

        retry(backoff, || async {
            let response = self
                .client
                .get(&url)
                .query(query)
                .send()
                .await
                .map_err(|e| {
                    backoff::Error::transient(DataSourceError::NetworkError(e.to_string()))
                })?;

            if let Some(err) = status_error(response.status(), path) {
                return Err(err);
            }

            response
                .json::<Value>()
                .await
                .map_err(|e| backoff::Error::permanent(DataSourceError::ParseError(e.to_string())))
        })
        .await
    }
}

/// Map a non-success status to a retry decision: 429 and 5xx are retried,
/// any other failure is permanent.
fn status_error(status: StatusCode, path: &str) -> Option<backoff::Error<DataSourceError>> {
    if status.is_success() {
        return None;
    }
    let err = if status == StatusCode::TOO_MANY_REQUESTS {
        backoff::Error::transient(DataSourceError::RateLimited)
    } else if status.is_server_error() {
        backoff::Error::transient(DataSourceError::HttpError {
            status: status.as_u16(),
            message: "Server error".to_string(),
        })
    } else if status == StatusCode::NOT_FOUND {
        backoff::Error::permanent(DataSourceError::NotFound(path.to_string()))
    } else {
        backoff::Error::permanent(DataSourceError::HttpError {
            status: status.as_u16(),
            message: "Client error".to_string(),
        })
    };
    Some(err)
}

#[async_trait]
impl DataSource for MidgardDataSource {
    async fn fetch_member(&self, address: &Address) -> Result<Vec<MemberPool>, DataSourceError> {
        debug!("Fetching member details for address={}", address);

        let response = self
            .get_json(&format!("/member/{}", address.as_str()), &[])
            .await?;
        let pools = response
            .get("pools")
            .and_then(|v| v.as_array())
            .ok_or_else(|| DataSourceError::ParseError("Missing pools field".to_string()))?;

        pools.iter().map(parse_member_pool).collect()
    }

    async fn fetch_pool(&self, pool: &Asset) -> Result<PoolState, DataSourceError> {
        debug!("Fetching pool state for pool={}", pool);

        let response = self
            .get_json(&format!("/pool/{}", pool.as_str()), &[])
            .await?;
        parse_pool_state(&response)
    }

    async fn fetch_actions(
        &self,
        addresses: &[Address],
        limit: usize,
        offset: usize,
    ) -> Result<ActionsPage, DataSourceError> {
        let address_list = addresses
            .iter()
            .map(|a| a.as_str())
            .collect::<Vec<_>>()
            .join(",");
        debug!(
            "Fetching actions for addresses={}, limit={}, offset={}",
            address_list, limit, offset
        );

        let query = [
            ("address", address_list),
            ("type", LIQUIDITY_ACTION_TYPES.join(",")),
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
        ];
        let response = self.get_json("/actions", &query).await?;
        parse_actions_page(&response)
    }

    async fn fetch_price_sample(
        &self,
        pool: &Asset,
        at: TimeSecs,
    ) -> Result<PriceSample, DataSourceError> {
        debug!("Fetching depth history for pool={}, at={}", pool, at);

        let query = [("from", at.to_string()), ("to", at.to_string())];
        let response = self
            .get_json(&format!("/history/depths/{}", pool.as_str()), &query)
            .await?;
        parse_price_sample(&response)
    }
}

fn field<'a>(json: &'a Value, name: &str) -> Result<&'a Value, DataSourceError> {
    json.get(name)
        .filter(|v| !v.is_null())
        .ok_or_else(|| DataSourceError::ParseError(format!("Missing {} field", name)))
}

/// Midgard encodes 64-bit integers and floats as JSON strings.
fn numeric_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn decimal_field(json: &Value, name: &str) -> Result<Decimal, DataSourceError> {
    let text = numeric_text(field(json, name)?)
        .ok_or_else(|| DataSourceError::ParseError(format!("Invalid {} field", name)))?;
    Decimal::from_str_canonical(&text)
        .map_err(|e| DataSourceError::ParseError(format!("Invalid {}: {}", name, e)))
}

fn optional_decimal_field(json: &Value, name: &str) -> Result<Decimal, DataSourceError> {
    match json.get(name) {
        None | Some(Value::Null) => Ok(Decimal::zero()),
        Some(_) => decimal_field(json, name),
    }
}

fn u128_field(json: &Value, name: &str) -> Result<u128, DataSourceError> {
    let text = numeric_text(field(json, name)?)
        .ok_or_else(|| DataSourceError::ParseError(format!("Invalid {} field", name)))?;
    text.trim()
        .parse::<u128>()
        .map_err(|e| DataSourceError::ParseError(format!("Invalid {}: {}", name, e)))
}

fn i64_field(json: &Value, name: &str) -> Result<i64, DataSourceError> {
    let text = numeric_text(field(json, name)?)
        .ok_or_else(|| DataSourceError::ParseError(format!("Invalid {} field", name)))?;
    text.trim()
        .parse::<i64>()
        .map_err(|e| DataSourceError::ParseError(format!("Invalid {}: {}", name, e)))
}

fn str_field<'a>(json: &'a Value, name: &str) -> Result<&'a str, DataSourceError> {
    field(json, name)?
        .as_str()
        .ok_or_else(|| DataSourceError::ParseError(format!("Invalid {} field", name)))
}

fn optional_address(json: &Value, name: &str) -> Option<Address> {
    json.get(name)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| Address::new(s.to_string()))
}

fn parse_member_pool(json: &Value) -> Result<MemberPool, DataSourceError> {
    let pool = Asset::new(str_field(json, "pool")?.to_string());
    let liquidity_units = u128_field(json, "liquidityUnits")?;

    Ok(MemberPool {
        position: Position::new(pool, liquidity_units),
        rune_address: optional_address(json, "runeAddress"),
        asset_address: optional_address(json, "assetAddress"),
        rune_added: optional_decimal_field(json, "runeAdded")?,
        asset_added: optional_decimal_field(json, "assetAdded")?,
        rune_withdrawn: optional_decimal_field(json, "runeWithdrawn")?,
        asset_withdrawn: optional_decimal_field(json, "assetWithdrawn")?,
    })
}

fn parse_pool_state(json: &Value) -> Result<PoolState, DataSourceError> {
    // Older Midgard versions only report `units`.
    let liquidity_units = match json.get("liquidityUnits") {
        Some(v) if !v.is_null() => u128_field(json, "liquidityUnits")?,
        _ => u128_field(json, "units")?,
    };

    Ok(PoolState {
        liquidity_units,
        rune_depth: u128_field(json, "runeDepth")?,
        asset_depth: u128_field(json, "assetDepth")?,
        asset_price: decimal_field(json, "assetPrice")?,
        asset_price_usd: decimal_field(json, "assetPriceUSD")?,
    })
}

fn parse_actions_page(json: &Value) -> Result<ActionsPage, DataSourceError> {
    let actions = field(json, "actions")?
        .as_array()
        .ok_or_else(|| DataSourceError::ParseError("Invalid actions field".to_string()))?
        .iter()
        .map(parse_action)
        .collect::<Result<Vec<_>, _>>()?;
    let count = usize::try_from(u128_field(json, "count")?)
        .map_err(|_| DataSourceError::ParseError("count out of range".to_string()))?;

    Ok(ActionsPage { actions, count })
}

/// Parse one action. Absent `pools`, `in` or `out` are kept as `None` so the
/// engine can report the action as malformed.
fn parse_action(json: &Value) -> Result<Action, DataSourceError> {
    let action_type = ActionType::from(str_field(json, "type")?);
    let status = ActionStatus::from(str_field(json, "status")?);
    let date = TimeNs::new(i64_field(json, "date")?);
    let height = json.get("height").and_then(numeric_text).and_then(|s| s.parse().ok());

    let pools = match json.get("pools") {
        None | Some(Value::Null) => None,
        Some(v) => Some(
            v.as_array()
                .ok_or_else(|| DataSourceError::ParseError("Invalid pools field".to_string()))?
                .iter()
                .map(|p| {
                    p.as_str()
                        .map(|s| Asset::new(s.to_string()))
                        .ok_or_else(|| DataSourceError::ParseError("Invalid pool entry".to_string()))
                })
                .collect::<Result<Vec<_>, _>>()?,
        ),
    };

    Ok(Action {
        action_type,
        status,
        date,
        height,
        pools,
        inputs: parse_transfers(json, "in")?,
        outputs: parse_transfers(json, "out")?,
    })
}

fn parse_transfers(json: &Value, name: &str) -> Result<Option<Vec<Transfer>>, DataSourceError> {
    let transfers = match json.get(name) {
        None | Some(Value::Null) => return Ok(None),
        Some(v) => v
            .as_array()
            .ok_or_else(|| DataSourceError::ParseError(format!("Invalid {} field", name)))?,
    };

    transfers
        .iter()
        .map(parse_transfer)
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

fn parse_transfer(json: &Value) -> Result<Transfer, DataSourceError> {
    let coins = field(json, "coins")?
        .as_array()
        .ok_or_else(|| DataSourceError::ParseError("Invalid coins field".to_string()))?
        .iter()
        .map(parse_coin)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Transfer {
        address: optional_address(json, "address"),
        tx_id: json.get("txID").and_then(|v| v.as_str()).map(str::to_string),
        coins,
    })
}

fn parse_coin(json: &Value) -> Result<Coin, DataSourceError> {
    Ok(Coin::new(
        Asset::new(str_field(json, "asset")?.to_string()),
        decimal_field(json, "amount")?,
    ))
}

fn parse_price_sample(json: &Value) -> Result<PriceSample, DataSourceError> {
    let at = TimeSecs::new(i64_field(field(json, "meta")?, "startTime")?);
    let interval = field(json, "intervals")?
        .as_array()
        .and_then(|intervals| intervals.first())
        .ok_or_else(|| DataSourceError::ParseError("Empty depth history".to_string()))?;

    Ok(PriceSample {
        at,
        asset_price: decimal_field(interval, "assetPrice")?,
        asset_price_usd: decimal_field(interval, "assetPriceUSD")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_member_pool_valid() {
        let member_json = json!({
            "pool": "BTC.BTC",
            "liquidityUnits": "123456789",
            "runeAddress": "thor1abc",
            "assetAddress": "",
            "runeAdded": "1000",
            "assetAdded": "20",
            "runeWithdrawn": "0",
            "assetWithdrawn": "0",
            "dateFirstAdded": "1650000000"
        });

        let member = parse_member_pool(&member_json).unwrap();
        assert_eq!(member.pool(), &Asset::new("BTC.BTC".to_string()));
        assert_eq!(member.position.liquidity_units, 123_456_789);
        assert_eq!(member.rune_address, Some(Address::new("thor1abc".to_string())));
        assert_eq!(member.asset_address, None);
        assert_eq!(member.rune_added, Decimal::from(1000));
    }

    #[test]
    fn test_parse_pool_state_falls_back_to_units() {
        let pool_json = json!({
            "asset": "BTC.BTC",
            "units": "500",
            "runeDepth": "1000000",
            "assetDepth": "50000",
            "assetPrice": "20.5",
            "assetPriceUSD": "41000.25"
        });

        let state = parse_pool_state(&pool_json).unwrap();
        assert_eq!(state.liquidity_units, 500);
        assert_eq!(state.rune_depth, 1_000_000);
        assert_eq!(state.asset_price, Decimal::from_str_canonical("20.5").unwrap());
        assert_eq!(
            state.asset_price_usd,
            Decimal::from_str_canonical("41000.25").unwrap()
        );
    }

    #[test]
    fn test_parse_pool_state_missing_price() {
        let pool_json = json!({
            "liquidityUnits": "500",
            "runeDepth": "1",
            "assetDepth": "1",
            "assetPrice": "1"
        });
        let err = parse_pool_state(&pool_json).unwrap_err();
        assert!(matches!(err, DataSourceError::ParseError(msg) if msg.contains("assetPriceUSD")));
    }

    #[test]
    fn test_parse_actions_page() {
        let page_json = json!({
            "count": "2",
            "actions": [
                {
                    "type": "addLiquidity",
                    "status": "success",
                    "date": "1650000000123456789",
                    "height": "5000000",
                    "pools": ["BTC.BTC"],
                    "in": [
                        {"address": "thor1abc", "txID": "AB", "coins": [{"asset": "THOR.RUNE", "amount": "1000"}]},
                        {"address": "bc1abc", "txID": "CD", "coins": [{"asset": "BTC.BTC", "amount": "10"}]}
                    ],
                    "out": []
                },
                {
                    "type": "withdraw",
                    "status": "pending",
                    "date": "1650000001000000000",
                    "pools": ["BTC.BTC"]
                }
            ]
        });

        let page = parse_actions_page(&page_json).unwrap();
        assert_eq!(page.count, 2);
        assert_eq!(page.actions.len(), 2);

        let add = &page.actions[0];
        assert_eq!(add.action_type, ActionType::AddLiquidity);
        assert_eq!(add.date, TimeNs::new(1_650_000_000_123_456_789));
        assert_eq!(add.height, Some(5_000_000));
        let inputs = add.inputs.as_ref().unwrap();
        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[1].coins[0].asset, Asset::new("BTC.BTC".to_string()));
        assert_eq!(inputs[0].tx_id.as_deref(), Some("AB"));

        let withdraw = &page.actions[1];
        assert_eq!(withdraw.status, ActionStatus::Pending);
        assert_eq!(withdraw.inputs, None);
        assert_eq!(withdraw.outputs, None);
    }

    #[test]
    fn test_status_error_retries_rate_limit_and_server_errors() {
        assert!(status_error(StatusCode::OK, "/pool/BTC.BTC").is_none());

        match status_error(StatusCode::TOO_MANY_REQUESTS, "/actions") {
            Some(backoff::Error::Transient { err, .. }) => {
                assert!(matches!(err, DataSourceError::RateLimited))
            }
            other => panic!("Expected transient rate limit, got {:?}", other),
        }

        for code in [StatusCode::INTERNAL_SERVER_ERROR, StatusCode::SERVICE_UNAVAILABLE] {
            match status_error(code, "/actions") {
                Some(backoff::Error::Transient { err, .. }) => assert!(matches!(
                    err,
                    DataSourceError::HttpError { status, .. } if status == code.as_u16()
                )),
                other => panic!("Expected transient server error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_status_error_client_errors_are_permanent() {
        match status_error(StatusCode::NOT_FOUND, "/member/thor1abc") {
            Some(backoff::Error::Permanent(DataSourceError::NotFound(path))) => {
                assert_eq!(path, "/member/thor1abc")
            }
            other => panic!("Expected permanent not found, got {:?}", other),
        }

        match status_error(StatusCode::BAD_REQUEST, "/actions") {
            Some(backoff::Error::Permanent(DataSourceError::HttpError { status, .. })) => {
                assert_eq!(status, 400)
            }
            other => panic!("Expected permanent client error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_actions_page_rejects_oversized_count() {
        let page_json = json!({"count": u128::MAX.to_string(), "actions": []});
        match parse_actions_page(&page_json) {
            Err(DataSourceError::ParseError(msg)) => assert!(msg.contains("count")),
            other => panic!("Expected ParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_action_missing_date_is_error() {
        let action_json = json!({"type": "withdraw", "status": "success"});
        assert!(parse_action(&action_json).is_err());
    }

    #[test]
    fn test_parse_price_sample() {
        let history_json = json!({
            "meta": {"startTime": "1650000000", "endTime": "1650000000"},
            "intervals": [{
                "startTime": "1650000000",
                "endTime": "1650000000",
                "assetPrice": "20",
                "assetPriceUSD": "40000",
                "runeDepth": "1",
                "assetDepth": "1"
            }]
        });

        let sample = parse_price_sample(&history_json).unwrap();
        assert_eq!(sample.at, TimeSecs::new(1_650_000_000));
        assert_eq!(sample.asset_price, Decimal::from(20));
        assert_eq!(sample.asset_price_usd, Decimal::from(40_000));
    }

    #[test]
    fn test_parse_price_sample_empty_intervals() {
        let history_json = json!({"meta": {"startTime": "1"}, "intervals": []});
        assert!(parse_price_sample(&history_json).is_err());
    }
}
