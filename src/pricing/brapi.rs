use anyhow::Context;
use reqwest::{Client, StatusCode, Url};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::QuoteSource;
use crate::config::Config;
use crate::error::{Result, ScreenerError};
use crate::models::{Asset, AssetSummary};

/// Brapi.dev API response for the quote list
#[derive(Debug, Deserialize)]
struct BrapiListResponse {
    /// Decoded per entry so one odd row cannot sink the whole list
    stocks: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct BrapiListEntry {
    stock: Option<String>,
    close: Option<Decimal>,
    logo: Option<String>,
}

/// Brapi.dev API response for a single quote
#[derive(Debug, Deserialize)]
struct BrapiQuoteResponse {
    #[serde(default)]
    results: Vec<BrapiQuote>,
}

#[derive(Debug, Deserialize)]
struct BrapiQuote {
    symbol: Option<String>,
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<Decimal>,
    #[serde(rename = "dividendYield")]
    dividend_yield: Option<Decimal>,
    logourl: Option<String>,
}

/// HTTP client for the brapi.dev quote API
#[derive(Debug, Clone)]
pub struct BrapiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl BrapiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .user_agent("Mozilla/5.0 (compatible; ScreenerBot/1.0)")
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Path segments are percent-encoded, so a ticker cannot alter the query
    fn endpoint(&self, segments: &[&str], params: &[(&str, String)]) -> Result<Url> {
        let invalid = |reason: String| {
            ScreenerError::Config(format!("invalid API URL {}: {}", self.base_url, reason))
        };
        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("cannot be a base URL".into()))?
            .pop_if_empty()
            .extend(segments);

        let mut query: Vec<(&str, String)> = Vec::with_capacity(params.len() + 1);
        if let Some(token) = &self.token {
            query.push(("token", token.clone()));
        }
        query.extend(params.iter().cloned());
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// Single GET returning the decoded JSON body. No retry.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.http.get(url).send().await.map_err(|e| {
            ScreenerError::Fetch(format!("failed to send request to brapi.dev: {}", e))
        })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ScreenerError::RateLimited.into());
        }
        if !status.is_success() {
            return Err(ScreenerError::Fetch(format!(
                "brapi.dev returned error status: {}",
                status
            ))
            .into());
        }

        response.json::<T>().await.map_err(|e| {
            if e.is_decode() {
                ScreenerError::MalformedPayload(e.to_string()).into()
            } else {
                ScreenerError::Fetch(format!("failed to read brapi.dev response: {}", e)).into()
            }
        })
    }

    async fn fetch_list_entries(&self, limit: Option<usize>) -> Result<Vec<BrapiListEntry>> {
        let params: Vec<(&str, String)> = limit
            .map(|l| vec![("limit", l.to_string())])
            .unwrap_or_default();
        let url = self.endpoint(&["quote", "list"], &params)?;

        let data: BrapiListResponse = self
            .get_json(url)
            .await
            .context("Failed to fetch quote list")?;

        let total = data.stocks.len();
        let entries: Vec<BrapiListEntry> = data
            .stocks
            .into_iter()
            .filter_map(|raw| match serde_json::from_value(raw) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!("Dropping undecodable list entry: {}", e);
                    None
                }
            })
            .collect();
        debug!("Quote list decoded: {} of {} entries", entries.len(), total);
        Ok(entries)
    }

    async fn try_fetch_details(&self, ticker: &str) -> Result<Option<Asset>> {
        let url = self.endpoint(&["quote", ticker], &[])?;
        let data: BrapiQuoteResponse = self.get_json(url).await?;

        let Some(quote) = data.results.into_iter().next() else {
            warn!("No quote data returned for {}, skipping", ticker);
            return Ok(None);
        };
        Ok(asset_from_quote(ticker, quote))
    }
}

/// Required: a price and a non-empty symbol. Yield defaults to zero.
fn asset_from_quote(ticker: &str, quote: BrapiQuote) -> Option<Asset> {
    let symbol = quote.symbol.filter(|s| !s.trim().is_empty());
    let (Some(symbol), Some(price)) = (symbol, quote.regular_market_price) else {
        warn!("Missing price or symbol for {}, skipping", ticker);
        return None;
    };

    let dividend_yield = quote
        .dividend_yield
        .filter(|y| !y.is_zero())
        .unwrap_or(Decimal::ZERO);

    Some(Asset::new(
        symbol,
        price,
        dividend_yield,
        quote.logourl.unwrap_or_default(),
    ))
}

impl QuoteSource for BrapiClient {
    async fn fetch_list(&self, limit: Option<usize>) -> Result<Vec<AssetSummary>> {
        info!("Fetching quote list from brapi.dev");
        let entries = self.fetch_list_entries(limit).await?;
        let total = entries.len();

        let list: Vec<AssetSummary> = entries
            .into_iter()
            .filter_map(|e| match (e.stock, e.close) {
                (Some(ticker), Some(price)) if !ticker.is_empty() => {
                    Some(AssetSummary::new(ticker, price))
                }
                _ => None,
            })
            .collect();

        debug!("Quote list: {} entries, {} usable", total, list.len());
        Ok(list)
    }

    async fn fetch_details(&self, ticker: &str) -> Option<Asset> {
        debug!("Fetching details for {}", ticker);
        match self.try_fetch_details(ticker).await {
            Ok(asset) => asset,
            Err(e) => {
                warn!("Failed to fetch details for {}: {:#}", ticker, e);
                None
            }
        }
    }

    async fn fetch_catalog(&self, limit: usize, require_logo: bool) -> Result<Vec<Asset>> {
        info!("Loading asset catalog from brapi.dev (limit {})", limit);
        let entries = self
            .fetch_list_entries(Some(limit))
            .await
            .context("Failed to load asset catalog")?;
        let total = entries.len();

        let catalog: Vec<Asset> = entries
            .into_iter()
            .filter_map(|e| {
                let ticker = e.stock.filter(|t| !t.is_empty())?;
                let price = e.close?;
                let logo = e.logo.unwrap_or_default();
                if require_logo && logo.is_empty() {
                    return None;
                }
                Some(Asset::new(ticker, price, Decimal::ZERO, logo))
            })
            .collect();

        info!("Catalog loaded: {} of {} entries kept", catalog.len(), total);
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::classify;
    use crate::models::AssetType;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, token: Option<&str>) -> BrapiClient {
        let config = Config {
            base_url: server.uri(),
            token: token.map(str::to_string),
            ..Config::default()
        };
        BrapiClient::new(&config).unwrap()
    }

    async fn mount_json(server: &MockServer, at: &str, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(at))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_fetch_list_sends_token_and_maps_entries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/quote/list"))
            .and(query_param("token", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "stocks": [
                    {"stock": "PETR4", "close": 37.5, "logo": "https://icons/petr4.svg"},
                    {"stock": "HGLG11", "close": 160},
                    {"stock": "NOPR3"},
                    {"close": 10.0}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let list = client_for(&server, Some("secret"))
            .fetch_list(None)
            .await
            .unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list[0].ticker, "PETR4");
        assert_eq!(list[0].price, dec!(37.5));
        assert_eq!(list[1].ticker, "HGLG11");
        assert_eq!(list[1].price, dec!(160));
    }

    #[tokio::test]
    async fn test_fetch_list_without_token_omits_param() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/quote/list"))
            .and(query_param_is_missing("token"))
            .and(query_param("limit", "25"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"stocks": []})))
            .expect(1)
            .mount(&server)
            .await;

        let list = client_for(&server, None).fetch_list(Some(25)).await.unwrap();
        assert!(list.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_list_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/quote/list"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let err = client_for(&server, None).fetch_list(None).await.unwrap_err();
        assert_eq!(classify(&err), Some(&ScreenerError::RateLimited));
        assert!(format!("{:#}", err).contains("try again later"));
    }

    #[tokio::test]
    async fn test_fetch_list_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/quote/list"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client_for(&server, None).fetch_list(None).await.unwrap_err();
        assert!(matches!(classify(&err), Some(ScreenerError::Fetch(_))));
        assert!(format!("{:#}", err).contains("500"));
    }

    #[tokio::test]
    async fn test_fetch_list_missing_stocks_field() {
        let server = MockServer::start().await;
        mount_json(&server, "/quote/list", json!({"indexes": []})).await;

        let err = client_for(&server, None).fetch_list(None).await.unwrap_err();
        assert!(matches!(
            classify(&err),
            Some(ScreenerError::MalformedPayload(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_list_non_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/quote/list"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server, None).fetch_list(None).await.unwrap_err();
        assert!(matches!(
            classify(&err),
            Some(ScreenerError::MalformedPayload(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_list_drops_undecodable_entries() {
        let server = MockServer::start().await;
        mount_json(
            &server,
            "/quote/list",
            json!({
                "stocks": [
                    {"stock": "PETR4", "close": 37.5},
                    {"stock": "ODD3", "close": "N/A"},
                    "garbage",
                    {"stock": "VALE3", "close": 61.2}
                ]
            }),
        )
        .await;

        let client = client_for(&server, None);
        let list = client.fetch_list(None).await.unwrap();
        let tickers: Vec<&str> = list.iter().map(|a| a.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["PETR4", "VALE3"]);

        let catalog = client.fetch_catalog(10, false).await.unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_endpoint_escapes_ticker_segment() {
        let config = Config {
            token: Some("t".into()),
            ..Config::default()
        };
        let client = BrapiClient::new(&config).unwrap();

        let url = client
            .endpoint(&["quote", "AB?token=evil#x"], &[])
            .unwrap();
        assert_eq!(url.query(), Some("token=t"));
        assert!(url.fragment().is_none());
        assert!(url.path().starts_with("/api/quote/AB%3F"));

        let url = client.endpoint(&["quote", "A/B"], &[]).unwrap();
        assert_eq!(url.path(), "/api/quote/A%2FB");
    }

    #[test]
    fn test_endpoint_keeps_base_path_and_params() {
        let client = BrapiClient::new(&Config::default()).unwrap();
        let url = client
            .endpoint(&["quote", "list"], &[("limit", "5000".to_string())])
            .unwrap();
        assert_eq!(url.as_str(), "https://brapi.dev/api/quote/list?limit=5000");
    }

    #[tokio::test]
    async fn test_fetch_details_populated() {
        let server = MockServer::start().await;
        mount_json(
            &server,
            "/quote/HGLG11",
            json!({"results": [{
                "symbol": "HGLG11",
                "regularMarketPrice": 158.9,
                "dividendYield": 8.4,
                "logourl": "https://icons/hglg11.svg"
            }]}),
        )
        .await;

        let asset = client_for(&server, None)
            .fetch_details("HGLG11")
            .await
            .unwrap();
        assert_eq!(asset.ticker, "HGLG11");
        assert_eq!(asset.price, dec!(158.9));
        assert_eq!(asset.dividend_yield, dec!(8.4));
        assert_eq!(asset.asset_type, AssetType::Fii);
        assert_eq!(asset.logo, "https://icons/hglg11.svg");
    }

    #[tokio::test]
    async fn test_fetch_details_defaults_yield_and_logo() {
        let server = MockServer::start().await;
        mount_json(
            &server,
            "/quote/PETR4",
            json!({"results": [{"symbol": "PETR4", "regularMarketPrice": 37, "dividendYield": null}]}),
        )
        .await;

        let asset = client_for(&server, None)
            .fetch_details("PETR4")
            .await
            .unwrap();
        assert_eq!(asset.dividend_yield, Decimal::ZERO);
        assert_eq!(asset.asset_type, AssetType::Stock);
        assert!(asset.logo.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_details_skips_missing_price() {
        let server = MockServer::start().await;
        mount_json(
            &server,
            "/quote/ABCD3",
            json!({"results": [{"symbol": "ABCD3", "dividendYield": 3.0}]}),
        )
        .await;

        assert!(client_for(&server, None)
            .fetch_details("ABCD3")
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_fetch_details_skips_missing_symbol() {
        let server = MockServer::start().await;
        mount_json(
            &server,
            "/quote/ABCD3",
            json!({"results": [{"symbol": "", "regularMarketPrice": 10.0}]}),
        )
        .await;

        assert!(client_for(&server, None)
            .fetch_details("ABCD3")
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_fetch_details_skips_empty_results() {
        let server = MockServer::start().await;
        mount_json(&server, "/quote/GONE3", json!({"results": []})).await;

        assert!(client_for(&server, None)
            .fetch_details("GONE3")
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_fetch_details_transport_failure_is_skip() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/quote/FAIL3"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        assert!(client_for(&server, None)
            .fetch_details("FAIL3")
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_fetch_catalog_logo_policy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/quote/list"))
            .and(query_param("limit", "5000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "stocks": [
                    {"stock": "PETR4", "close": 37.5, "logo": "https://icons/petr4.svg"},
                    {"stock": "MXRF11", "close": 9.8},
                    {"stock": "", "close": 3.0, "logo": "https://icons/x.svg"}
                ]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, None);

        let lenient = client.fetch_catalog(5000, false).await.unwrap();
        assert_eq!(lenient.len(), 2);
        assert_eq!(lenient[1].ticker, "MXRF11");
        assert_eq!(lenient[1].asset_type, AssetType::Fii);
        assert!(lenient[1].logo.is_empty());

        let strict = client.fetch_catalog(5000, true).await.unwrap();
        assert_eq!(strict.len(), 1);
        assert_eq!(strict[0].ticker, "PETR4");
    }

    #[tokio::test]
    async fn test_fetch_details_live() {
        // Opt-in: hits the real brapi.dev API
        if std::env::var("SCREENER_ONLINE_TESTS").ok().as_deref() != Some("1") {
            return;
        }

        let mut config = Config::default();
        config.apply_env(|k| std::env::var(k).ok());
        let client = BrapiClient::new(&config).unwrap();

        match client.fetch_details("PETR4").await {
            Some(asset) => {
                assert_eq!(asset.ticker, "PETR4");
                assert!(asset.price > Decimal::ZERO);
                println!("PETR4 price from brapi: R$ {}", asset.price);
            }
            None => eprintln!("Skipping brapi live test: no data"),
        }
    }
}
