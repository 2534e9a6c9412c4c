//! Stub provider endpoints shared by the integration tests.
#![allow(dead_code)]

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use proofbadge::config::Config;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const WALLET: &str = "0x52A90BfEc58cc5394A52aD53Fc83ebEF5B0119b6";
pub const MORALIS_KEY: &str = "test-moralis-key";
pub const COVALENT_KEY: &str = "test-covalent-key";
pub const UNISWAP_V3: &str = "0x68b3465833fb72a70ecdf485e0e4c7bd8665fc45";

/// Serve `app` on an ephemeral localhost port and return its base URL.
pub fn spawn(app: Router) -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    listener.set_nonblocking(true).expect("nonblocking");
    let addr = listener.local_addr().expect("local addr");
    let server = axum::Server::from_tcp(listener)
        .expect("server from listener")
        .serve(app.into_make_service());
    tokio::spawn(server);
    format!("http://{}", addr)
}

/// Base URL nothing listens on.
pub fn dead_endpoint() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{}", addr)
}

/// Request counter shared with a stub.
#[derive(Clone, Default)]
pub struct Hits(Arc<AtomicUsize>);

impl Hits {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

// ----- Moralis -----

pub fn moralis_stats() -> Value {
    json!({
        "first_transaction": { "block_timestamp": "2023-01-01T00:00:00.000Z" },
        "last_transaction": { "block_timestamp": chrono::Utc::now().to_rfc3339() },
        "total_transactions": "128"
    })
}

async fn moralis_handler(
    Path(address): Path<String>, Query(query): Query<HashMap<String, String>>, headers: HeaderMap,
) -> impl IntoResponse {
    if headers.get("x-api-key").and_then(|v| v.to_str().ok()) != Some(MORALIS_KEY) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Invalid key" })));
    }
    if address.is_empty() || query.get("chain").map(String::as_str) != Some("sepolia") {
        return (StatusCode::BAD_REQUEST, Json(json!({ "message": "bad chain" })));
    }
    (StatusCode::OK, Json(moralis_stats()))
}

pub fn moralis_stub() -> Router {
    Router::new().route("/:address", get(moralis_handler))
}

// ----- Covalent -----

/// Token quotes summing to 300 USD, one unpriced.
pub fn covalent_balances() -> Value {
    json!({
        "data": { "items": [
            { "contract_address": "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee", "contract_ticker_symbol": "ETH", "quote": 200.5 },
            { "contract_address": "0x1f9840a85d5af5bf1d1762f925bdaddc4201f984", "contract_ticker_symbol": "UNI", "quote": 99.5 },
            { "contract_address": "0x0000000000000000000000000000000000000bad", "contract_ticker_symbol": "JUNK", "quote": null }
        ]},
        "error": false,
        "error_message": null
    })
}

/// 10 Uniswap V3 calls with two swaps each plus 19 other contracts with one
/// `TokenExchange` each: 20 contracts, 10 DeFi transactions, 39 swaps.
pub fn covalent_transactions() -> Value {
    let mut items = Vec::new();
    for i in 0..10 {
        items.push(json!({
            "tx_hash": format!("0xa{:063x}", i),
            "to_address": UNISWAP_V3.to_uppercase().replacen("0X", "0x", 1),
            "log_events": [
                { "decoded": { "name": "Swap" } },
                { "decoded": { "name": "Swap" } },
                { "decoded": { "name": "Transfer" } },
                { "decoded": null }
            ]
        }));
    }
    for i in 0..19 {
        items.push(json!({
            "tx_hash": format!("0xb{:063x}", i),
            "to_address": format!("0x{:040x}", i + 1),
            "log_events": [ { "decoded": { "name": "TokenExchange" } } ]
        }));
    }
    // contract creation and log-less transfer
    items.push(json!({ "tx_hash": "0xc0", "to_address": null, "log_events": null }));
    json!({ "data": { "items": items }, "error": false, "error_message": null })
}

#[derive(Clone, Default)]
pub struct CovalentState {
    pub balance_hits: Hits,
    pub transaction_hits: Hits,
}

async fn covalent_balances_handler(
    State(state): State<CovalentState>, Path((chain, _address)): Path<(u64, String)>,
    Query(query): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    state.balance_hits.bump();
    if query.get("key").map(String::as_str) != Some(COVALENT_KEY) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": true, "error_message": "bad key" })));
    }
    if chain != 11155111 || query.get("quote-currency").map(String::as_str) != Some("USD") {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": true, "error_message": "bad request" })));
    }
    (StatusCode::OK, Json(covalent_balances()))
}

async fn covalent_transactions_handler(
    State(state): State<CovalentState>, Path((_chain, _address)): Path<(u64, String)>,
    Query(query): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    state.transaction_hits.bump();
    if query.get("no-logs").map(String::as_str) != Some("false") {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": true, "error_message": "logs required" })));
    }
    (StatusCode::OK, Json(covalent_transactions()))
}

pub fn covalent_stub(state: CovalentState) -> Router {
    Router::new()
        .route("/:chain/address/:address/balances_v2/", get(covalent_balances_handler))
        .route("/:chain/address/:address/transactions_v2/", get(covalent_transactions_handler))
        .with_state(state)
}

// ----- Participation subgraph -----

pub fn subgraph_payload() -> Value {
    json!({
        "data": {
            "governanceVotes": "5",
            "airdrops": [
                { "project": "Uniswap", "network": "Ethereum Sepolia", "amount": "100", "token": "UNI", "date": "2023-05-15" },
                { "project": "Aave", "network": "Polygon Mumbai", "amount": "50", "token": "AAVE", "date": "2023-06-20" },
                { "project": "Compound", "network": "Ethereum Sepolia", "amount": "75", "token": "COMP", "date": "2023-07-10" },
                { "project": "Optimism", "network": "Ethereum Sepolia", "amount": "12.5", "token": "OP", "date": "2023-08-01" },
                { "project": "Arbitrum", "network": "Arbitrum Goerli", "amount": "625", "token": "ARB", "date": "2023-09-12" }
            ]
        }
    })
}

async fn subgraph_handler(Json(body): Json<Value>) -> impl IntoResponse {
    let address = body["variables"]["address"].as_str().unwrap_or_default();
    if address != WALLET.to_lowercase() || body["query"].as_str().is_none() {
        return Json(json!({ "data": null, "errors": [ { "message": "unknown wallet" } ] }));
    }
    Json(subgraph_payload())
}

pub fn subgraph_stub() -> Router {
    Router::new().route("/", post(subgraph_handler))
}

// ----- Failure modes -----

/// Every path answers 500.
pub fn failing_stub() -> Router {
    Router::new().fallback(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded") })
}

/// Every path answers 200 with a body that is not the expected JSON shape.
pub fn malformed_stub() -> Router {
    Router::new().fallback(|| async { (StatusCode::OK, "<html>maintenance</html>") })
}

/// Every path answers after `delay`.
pub fn slow_stub(delay: std::time::Duration) -> Router {
    Router::new().fallback(move || async move {
        tokio::time::sleep(delay).await;
        Json(moralis_stats())
    })
}

/// Config with every provider pointed at the given base URLs.
pub fn config_for(moralis: &str, covalent: &str, subgraph: Option<&str>) -> Config {
    let mut config = Config::default();
    config.moralis.base_url = moralis.to_string();
    config.moralis.api_key = MORALIS_KEY.to_string();
    config.covalent.base_url = covalent.to_string();
    config.covalent.api_key = COVALENT_KEY.to_string();
    config.participation.subgraph_url = subgraph.map(str::to_string);
    config.participation.governance_votes = Some(5);
    config.moralis.timeout_seconds = 2;
    config.covalent.timeout_seconds = 2;
    config.participation.timeout_seconds = 2;
    config
}
