use crate::config::Config;
use crate::db::connection::init_db;
use crate::db::loads::seed_loads;
use crate::db::Database;
use crate::router::AppContext;
use astra::{Body, Request, Response};
use rust_decimal::Decimal;
use std::io::Read;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

pub const TEST_API_KEY: &str = "test-api-key";

static TEST_DB_SEQ: AtomicU64 = AtomicU64::new(0);

/// Fresh throwaway database with the production schema and seed loads.
/// Each call gets its own file so tests can run in parallel.
pub fn init_test_db() -> Database {
    let seq = TEST_DB_SEQ.fetch_add(1, Ordering::SeqCst);
    let path = std::env::temp_dir().join(format!(
        "carrier_api_test_{}_{seq}.sqlite3",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);

    let db = Database::new(path.to_string_lossy().into_owned());
    init_db(&db).unwrap_or_else(|e| panic!("database initialization failed: {e}"));
    seed_loads(&db).unwrap_or_else(|e| panic!("seeding loads failed: {e}"));
    db
}

pub fn test_ctx() -> AppContext {
    AppContext {
        db: init_test_db(),
        config: Config {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            db_path: String::new(), // handlers only use the Database handle
            api_key: TEST_API_KEY.to_string(),
            fmcsa_webkey: String::new(),
            counter_tolerance: Decimal::from_str("0.10").unwrap(),
        },
    }
}

pub fn get_request(path: &str) -> Request {
    http::Request::builder()
        .method("GET")
        .uri(path)
        .header("x-api-key", TEST_API_KEY)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: &str, path: &str, body: serde_json::Value) -> Request {
    http::Request::builder()
        .method(method)
        .uri(path)
        .header("x-api-key", TEST_API_KEY)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn read_json_body(resp: Response) -> serde_json::Value {
    let mut buf = Vec::new();
    resp.into_body()
        .reader()
        .read_to_end(&mut buf)
        .expect("read response body");
    serde_json::from_slice(&buf).expect("response body is JSON")
}
