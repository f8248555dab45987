//! Local bracket provider for trying the API by hand.
//!
//! ```text
//! cargo run --example mock_provider
//! TAX_API_BASE=http://127.0.0.1:8081/tax-calculator/tax-year cargo run
//! ```

use axum::{extract::Path, http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;

async fn brackets(Path(year): Path<i32>) -> (StatusCode, Json<Value>) {
    if year < 2019 {
        return (StatusCode::NOT_FOUND, Json(json!({ "errors": [{ "message": "Tax year not supported" }] })));
    }

    (
        StatusCode::OK,
        Json(json!({
            "tax_brackets": [
                { "min": 0, "max": 50197, "rate": 0.15 },
                { "min": 50197, "max": 100392, "rate": 0.205 },
                { "min": 100392, "max": 155625, "rate": 0.26 },
                { "min": 155625, "max": 221708, "rate": 0.29 },
                { "min": 221708, "rate": 0.33 }
            ]
        })),
    )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let app = Router::new().route("/tax-calculator/tax-year/{year}", get(brackets));

    let addr = SocketAddr::from(([127, 0, 0, 1], 8081));
    println!("Mock bracket provider listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
