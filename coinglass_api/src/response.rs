//! Classification of the raw Coinglass response envelope.
//!
//! Every endpoint answers with `{"success": bool, "code": .., "msg": .., "data": ..}`.
//! When the request never reached the API (gateway failures and the like) the
//! body instead carries `status` and `error`.

use serde_json::Value;

use crate::Error;

/// Code the API uses to signal that the request quota is exhausted.
pub const RATE_LIMIT_CODE: i64 = 50001;

/// Checks a raw response and returns its `data` payload.
///
/// Exactly one interpretation applies: transport failure (no `success`
/// key), API failure (`success` false), or success with data.
pub fn check(response: Value) -> Result<Value, Error> {
    let Value::Object(mut body) = response else {
        tracing::error!("Response is not a JSON object");
        return Err(Error::Communication {
            status: String::new(),
            error: String::new(),
        });
    };

    let Some(success) = body.get("success") else {
        let status = body.get("status").map(render).unwrap_or_default();
        let error = body.get("error").map(render).unwrap_or_default();
        tracing::error!("Unable to communicate with API: {} {}", status, error);
        return Err(Error::Communication { status, error });
    };

    if !is_truthy(success) {
        let raw_code = body.get("code").unwrap_or(&Value::Null);
        let code = render(raw_code);
        let msg = body.get("msg").map(render).unwrap_or_default();
        if is_rate_limit_code(raw_code) {
            tracing::warn!("Rate limit exceeded (code {})", code);
            return Err(Error::RateLimited);
        }
        tracing::error!("API request failed with code {}: {}", code, msg);
        return Err(Error::Request { code, msg });
    }

    body.remove("data").ok_or_else(|| {
        tracing::warn!("API call succeeded but returned no data");
        Error::NoData
    })
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s.eq_ignore_ascii_case("true"),
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    }
}

/// Compares numerically, so `50001`, `50001.0` and `"50001"` all match.
fn is_rate_limit_code(code: &Value) -> bool {
    let numeric = match code {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    numeric == Some(RATE_LIMIT_CODE as f64)
}

/// Renders a scalar JSON value verbatim; strings lose their quotes.
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
