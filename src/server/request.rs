use crate::handler::HandlerRequest;
use http::Method;
use may_minihttp::Request;
use std::collections::HashMap;
use std::io::Read;
use tracing::{debug, info};

/// Parse cookies out of an already-lowercased header map.
pub fn parse_cookies(headers: &HashMap<String, String>) -> HashMap<String, String> {
    headers
        .get("cookie")
        .map(|c| {
            c.split(';')
                .filter_map(|pair| {
                    let mut parts = pair.trim().splitn(2, '=');
                    let name = parts.next()?.trim().to_string();
                    let value = parts.next().unwrap_or("").trim().to_string();
                    Some((name, value))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Parse query string parameters from a raw URL path.
///
/// Everything after `?` is form-urldecoded into a name/value map.
pub fn parse_query_params(path: &str) -> HashMap<String, String> {
    match path.find('?') {
        Some(pos) => url::form_urlencoded::parse(path[pos + 1..].as_bytes())
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        None => HashMap::new(),
    }
}

/// Parse an `application/x-www-form-urlencoded` request body into fields.
pub fn parse_form_params(body: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(body.as_bytes())
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Extract a [`HandlerRequest`] from a raw `may_minihttp::Request`.
///
/// Splits the query string off the path, lowercases header names, parses
/// cookies and query parameters, and decodes form fields when the body is
/// urlencoded. The routing core only looks at method and path; the rest is
/// carried through for the handler.
pub fn parse_request(req: Request) -> HandlerRequest {
    // httparse has already validated the method token, so this cannot fail
    // in practice; extension methods still parse and are rejected later as 405.
    let method = Method::from_bytes(req.method().as_bytes()).unwrap_or(Method::GET);
    let raw_path = req.path().to_string();
    let path = raw_path
        .split('?')
        .next()
        .unwrap_or("/")
        .to_string();

    let headers: HashMap<String, String> = req
        .headers()
        .iter()
        .map(|h| {
            (
                h.name.to_ascii_lowercase(),
                String::from_utf8_lossy(h.value).to_string(),
            )
        })
        .collect();

    let cookies = parse_cookies(&headers);
    let query_params = parse_query_params(&raw_path);

    let form_params = {
        let mut body_str = String::new();
        let is_form = headers
            .get("content-type")
            .map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
            .unwrap_or(false);
        if is_form && matches!(req.body().read_to_string(&mut body_str), Ok(n) if n > 0) {
            debug!(body_size_bytes = body_str.len(), "Form body read");
            parse_form_params(&body_str)
        } else {
            HashMap::new()
        }
    };

    info!(
        method = %method,
        path = %path,
        header_count = headers.len(),
        query_param_count = query_params.len(),
        form_param_count = form_params.len(),
        "HTTP request parsed"
    );

    HandlerRequest {
        method,
        path,
        headers,
        cookies,
        query_params,
        form_params,
    }
}
