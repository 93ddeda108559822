use axum::http::HeaderMap;

pub fn request_id(headers: &HeaderMap) -> Option<String> {
    header_value(headers, "x-request-id")
}

pub fn user_agent(headers: &HeaderMap) -> Option<String> {
    header_value(headers, "user-agent")
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
}
