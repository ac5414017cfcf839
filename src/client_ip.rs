use axum::http::HeaderMap;
use std::net::SocketAddr;

pub const FORWARDED_FOR: &str = "x-forwarded-for";

// Client identity used to bucket rate-limit state: the first hop of
// X-Forwarded-For when present, otherwise the socket peer address. Never
// fails - anything unparseable falls back to the peer address.
pub fn client_key(headers: &HeaderMap, peer: SocketAddr) -> String {
    if let Some(value) = headers.get(FORWARDED_FOR) {
        if let Ok(raw) = value.to_str() {
            if let Some(first) = raw.split(',').next() {
                let first = first.trim();
                if !first.is_empty() {
                    return first.to_string();
                }
            }
        }
    }
    peer.ip().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn peer() -> SocketAddr {
        "10.0.0.9:43210".parse().unwrap()
    }

    fn headers_with(value: &[u8]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(FORWARDED_FOR, HeaderValue::from_bytes(value).unwrap());
        headers
    }

    #[test]
    fn missing_header_falls_back_to_peer_address() {
        assert_eq!(client_key(&HeaderMap::new(), peer()), "10.0.0.9");
    }

    #[test]
    fn forwarded_for_takes_the_first_hop() {
        let headers = headers_with(b"1.2.3.4, 172.16.0.1, 10.0.0.1");
        assert_eq!(client_key(&headers, peer()), "1.2.3.4");
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let headers = headers_with(b"  1.2.3.4  ");
        assert_eq!(client_key(&headers, peer()), "1.2.3.4");
    }

    #[test]
    fn empty_or_comma_only_header_falls_back_to_peer_address() {
        assert_eq!(client_key(&headers_with(b""), peer()), "10.0.0.9");
        assert_eq!(client_key(&headers_with(b" , 5.6.7.8"), peer()), "10.0.0.9");
    }

    #[test]
    fn non_utf8_header_falls_back_to_peer_address() {
        let headers = headers_with(&[0xfe, 0xff]);
        assert_eq!(client_key(&headers, peer()), "10.0.0.9");
    }
}
