use actix_web::HttpRequest;
use url::Url;

use crate::errors::AppError;

/// Absolute URL of the current request, as the client addressed it.
pub fn absolute_url(req: &HttpRequest) -> Result<Url, AppError> {
    let info = req.connection_info();
    let path = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    Url::parse(&format!("{}://{}{}", info.scheme(), info.host(), path))
        .map_err(|e| AppError::InternalError(format!("Unparseable request URL: {}", e)))
}

/// Absolute media prefix for image links, `media_url` resolved against the
/// request host.
pub fn media_base_url(req: &HttpRequest, media_url: &str) -> String {
    let info = req.connection_info();
    let mut base = format!("{}://{}/{}", info.scheme(), info.host(), media_url.trim_start_matches('/'));

    if !base.ends_with('/') {
        base.push('/');
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn rebuilds_the_request_url_with_query() {
        let req = TestRequest::get()
            .uri("/api/projects?limit=2&offset=0")
            .insert_header(("host", "testserver"))
            .to_http_request();

        let url = absolute_url(&req).unwrap();
        assert_eq!(url.as_str(), "http://testserver/api/projects?limit=2&offset=0");
    }

    #[test]
    fn relative_media_url_resolves_against_host() {
        let req = TestRequest::get()
            .uri("/api/projects")
            .insert_header(("host", "testserver"))
            .to_http_request();

        assert_eq!(media_base_url(&req, "/media/"), "http://testserver/media/");
        assert_eq!(media_base_url(&req, "media"), "http://testserver/media/");
    }
}
