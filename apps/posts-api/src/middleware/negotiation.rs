//! Content negotiation gate.
//!
//! [`MediaTypeGate::accept`] rejects requests whose `Accept` header excludes the
//! response mediatype (406); [`MediaTypeGate::require`] rejects requests whose
//! `Content-Type` is not the expected mediatype (415). Rejections short-circuit
//! before the wrapped handler runs.
//!
//! Gates compose through `wrap`; actix runs the last-registered wrapper first,
//! so routes register `require` before `accept`:
//!
//! ```ignore
//! web::resource("")
//!     .guard(guard::Post())
//!     .to(posts::create_post)
//!     .wrap(MediaTypeGate::require(APPLICATION_JSON))
//!     .wrap(MediaTypeGate::accept(APPLICATION_JSON))
//! ```

use actix_web::{
    Error, ResponseError,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{ACCEPT, CONTENT_TYPE, HeaderMap},
};
use std::future::{Future, Ready, ready};
use std::pin::Pin;

use super::error::AppError;

pub const APPLICATION_JSON: &str = "application/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Check {
    Accept,
    Require,
}

/// Middleware factory for one negotiation check against one mediatype.
#[derive(Debug, Clone, Copy)]
pub struct MediaTypeGate {
    check: Check,
    mediatype: &'static str,
}

impl MediaTypeGate {
    /// Require the client to accept `mediatype` responses.
    pub fn accept(mediatype: &'static str) -> Self {
        Self {
            check: Check::Accept,
            mediatype,
        }
    }

    /// Require the request body to be `mediatype`.
    pub fn require(mediatype: &'static str) -> Self {
        Self {
            check: Check::Require,
            mediatype,
        }
    }

    /// Run the check against request headers.
    pub fn check(&self, headers: &HeaderMap) -> Result<(), AppError> {
        match self.check {
            Check::Accept if !accepts(headers, self.mediatype) => {
                Err(AppError::NotAcceptable(self.mediatype))
            }
            Check::Require if !contains(headers, self.mediatype) => {
                Err(AppError::UnsupportedMediaType(self.mediatype))
            }
            _ => Ok(()),
        }
    }
}

/// Whether the `Accept` headers admit `mediatype`: an exact range or `*/*`,
/// ignoring parameters, excluding ranges with `q=0`. No header admits anything.
pub fn accepts(headers: &HeaderMap, mediatype: &str) -> bool {
    let mut values = headers.get_all(ACCEPT).peekable();
    if values.peek().is_none() {
        return true;
    }

    values
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|range| {
            let mut parts = range.split(';').map(str::trim);
            let essence = parts.next().unwrap_or_default();
            let rejected = parts.any(|param| is_zero_quality(param));
            !rejected && (essence.eq_ignore_ascii_case(mediatype) || essence == "*/*")
        })
}

/// Whether `Content-Type` names `mediatype`, ignoring parameters such as `charset`.
pub fn contains(headers: &HeaderMap, mediatype: &str) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case(mediatype))
}

fn is_zero_quality(param: &str) -> bool {
    let Some((name, value)) = param.split_once('=') else {
        return false;
    };
    name.trim().eq_ignore_ascii_case("q") && value.trim().parse::<f32>().is_ok_and(|q| q == 0.0)
}

impl<S, B> Transform<S, ServiceRequest> for MediaTypeGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = MediaTypeGateService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MediaTypeGateService {
            service,
            gate: *self,
        }))
    }
}

pub struct MediaTypeGateService<S> {
    service: S,
    gate: MediaTypeGate,
}

impl<S, B> Service<ServiceRequest> for MediaTypeGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Err(err) = self.gate.check(req.headers()) {
            tracing::debug!(
                method = %req.method(),
                path = %req.path(),
                "Negotiation rejected request: {}",
                err
            );

            let response = err.error_response();
            let (http_req, _payload) = req.into_parts();
            let srv_response = ServiceResponse::new(http_req, response);

            return Box::pin(async move { Ok(srv_response.map_into_right_body()) });
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            Ok(res.map_into_left_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test::{self as actix_test, TestRequest};
    use actix_web::{App, HttpResponse, web};

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut req = TestRequest::default();
        for pair in pairs {
            req = req.insert_header(*pair);
        }
        req.to_http_request().headers().clone()
    }

    #[test]
    fn test_accepts_exact_and_wildcard() {
        assert!(accepts(&headers(&[("Accept", "application/json")]), APPLICATION_JSON));
        assert!(accepts(&headers(&[("Accept", "*/*")]), APPLICATION_JSON));
        assert!(accepts(
            &headers(&[("Accept", "text/html, application/json;q=0.9")]),
            APPLICATION_JSON
        ));
        assert!(accepts(&headers(&[]), APPLICATION_JSON));
    }

    #[test]
    fn test_rejects_other_types() {
        assert!(!accepts(&headers(&[("Accept", "application/xml")]), APPLICATION_JSON));
        assert!(!accepts(&headers(&[("Accept", "application/*")]), APPLICATION_JSON));
        assert!(!accepts(
            &headers(&[("Accept", "application/json; q=0")]),
            APPLICATION_JSON
        ));
    }

    #[test]
    fn test_content_type_ignores_parameters() {
        assert!(contains(
            &headers(&[("Content-Type", "application/json; charset=utf-8")]),
            APPLICATION_JSON
        ));
        assert!(!contains(&headers(&[("Content-Type", "text/plain")]), APPLICATION_JSON));
        assert!(!contains(&headers(&[]), APPLICATION_JSON));
    }

    #[actix_web::test]
    async fn test_gates_run_accept_first() {
        let app = actix_test::init_service(
            App::new().service(
                web::resource("/echo")
                    .to(|| async { HttpResponse::Ok().body("handled") })
                    .wrap(MediaTypeGate::require(APPLICATION_JSON))
                    .wrap(MediaTypeGate::accept(APPLICATION_JSON)),
            ),
        )
        .await;

        let req = TestRequest::post()
            .uri("/echo")
            .insert_header(("Accept", "application/xml"))
            .insert_header(("Content-Type", "text/plain"))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_ACCEPTABLE);

        let req = TestRequest::post()
            .uri("/echo")
            .insert_header(("Accept", "application/json"))
            .insert_header(("Content-Type", "text/plain"))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let req = TestRequest::post()
            .uri("/echo")
            .insert_header(("Accept", "application/json"))
            .insert_header(("Content-Type", "application/json"))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(actix_test::read_body(resp).await, "handled");
    }
}
