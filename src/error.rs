use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::fmt::{self, Debug, Display};
use std::net::AddrParseError;

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl std::error::Error for Error {}

impl Error {
    pub fn is_routing_unavailable(&self) -> bool {
        self.code == ROUTING_UNAVAILABLE
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        reqwest_error(err)
    }
}

impl From<AddrParseError> for Error {
    fn from(err: AddrParseError) -> Self {
        config_error(err)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match self.code {
            1..=99 => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
            ROUTING_UNAVAILABLE => (StatusCode::SERVICE_UNAVAILABLE, self.message.as_str()),
            _ => (StatusCode::BAD_REQUEST, self.message.as_str()),
        };

        let body = Json(json!({
            "code": self.code,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

const ROUTING_UNAVAILABLE: i32 = 102;

pub fn invalid_state_error() -> Error {
    Error {
        code: 100,
        message: "invalid state".into(),
    }
}

pub fn invalid_input_error() -> Error {
    Error {
        code: 101,
        message: "invalid input".into(),
    }
}

pub fn coordinate_range_error() -> Error {
    Error {
        code: 101,
        message: "Longitude & Latitude must be between -90 and 90 inclusive".into(),
    }
}

pub fn routing_unavailable_error() -> Error {
    Error {
        code: ROUTING_UNAVAILABLE,
        message: "routing unavailable".into(),
    }
}

pub fn config_error<T: Debug>(_: T) -> Error {
    Error {
        code: 2,
        message: "configuration error".into(),
    }
}

pub fn reqwest_error(_: reqwest::Error) -> Error {
    Error {
        code: 3,
        message: "reqwest error".into(),
    }
}

pub fn upstream_error() -> Error {
    Error {
        code: 4,
        message: "upstream error".into(),
    }
}

pub fn unexpected_error() -> Error {
    Error {
        code: 5,
        message: "unexpected error".into(),
    }
}

#[test]
fn routing_unavailable_maps_to_service_unavailable() {
    let response = routing_unavailable_error().into_response();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[test]
fn internal_errors_hide_their_message() {
    let response = upstream_error().into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = coordinate_range_error().into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
