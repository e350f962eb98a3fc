//! HTTP surface of the service.
//!
//! - `POST /weather` with `{date, location, notes?}` returns `{id}`.
//! - `GET /weather/{id}` returns the stored record.
//!
//! Failures are reported as `{"detail": "..."}` with a status derived from
//! [`WeatherError`].

use serde::Serialize;
use serde_json::json;
use std::convert::Infallible;
use warp::{
    Filter, Rejection, Reply,
    filters::body::BodyDeserializeError,
    http::StatusCode,
    reject::{LengthRequired, MethodNotAllowed, PayloadTooLarge, UnsupportedMediaType},
    reply::Response,
};
use weather_core::{CreateWeatherRequest, CreateWeatherResponse, WeatherError, WeatherService};

const MAX_BODY_BYTES: u64 = 16 * 1024;

pub fn routes(
    service: WeatherService,
    allowed_origins: Vec<String>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let with_service = warp::any().map(move || service.clone());

    let create = warp::path!("weather")
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(with_service.clone())
        .then(create_weather);

    let get = warp::path!("weather" / String)
        .and(warp::get())
        .and(with_service)
        .map(get_weather);

    let cors = warp::cors()
        .allow_origins(allowed_origins.iter().map(String::as_str))
        .allow_methods(vec!["GET", "POST"])
        .allow_headers(vec!["content-type", "accept", "authorization"])
        .allow_credentials(true);

    create
        .or(get)
        .unify()
        .recover(handle_rejection)
        .with(cors)
        .with(warp::trace::request())
}

async fn create_weather(request: CreateWeatherRequest, service: WeatherService) -> Response {
    match service.create_record(request).await {
        Ok(id) => json_reply(StatusCode::OK, &CreateWeatherResponse { id }),
        Err(err) => error_reply(&err),
    }
}

fn get_weather(id: String, service: WeatherService) -> Response {
    match service.get_record(&id) {
        Ok(record) => json_reply(StatusCode::OK, &record),
        Err(err) => error_reply(&err),
    }
}

fn status_for(err: &WeatherError) -> StatusCode {
    match err {
        WeatherError::InvalidInput(_) | WeatherError::ProviderRejected(_) => StatusCode::BAD_REQUEST,
        WeatherError::ProviderUnreachable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        WeatherError::NotFound { .. } => StatusCode::NOT_FOUND,
    }
}

fn error_reply(err: &WeatherError) -> Response {
    detail_reply(status_for(err), &err.to_string())
}

fn detail_reply(status: StatusCode, detail: &str) -> Response {
    json_reply(status, &json!({ "detail": detail }))
}

fn json_reply<T: Serialize>(status: StatusCode, body: &T) -> Response {
    warp::reply::with_status(warp::reply::json(body), status).into_response()
}

async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    let reply = if err.is_not_found() {
        detail_reply(StatusCode::NOT_FOUND, "Not Found")
    } else if let Some(e) = err.find::<BodyDeserializeError>() {
        detail_reply(StatusCode::UNPROCESSABLE_ENTITY, &e.to_string())
    } else if err.find::<PayloadTooLarge>().is_some() {
        detail_reply(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large")
    } else if err.find::<LengthRequired>().is_some() {
        detail_reply(StatusCode::LENGTH_REQUIRED, "Content-Length required")
    } else if err.find::<UnsupportedMediaType>().is_some() {
        detail_reply(StatusCode::UNSUPPORTED_MEDIA_TYPE, "Expected application/json")
    } else if err.find::<MethodNotAllowed>().is_some() {
        detail_reply(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
    } else {
        tracing::error!(?err, "unhandled rejection");
        detail_reply(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
    };

    Ok(reply)
}
