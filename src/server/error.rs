use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde_json::json;

use crate::geo::GeoError;
use crate::route::RouteError;
use crate::track::TrackingError;

impl crate::Error {
    pub fn status(&self) -> StatusCode {
        match self {
            crate::Error::Geo(GeoError::IdenticalEndpoints(_))
            | crate::Error::Geo(GeoError::InvalidCoordinate(_))
            | crate::Error::Geo(GeoError::InvalidRadius(_))
            | crate::Error::Geo(GeoError::TooManyResults { .. })
            | crate::Error::Route(RouteError::InvalidPlan(_))
            | crate::Error::Cost(_) => StatusCode::BAD_REQUEST,
            crate::Error::Tracking(TrackingError::UnknownVehicle(_)) => StatusCode::NOT_FOUND,
            crate::Error::Tracking(TrackingError::InvalidState { .. }) => StatusCode::CONFLICT,
            crate::Error::Geocode(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for crate::Error {
    fn into_response(self) -> Response {
        #[cfg(feature = "tracing")]
        tracing::event!(tracing::Level::ERROR, name = ?self);

        let code = self.status();
        if code.is_server_error() {
            error!("Request failed: {self}");
        }

        (code, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
