//! HTTP calling layer, served with `axum`.
//!
//! | Method | Path | Body / Query | Response |
//! |---|---|---|---|
//! | `POST` | `/api/routes/calculate` | `{start, end, vehicle_fuel_type}` | three plans |
//! | `POST` | `/api/tracking/:vehicle_id/start` | a plan | `{session_id, progress}` |
//! | `POST` | `/api/tracking/:vehicle_id/stop` | | `204` |
//! | `GET` | `/api/tracking/:vehicle_id` | | progress |
//! | `GET` | `/api/vehicles/:vehicle_id/location` | | `{lat, lng, recorded_at}` |
//! | `GET` | `/api/locations/nearby` | `lat, lng, type, radius?, count?` | stations |
//! | `GET` | `/api/safety/alerts` | `lat, lng` | alerts |

#[doc(hidden)]
pub mod error;
#[doc(hidden)]
pub mod service;


#[doc(inline)]
pub use service::{NearbyQuery, PositionQuery, RouteRequest, RouteService, TrackingStarted};
