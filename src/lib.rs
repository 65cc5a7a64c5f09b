#![doc = include_str!("../readme.md")]

#[cfg(feature = "mimalloc")]
use mimalloc::MiMalloc;
#[cfg_attr(feature = "mimalloc", global_allocator)]
#[cfg(feature = "mimalloc")]
static GLOBAL: MiMalloc = MiMalloc;

pub mod alerts;
pub mod config;
pub mod cost;
pub mod error;
pub mod geo;
pub mod route;
pub mod stations;
pub mod toll;
pub mod track;
pub mod util;
pub mod vehicle;

#[cfg(feature = "http_server")]
pub mod server;

#[doc(inline)]
pub use crate::config::Config;
#[doc(inline)]
pub use crate::error::{Error, Result};
#[doc(inline)]
pub use crate::geo::Coordinate;
#[doc(inline)]
pub use crate::route::{RoutePlan, RoutePlanner, RouteType};
#[doc(inline)]
pub use crate::toll::{TollCharge, TollLocator};
#[doc(inline)]
pub use crate::track::{SessionHandle, Tracker};
#[doc(inline)]
pub use crate::vehicle::{FuelType, VehicleId, VehicleProfile};
