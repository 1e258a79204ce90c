mod coordinates;
mod destination;
mod route;
mod selection;
mod session;

pub use coordinates::{Coordinates, INPUT_LIMIT};
pub use destination::DestinationSet;
pub use route::{RankedDestination, Route, RouteGeometry, RoutePath, RouteSummary};
pub use selection::Selection;
pub use session::Session;
