use std::sync::Arc;

use courier::api::DynAPI;
use courier::config::Config;
use courier::engine::{Engine, GeolocationResolver};
use courier::error::Error;
use courier::external::{ip_geolocation::IpGeolocator, tomtom::TomTom, DynGeolocator, DynRoutingService};
use courier::map::{DynPresenter, MapCanvas};
use courier::server::serve;

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;

    let routing = Arc::new(TomTom::from_config(&config)) as DynRoutingService;
    let geolocator = config
        .geolocation_api_url
        .clone()
        .map(|url| Arc::new(IpGeolocator::new(url)) as DynGeolocator);
    let resolver = GeolocationResolver::new(
        geolocator,
        config.default_origin,
        config.geolocation_timeout,
    );

    let canvas = Arc::new(MapCanvas::new(config.default_origin));
    let engine = Arc::new(
        Engine::new(
            routing,
            resolver,
            canvas.clone() as DynPresenter,
            config.routing_timeout,
        )
        .await,
    );

    let (selections, receiver) = async_channel::unbounded();
    tokio::spawn(engine.clone().listen(receiver));

    serve(engine as DynAPI, canvas, selections, config.listen_addr).await
}
