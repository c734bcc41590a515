#![deny(missing_docs)]
#![deny(warnings)]

//! Console entry point for the weather prediction engine.

use weathersense::config::AppConfig;
use weathersense::controller::{ConsoleScreen, Controller, ForecastController, StdinEvents};
use weathersense::engine::Engine;
use weathersense::logging;
use weathersense::ml::boosted_stumps::BoostedStumps;
use weathersense::sensor::SimulatedSensor;
use weathersense::store::DatasetStore;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }

    let config = AppConfig::load_or_default();
    let store = DatasetStore::new(config.data_path()?);
    tracing::info!("Training data at {}", store.path().display());

    let engine = Engine::spawn(config.engine_config(), store, BoostedStumps::default());
    let mut controller = ForecastController::new(
        engine,
        SimulatedSensor::default(),
        StdinEvents::spawn(),
        ConsoleScreen::new(),
    );

    println!("y = confirm the forecast, n = next guess, q = quit");
    controller.run();
    controller.shutdown()?;
    Ok(())
}
