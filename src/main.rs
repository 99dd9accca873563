use relm4::prelude::*;
use tpie::config;
use tpie::gui::app::AppModel;
use tpie::gui::overlay::Overlay;
use tpie::sys::runtime;

fn main() {
    env_logger::init();

    match config::write_default_config() {
        Ok(path) => log::debug!("Using config at {}", path.display()),
        Err(e) => log::error!("Failed to write default config: {}", e),
    }
    let config = config::load_or_default();
    log::info!("Loaded {} rings", config.rings.len());

    let (tx, rx) = async_channel::bounded(32);
    runtime::start_background_services(tx);

    let app = RelmApp::new("org.tpie.tpie");
    app.run::<AppModel>((Overlay::new(config), rx));
}
