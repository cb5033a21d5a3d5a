use long_exposure_web::app::App;
use long_exposure_web::logging;

fn main() {
    logging::init();
    leptos::mount::mount_to_body(App);
}
