fn main() {
    photo_editor::init_logger();

    if let Err(e) = photo_editor::run() {
        log::error!("operation failed: {e:#}");
        std::process::exit(1);
    }
}
