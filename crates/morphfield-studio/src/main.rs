mod app;
mod meshes;
mod page;

use morphfield_engine::logging::{LoggingConfig, init_logging};

use app::Application;

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    println!();
    println!("  morphfield studio");
    println!("  wheel / arrows / PageUp / PageDown / Home / End  scroll the page");
    println!("  Esc                                              quit");
    println!();

    Application::new()
        .title("morphfield")
        .size(1280.0, 720.0)
        .particles(128)
        .rotation_speed(0.05)
        .noise(0.02, 1.5)
        .section_height(1000.0)
        .scroll_smoothing(0.15)
        .run()
}
