//! Headless reveal
//!
//! Loads the assets under a directory (default `assets/`), waits for the
//! reveal, clicks the middle of the container and runs the opening to its
//! end, logging every step.
//!
//! ```text
//! RUST_LOG=info cargo run -p headless_reveal -- [asset_dir] [config.json] [name]
//! ```

use std::time::Duration;

use gift_reveal::prelude::*;

const CONTAINER: ContainerRect = ContainerRect {
    left: 0.0,
    top: 0.0,
    width: 800.0,
    height: 600.0,
};
const STEP: f32 = 1.0 / 60.0;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let asset_dir = args.next().unwrap_or_else(|| "assets".to_string());
    let config = match args.next() {
        Some(path) => GiftConfig::from_json_file(&path)?,
        None => GiftConfig::default(),
    };
    let name = args.next().unwrap_or_else(|| "Santee".to_string());

    let mut widget = GiftWidget::new(config, HeadlessRenderer::new(), CONTAINER, name)?
        .with_open_callback(|| log::info!("Open callback fired"));
    widget.start(AssetReader::file(&asset_dir))?;
    widget.wait_for_loads(Duration::from_secs(30));

    let progress = widget.load_progress();
    log::info!(
        "{}/{} resources finished ({} failed)",
        progress.loaded,
        progress.total,
        progress.failed
    );

    // Reveal delay plus the drop.
    run_for(&mut widget, 3.0);

    let (cx, cy) = (
        CONTAINER.left + CONTAINER.width / 2.0,
        CONTAINER.top + CONTAINER.height / 2.0,
    );
    let hover = widget.pointer_move(cx, cy);
    let click = widget.pointer_up(cx, cy);
    log::info!("Pointer at centre: hover {hover:?}, click {click:?}");

    run_for(&mut widget, 5.0);

    let frame = widget.renderer().last_frame.clone().unwrap_or_default();
    log::info!(
        "Done after {} frames: state {:?}, opened {}, {} visible nodes, opacity {:.2}",
        widget.renderer().frames_rendered,
        widget.state(),
        widget.is_opened(),
        frame.visible_nodes,
        frame.opacity
    );
    Ok(())
}

fn run_for(widget: &mut GiftWidget<HeadlessRenderer>, seconds: f32) {
    let steps = (seconds / STEP).ceil() as u32;
    for _ in 0..steps {
        widget.tick(STEP);
    }
}
