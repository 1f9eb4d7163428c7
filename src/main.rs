use anyhow::{Context, Result};
use clap::Parser;

use hudbar::commands;
use hudbar::config::{load_config, HudConfig};
use hudbar::hud::{DrawFlags, HudRect, ScreenSize, StatusBar};
use hudbar::{log_info, logging, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_level())?;

    let config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => HudConfig::default(),
    };
    let config = cli.merge_into_config(config)?;

    let (width, height) = cli.screen()?;
    let (ref_w, ref_h) = cli.reference()?;
    let mut bar = StatusBar::new(ScreenSize::new(width, height), config);
    bar.set_size(cli.reltop, ref_w, ref_h, -1, -1);
    if cli.hud {
        bar.layout_mut().begin_hud(-1, -1, 1.0, false);
    }
    log_info!("screen {}x{}, mode {:?}", width, height, bar.layout().draw_mode());

    let scale = bar.layout().scale_state();
    println!(
        "reference:    {}x{}",
        scale.reference.horizontal, scale.reference.vertical
    );
    println!("origin:       {},{}", scale.origin_x, scale.origin_y);
    if scale.is_sentinel() {
        println!("scale:        fullscreen");
    } else {
        println!("scale:        {}x{}", scale.scale_x, scale.scale_y);
    }
    println!("top:          {}", scale.top);
    println!("displacement: {}", scale.displacement);
    let hud_scale = bar.layout().hud_scale();
    println!("hud scale:    {}x{}", hud_scale.x, hud_scale.y);

    if let Some((x, y)) = cli.point()? {
        let (w, h) = cli.rect_size()?;
        let rect = bar
            .layout()
            .transform_rect(HudRect::new(x, y, w as f64, h as f64), DrawFlags::default());
        println!(
            "point:        {},{} {}x{} -> {:.2},{:.2} {:.2}x{:.2}",
            x, y, w, h, rect.x, rect.y, rect.w, rect.h
        );
    }

    if let Some(pop) = &cli.showpop {
        commands::execute(&mut bar, &["showpop", pop.as_str()])?;
    }
    Ok(())
}
