use panoview::{convert, Orientation, ReprojectionSession};

#[cfg(feature = "tracing")]
use panoview::core::init_tracing;

/// Render four views around the horizon, 90 degrees apart.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "tracing")]
    init_tracing(false);

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("Usage: render_view <panorama> [out_prefix]");
        return Ok(());
    };
    let prefix = std::env::args().nth(2).unwrap_or_else(|| "view".to_string());

    let pano = convert::buffer_from_dynamic(&image::open(path)?);
    let mut session = ReprojectionSession::new();
    session.set_intrinsic_fov(800, 600, 90.0)?;
    session.set_source(&pano.view())?;

    for (i, pan) in [0.0, 90.0, 180.0, 270.0].into_iter().enumerate() {
        session.set_orientation(Orientation::from_pan_tilt(pan, 0.0, 0.0)?);
        let out = format!("{prefix}_{i}.png");
        convert::to_dynamic_image(session.render()?)?.save(&out)?;
        println!("pan {pan:>5.1} -> {out}");
    }

    Ok(())
}
