use threefinger::backends::probe_devices;
use threefinger::calibration::calibrate;
use threefinger::selector::choose;

fn main() {
    let metas: Vec<_> = probe_devices().iter().map(|d| d.metadata()).collect();
    for meta in &metas {
        println!(
            "{} types={:?} abs={:?}",
            meta,
            meta.capabilities.event_types,
            meta.capabilities.abs_axes.keys().collect::<Vec<_>>()
        );
    }

    match choose(&metas) {
        Some(sel) => {
            let meta = &metas[sel.index];
            println!("selected {} ({:?})", meta, sel.reason);
            println!("{:?}", calibrate(meta));
        }
        None => println!("no touchpad candidate (are you root?)"),
    }
}
