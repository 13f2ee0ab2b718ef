//! Startup animation shown before the interactive screen.

use std::{io::Write, time::Duration};

use tokio::time::{Instant, interval};

const FRAME_INTERVAL: Duration = Duration::from_millis(250);

const FRAMES: [&str; 4] = [
    "  ☁       clima",
    "   ☁      clima",
    "    ☁ ☀   clima",
    "   ☁      clima",
];

/// Loop the animation on `out` for `duration`, then clear the line.
pub async fn play<W: Write>(duration: Duration, out: &mut W) -> std::io::Result<()> {
    let deadline = Instant::now() + duration;
    let mut ticker = interval(FRAME_INTERVAL);

    for frame in FRAMES.iter().cycle() {
        ticker.tick().await;
        if Instant::now() >= deadline {
            break;
        }
        write!(out, "\r{frame}")?;
        out.flush()?;
    }

    write!(out, "\r\x1b[2K")?;
    out.flush()
}
