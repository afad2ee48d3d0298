use std::io;
use std::process::Command;

pub fn copy(text: &str) -> io::Result<()> {
    let status = Command::new("wl-copy").arg("--").arg(text).status()?;
    if !status.success() {
        return Err(io::Error::other(format!("wl-copy exited with {status}")));
    }
    Ok(())
}
