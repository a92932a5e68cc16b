use crate::domain::model::PassWindow;
use chrono::{DateTime, Utc};
use std::io::{self, Write};

const RISETIME_FORMAT: &str = "%a %b %d %Y %H:%M:%S UTC";

/// risetime 轉成可讀的 UTC 時間；超出範圍時顯示原始秒數
pub fn format_risetime(risetime: i64) -> String {
    match DateTime::<Utc>::from_timestamp(risetime, 0) {
        Some(time) => time.format(RISETIME_FORMAT).to_string(),
        None => format!("@{}", risetime),
    }
}

pub fn format_pass(pass: &PassWindow) -> String {
    format!(
        "Next pass at {} for {} seconds!",
        format_risetime(pass.risetime),
        pass.duration
    )
}

pub fn write_passes<W: Write>(writer: &mut W, passes: &[PassWindow]) -> io::Result<()> {
    for pass in passes {
        writeln!(writer, "{}", format_pass(pass))?;
    }
    Ok(())
}

pub fn print_passes(passes: &[PassWindow]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_passes(&mut handle, passes)
}
