//! Fixed-width OHLC table for the terminal.

use crate::domain::ohlc::OhlcBar;
use std::io::{self, Write};

const RULE_WIDTH: usize = 60;

pub fn render_table<W: Write + ?Sized>(
    out: &mut W,
    ticker: &str,
    bars: &[OhlcBar],
) -> io::Result<()> {
    writeln!(out, "{}", ticker.to_uppercase())?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(
        out,
        "{:<12} {:<8} {:<8} {:<8} {:<8}",
        "date", "open", "high", "low", "close"
    )?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    for bar in bars {
        writeln!(
            out,
            "{:<12} {:<8.2} {:<8.2} {:<8.2} {:<8.2}",
            bar.date.format("%Y-%m-%d").to_string(),
            bar.open,
            bar.high,
            bar.low,
            bar.close
        )?;
    }
    Ok(())
}
