//! Cookies command
//!
//! Inspect the cookie export used for signed-in sessions.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use dvdnfo_core::loader::CookieSource;
use dvdnfo_core::types::CookieRecord;

use super::context::AppContext;

/// Cookies subcommands
#[derive(Debug, Subcommand)]
pub enum CookiesCommand {
    /// List cookie names, domains and expiry (values are never printed)
    Show,
}

/// Execute the cookies command
pub fn execute(cmd: CookiesCommand, ctx: &AppContext) -> Result<()> {
    match cmd {
        CookiesCommand::Show => show_cookies(ctx),
    }
}

fn expiry_label(cookie: &CookieRecord, now: i64) -> String {
    match cookie.expiration_date {
        _ if cookie.session => "session".to_string(),
        None => "session".to_string(),
        Some(secs) => {
            let when = chrono::DateTime::from_timestamp(secs as i64, 0)
                .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
                .unwrap_or_else(|| format!("{}", secs));
            if cookie.is_expired(now) {
                format!("expired {}", when)
            } else {
                when
            }
        }
    }
}

fn show_cookies(ctx: &AppContext) -> Result<()> {
    let config = ctx.config()?;
    let file = ctx.cookie_file(&config);

    if !file.exists() {
        eprintln!(
            "{} No cookie file at {}. Export cookies from a signed-in browser to enable ratings.",
            "⚠".yellow(),
            file.path().display()
        );
        return Ok(());
    }

    let jar = file
        .load()
        .context(format!("Failed to read {}", file.path().display()))?;
    let now = chrono::Utc::now().timestamp();

    println!("{}", "Cookies:".bold().underline());
    println!("{}", file.path().display().to_string().dimmed());
    println!();
    for cookie in jar.iter() {
        let expiry = expiry_label(cookie, now);
        let expiry = if cookie.is_expired(now) {
            expiry.red()
        } else {
            expiry.normal()
        };
        println!("  {:<24} {:<24} {}", cookie.name.cyan(), cookie.domain, expiry);
    }

    let live = jar.iter().filter(|c| !c.is_expired(now)).count();
    println!();
    println!("{} of {} cookies usable", live, jar.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_label() {
        let mut cookie = CookieRecord::new(".netflix.com", "NetflixId", "secret");
        assert_eq!(expiry_label(&cookie, 0), "session");

        cookie.session = false;
        cookie.expiration_date = Some(1_000.0);
        assert_eq!(expiry_label(&cookie, 2_000), "expired 1970-01-01 00:16 UTC");
        assert_eq!(expiry_label(&cookie, 500), "1970-01-01 00:16 UTC");
    }
}
