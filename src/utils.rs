// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::{Local, NaiveDate};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

use crate::calendar::parse_iso_date;

pub const SETTING_SHOW_CENTS: &str = "show_cents";
pub const SETTING_AUTO_RUN: &str = "auto_run";
pub const KNOWN_SETTINGS: [&str; 2] = [SETTING_SHOW_CENTS, SETTING_AUTO_RUN];

/// Today's local calendar date. Only the CLI layer reads the clock.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    parse_iso_date(s).ok_or_else(|| {
        anyhow!(
            "Invalid date '{}', expected YYYY-MM-DD or an ISO 8601 timestamp",
            s.trim()
        )
    })
}

/// Optional `--<name>` date argument, falling back to `default`.
pub fn date_arg_or(sub: &clap::ArgMatches, name: &str, default: NaiveDate) -> Result<NaiveDate> {
    match sub.get_one::<String>(name) {
        Some(s) => parse_date(s),
        None => Ok(default),
    }
}

/// Parses a user-typed amount. Whitespace is ignored and a comma decimal
/// separator is accepted, so `"1 234,50"` reads as 1234.50.
pub fn parse_amount(s: &str) -> Result<Decimal> {
    let normalized: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    let normalized = normalized.replacen(',', ".", 1);
    normalized
        .parse::<Decimal>()
        .with_context(|| format!("Invalid amount '{}'", s.trim()))
}

pub fn parse_id(s: &str) -> Result<i64> {
    s.trim()
        .parse::<i64>()
        .with_context(|| format!("Invalid id '{}'", s.trim()))
}

pub fn fmt_money(d: &Decimal, show_cents: bool) -> String {
    if show_cents {
        format!("{:.2}", d.round_dp(2))
    } else {
        d.round().normalize().to_string()
    }
}

pub fn fmt_ratio(ratio: &Decimal) -> String {
    format!("{}%", (*ratio * Decimal::ONE_HUNDRED).round())
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

// Settings

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn parse_bool(s: &str) -> Result<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(anyhow!("Invalid boolean '{}', expected true or false", s.trim())),
    }
}

fn get_flag_setting(conn: &Connection, key: &str, default: bool) -> Result<bool> {
    match get_setting(conn, key)? {
        Some(v) => parse_bool(&v).with_context(|| format!("Setting '{}'", key)),
        None => Ok(default),
    }
}

pub fn get_show_cents(conn: &Connection) -> Result<bool> {
    get_flag_setting(conn, SETTING_SHOW_CENTS, true)
}

pub fn get_auto_run(conn: &Connection) -> Result<bool> {
    get_flag_setting(conn, SETTING_AUTO_RUN, true)
}
