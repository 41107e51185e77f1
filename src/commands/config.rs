// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{
    KNOWN_SETTINGS, SETTING_AUTO_RUN, get_auto_run, get_show_cents,
    parse_bool, set_setting,
};
use anyhow::{Result, bail};
use rusqlite::Connection;

fn check_key(key: &str) -> Result<&str> {
    let key = key.trim();
    if !KNOWN_SETTINGS.contains(&key) {
        bail!(
            "Unknown setting '{}', expected one of: {}",
            key,
            KNOWN_SETTINGS.join(", ")
        );
    }
    Ok(key)
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("get", sub)) => {
            let key = check_key(sub.get_one::<String>("key").unwrap())?;
            let value = if key == SETTING_AUTO_RUN {
                get_auto_run(conn)?
            } else {
                get_show_cents(conn)?
            };
            println!("{} = {}", key, value);
        }
        Some(("set", sub)) => {
            let key = check_key(sub.get_one::<String>("key").unwrap())?;
            let value = parse_bool(sub.get_one::<String>("value").unwrap())?;
            set_setting(conn, key, &value.to_string())?;
            println!("{} = {}", key, value);
        }
        _ => {}
    }
    Ok(())
}
