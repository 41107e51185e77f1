// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod calendar;
pub mod cli;
pub mod commands;
pub mod cycle;
pub mod db;
pub mod errors;
pub mod logging;
pub mod materialize;
pub mod models;
pub mod recurrence;
pub mod store;
pub mod summary;
pub mod utils;
