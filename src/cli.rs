// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print as pretty JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    ]
}

fn id_arg() -> Arg {
    Arg::new("id").long("id").required(true).help("Record id")
}

fn as_of_arg() -> Arg {
    Arg::new("date")
        .long("date")
        .help("Evaluate as of this date (YYYY-MM-DD, default today)")
}

fn kind_arg(required: bool) -> Arg {
    Arg::new("kind")
        .long("kind")
        .required(required)
        .help("income | expense")
}

fn amount_arg(required: bool) -> Arg {
    Arg::new("amount")
        .long("amount")
        .required(required)
        .allow_hyphen_values(true)
        .help("Positive amount; '12,50' and '1 200' are accepted")
}

fn category_arg(required: bool) -> Arg {
    Arg::new("category").long("category").required(required)
}

fn transactions_cmd() -> Command {
    Command::new("tx")
        .about("Record and browse transactions")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Record a one-off transaction")
                .arg(kind_arg(true))
                .arg(amount_arg(true))
                .arg(category_arg(false).help("Defaults to 'Uncategorized'"))
                .arg(
                    Arg::new("date")
                        .long("date")
                        .help("Transaction date (default today)"),
                ),
        )
        .subcommand(
            Command::new("list")
                .about("List transactions, newest first")
                .arg(Arg::new("from").long("from").help("Earliest date, inclusive"))
                .arg(Arg::new("to").long("to").help("Latest date, inclusive"))
                .arg(kind_arg(false))
                .arg(category_arg(false).help("Case-insensitive category match"))
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize)),
                )
                .args(json_args()),
        )
        .subcommand(
            Command::new("edit")
                .about("Change fields of a transaction")
                .arg(id_arg())
                .arg(kind_arg(false))
                .arg(amount_arg(false))
                .arg(category_arg(false))
                .arg(Arg::new("date").long("date")),
        )
        .subcommand(Command::new("rm").about("Delete a transaction").arg(id_arg()))
}

fn budgets_cmd() -> Command {
    Command::new("budget")
        .about("Rolling weekly/monthly budgets per category")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Create a budget")
                .arg(category_arg(true))
                .arg(amount_arg(true))
                .arg(
                    Arg::new("period")
                        .long("period")
                        .required(true)
                        .help("weekly | monthly"),
                )
                .arg(
                    Arg::new("anchor")
                        .long("anchor")
                        .help("Date the cycles are aligned to (default today)"),
                ),
        )
        .subcommand(
            Command::new("list")
                .about("Show each budget's current cycle and spend")
                .arg(as_of_arg())
                .args(json_args()),
        )
        .subcommand(
            Command::new("edit")
                .about("Change fields of a budget")
                .arg(id_arg())
                .arg(category_arg(false))
                .arg(amount_arg(false))
                .arg(Arg::new("period").long("period"))
                .arg(Arg::new("anchor").long("anchor")),
        )
        .subcommand(Command::new("rm").about("Delete a budget").arg(id_arg()))
}

fn recurring_cmd() -> Command {
    Command::new("recurring")
        .about("Recurring income and expense rules")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Create a rule and post anything already due")
                .arg(kind_arg(true))
                .arg(amount_arg(true))
                .arg(category_arg(true))
                .arg(
                    Arg::new("frequency")
                        .long("frequency")
                        .required(true)
                        .help("daily | weekly | monthly"),
                )
                .arg(
                    Arg::new("anchor")
                        .long("anchor")
                        .help("First occurrence (default today)"),
                ),
        )
        .subcommand(
            Command::new("list")
                .about("List rules with their next due date")
                .arg(as_of_arg())
                .args(json_args()),
        )
        .subcommand(
            Command::new("edit")
                .about("Change fields of a rule")
                .arg(id_arg())
                .arg(kind_arg(false))
                .arg(amount_arg(false))
                .arg(category_arg(false))
                .arg(Arg::new("frequency").long("frequency"))
                .arg(Arg::new("anchor").long("anchor")),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete a rule; posted transactions are kept")
                .arg(id_arg()),
        )
        .subcommand(
            Command::new("run")
                .about("Post every due occurrence up to the given date")
                .arg(as_of_arg()),
        )
}

pub fn build_cli() -> Command {
    Command::new("finwise")
        .version(crate_version!())
        .about("Track income and expenses, recurring rules and rolling budgets")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .help("Database file (default: $FINWISE_DB or the platform data dir)"),
        )
        .arg(
            Arg::new("no_auto_run")
                .long("no-auto-run")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Skip posting due recurring transactions at startup"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(transactions_cmd())
        .subcommand(budgets_cmd())
        .subcommand(recurring_cmd())
        .subcommand(
            Command::new("summary")
                .about("This month at a glance")
                .arg(as_of_arg())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print as pretty JSON"),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Read or change settings")
                .subcommand_required(true)
                .subcommand(
                    Command::new("get")
                        .arg(Arg::new("key").required(true).help("show_cents | auto_run")),
                )
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true).help("show_cents | auto_run"))
                        .arg(Arg::new("value").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Check stored data for inconsistencies"))
}
