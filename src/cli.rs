// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

pub fn build_cli() -> Command {
    Command::new("billfold")
        .about("Billfold: local-first personal budgeting data layer and CLI")
        .version(crate_version!())
        .subcommand_required(false)
        .subcommand(Command::new("init").about("Initialize the local store"))
        .subcommand(
            Command::new("account")
                .about("Manage accounts")
                .subcommand(
                    Command::new("add")
                        .about("Add an account")
                        .arg(Arg::new("name").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .default_value("general")
                                .help("general|savings"),
                        )
                        .arg(
                            Arg::new("balance")
                                .long("balance")
                                .default_value("0")
                                .help("Opening balance"),
                        )
                        .arg(Arg::new("icon").long("icon").default_value("wallet"))
                        .arg(Arg::new("color").long("color").default_value("#4caf50"))
                        .arg(
                            Arg::new("goal")
                                .long("goal")
                                .help("Savings goal balance"),
                        ),
                )
                .subcommand(json_flags(Command::new("list").about("List accounts")))
                .subcommand(
                    Command::new("rm")
                        .about("Remove an account and everything posted against it")
                        .arg(Arg::new("id").required(true)),
                )
                .subcommand(
                    Command::new("recompute")
                        .about("Recompute an account balance from its postings")
                        .arg(Arg::new("id").required(true)),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("Manage spending categories")
                .subcommand(
                    Command::new("add")
                        .about("Add a category")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("icon").long("icon").default_value("tag"))
                        .arg(Arg::new("color").long("color").default_value("#2196f3"))
                        .arg(
                            Arg::new("budget")
                                .long("budget")
                                .default_value("0")
                                .help("Allocated ceiling"),
                        )
                        .arg(
                            Arg::new("account")
                                .long("account")
                                .help("Owning account id"),
                        ),
                )
                .subcommand(json_flags(Command::new("list").about("List categories")))
                .subcommand(
                    Command::new("rm")
                        .about("Remove a category")
                        .arg(Arg::new("id").required(true)),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Manage transactions")
                .subcommand(
                    Command::new("add")
                        .about("Post a transaction")
                        .arg(
                            Arg::new("type")
                                .required(true)
                                .help("income|expense"),
                        )
                        .arg(Arg::new("amount").required(true))
                        .arg(
                            Arg::new("account")
                                .long("account")
                                .required(true)
                                .help("Account id to post against"),
                        )
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .default_value("Uncategorized"),
                        )
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .help("YYYY-MM-DD, default today"),
                        )
                        .arg(
                            Arg::new("description")
                                .long("description")
                                .default_value(""),
                        )
                        .arg(Arg::new("notes").long("notes")),
                )
                .subcommand(
                    json_flags(
                        Command::new("list")
                            .about("List transactions")
                            .arg(Arg::new("account").long("account").help("Filter by account id"))
                            .arg(Arg::new("category").long("category").help("Filter by category"))
                            .arg(
                                Arg::new("limit")
                                    .long("limit")
                                    .value_parser(clap::value_parser!(usize)),
                            ),
                    ),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Remove a transaction")
                        .arg(Arg::new("id").required(true)),
                ),
        )
        .subcommand(
            Command::new("bill")
                .about("Manage bills")
                .subcommand(
                    Command::new("add")
                        .about("Add a bill")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("amount").required(true))
                        .arg(
                            Arg::new("due")
                                .long("due")
                                .required(true)
                                .help("Due date, YYYY-MM-DD"),
                        )
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .default_value("Bills"),
                        )
                        .arg(
                            Arg::new("recurring")
                                .long("recurring")
                                .action(ArgAction::SetTrue),
                        )
                        .arg(
                            Arg::new("frequency")
                                .long("frequency")
                                .help("weekly|monthly|quarterly|yearly"),
                        )
                        .arg(
                            Arg::new("autopay")
                                .long("autopay")
                                .action(ArgAction::SetTrue),
                        )
                        .arg(Arg::new("method").long("method").help("Payment method")),
                )
                .subcommand(
                    json_flags(
                        Command::new("list")
                            .about("List bills")
                            .arg(
                                Arg::new("status")
                                    .long("status")
                                    .help("pending|paid|overdue"),
                            ),
                    ),
                )
                .subcommand(
                    Command::new("pay")
                        .about("Mark a bill paid and post the expense")
                        .arg(Arg::new("id").required(true))
                        .arg(
                            Arg::new("account")
                                .long("account")
                                .required(true)
                                .help("Account id to debit"),
                        ),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Remove a bill")
                        .arg(Arg::new("id").required(true)),
                ),
        )
        .subcommand(
            Command::new("budget")
                .about("Manage the overall budget")
                .subcommand(
                    Command::new("set")
                        .about("Set the budget total")
                        .arg(Arg::new("total").required(true)),
                )
                .subcommand(json_flags(
                    Command::new("status").about("Recompute and show budget statistics"),
                )),
        )
        .subcommand(
            Command::new("export").about("Export data").subcommand(
                Command::new("transactions")
                    .about("Export transactions")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .help("csv|json"),
                    )
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
        .subcommand(
            Command::new("doctor")
                .about("Check balance invariants and dangling references")
                .arg(
                    Arg::new("fix")
                        .long("fix")
                        .action(ArgAction::SetTrue)
                        .help("Repair drifted balances"),
                ),
        )
        .subcommand(
            Command::new("reset")
                .about("Wipe the local store")
                .arg(
                    Arg::new("yes")
                        .long("yes")
                        .action(ArgAction::SetTrue)
                        .help("Confirm the wipe"),
                ),
        )
}
