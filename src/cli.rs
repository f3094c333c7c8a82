// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    )
}

fn id_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .value_parser(value_parser!(i64))
}

fn text_id_arg() -> Arg {
    Arg::new("id").long("id").required(true)
}

fn budget_cmd() -> Command {
    Command::new("budget")
        .about("Expenses and the monthly budget")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Record an expense")
                .arg(Arg::new("category").long("category").default_value("Housing"))
                .arg(
                    Arg::new("amount")
                        .long("amount")
                        .required(true)
                        .allow_hyphen_values(true),
                )
                .arg(Arg::new("date").long("date").help("YYYY-MM-DD, defaults to today")),
        )
        .subcommand(json_flags(
            Command::new("list")
                .about("Recent expenses and budget status")
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .default_value("4")
                        .value_parser(value_parser!(usize)),
                )
                .arg(Arg::new("all").long("all").action(ArgAction::SetTrue)),
        ))
        .subcommand(Command::new("rm").about("Delete an expense").arg(id_arg()))
        .subcommand(
            Command::new("set").about("Set the monthly budget").arg(
                Arg::new("amount")
                    .long("amount")
                    .required(true)
                    .allow_hyphen_values(true),
            ),
        )
        .subcommand(
            Command::new("reset")
                .about("Clear this month's spending (or everything with --all)")
                .arg(Arg::new("all").long("all").action(ArgAction::SetTrue)),
        )
        .subcommand(json_flags(
            Command::new("categories").about("This month's spending by category"),
        ))
        .subcommand(json_flags(
            Command::new("chart")
                .about("Spending over time")
                .arg(Arg::new("range").long("range").help("7days|30days|3months")),
        ))
}

fn habits_cmd() -> Command {
    Command::new("habits")
        .about("Daily habits and streaks")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Add a habit")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("icon").long("icon").default_value("Dumbbell"))
                .arg(Arg::new("time").long("time").default_value("06:00")),
        )
        .subcommand(json_flags(Command::new("list").about("Today's habits")))
        .subcommand(
            Command::new("done")
                .about("Toggle today's completion")
                .arg(id_arg()),
        )
        .subcommand(Command::new("rm").about("Delete a habit").arg(id_arg()))
        .subcommand(Command::new("watch").about("Reset check-offs at every midnight"))
}

fn todos_cmd() -> Command {
    Command::new("todos")
        .about("To-do list")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Add a to-do")
                .arg(Arg::new("title").long("title").required(true))
                .arg(Arg::new("priority").long("priority").default_value("medium"))
                .arg(Arg::new("due").long("due").help("YYYY-MM-DD, defaults to today"))
                .arg(Arg::new("category").long("category").default_value("Personal")),
        )
        .subcommand(json_flags(
            Command::new("list")
                .about("List to-dos, open first")
                .arg(Arg::new("sort").long("sort").help("priority|category|due"))
                .arg(Arg::new("desc").long("desc").action(ArgAction::SetTrue)),
        ))
        .subcommand(Command::new("done").about("Toggle completion").arg(text_id_arg()))
        .subcommand(Command::new("rm").about("Delete a to-do").arg(text_id_arg()))
}

fn goals_cmd() -> Command {
    Command::new("goals")
        .about("Long-term goals")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Add a goal")
                .arg(Arg::new("title").long("title").required(true))
                .arg(Arg::new("category").long("category").default_value("Personal"))
                .arg(Arg::new("deadline").long("deadline").required(true)),
        )
        .subcommand(json_flags(Command::new("list").about("List goals")))
        .subcommand(Command::new("done").about("Toggle completion").arg(text_id_arg()))
        .subcommand(
            Command::new("progress")
                .about("Set progress (0-100)")
                .arg(text_id_arg())
                .arg(
                    Arg::new("value")
                        .long("value")
                        .required(true)
                        .allow_negative_numbers(true)
                        .value_parser(value_parser!(i64)),
                ),
        )
        .subcommand(Command::new("rm").about("Delete a goal").arg(text_id_arg()))
}

fn auth_cmd() -> Command {
    let credentials = |cmd: Command| {
        cmd.arg(Arg::new("email").long("email").required(true))
            .arg(Arg::new("password").long("password").required(true))
    };
    Command::new("auth")
        .about("Sign in against the identity provider")
        .subcommand_required(true)
        .subcommand(credentials(Command::new("signup").about("Create an account")))
        .subcommand(credentials(Command::new("login").about("Sign in")))
        .subcommand(Command::new("logout").about("Sign out"))
        .subcommand(Command::new("status").about("Show the current session"))
}

pub fn build_cli() -> Command {
    Command::new("planify")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Budget, habits, to-dos and goals")
        .subcommand(Command::new("init").about("Create the local record store"))
        .subcommand(json_flags(
            Command::new("dashboard").about("Summary across every area"),
        ))
        .subcommand(budget_cmd())
        .subcommand(habits_cmd())
        .subcommand(todos_cmd())
        .subcommand(goals_cmd())
        .subcommand(
            Command::new("range")
                .about("Choose the spending chart range")
                .arg(Arg::new("mode").required(true).help("7days|30days|3months")),
        )
        .subcommand(
            Command::new("go")
                .about("Open a section")
                .arg(
                    Arg::new("section")
                        .required(true)
                        .help("dashboard|budget|habits|todos|goals"),
                ),
        )
        .subcommand(auth_cmd())
        .subcommand(
            Command::new("user")
                .about("Display name")
                .subcommand_required(true)
                .subcommand(
                    Command::new("set")
                        .about("Set the name shown on the dashboard")
                        .arg(Arg::new("name").long("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export records")
                .subcommand_required(true)
                .subcommand(
                    Command::new("expenses")
                        .arg(Arg::new("format").long("format").default_value("csv"))
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Check stored data for corruption"))
}
