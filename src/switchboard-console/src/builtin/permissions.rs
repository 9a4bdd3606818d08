//! `cli show|reload|check permissions`.

use std::fmt::Write as _;

use switchboard_perms::{NO_PERMS, PermissionError, Principal, Subject};

use crate::handler::{CommandArgs, CommandHandler, CommandStatus, Descriptor, SuggestArgs};

use super::help::NO_DESCRIPTION;
use super::words_after;

/// Prints every rule-group of the active permission table.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShowPermissionsCommand;

impl CommandHandler for ShowPermissionsCommand {
    fn describe(&self) -> Descriptor {
        Descriptor::new("cli show permissions", "Show CLI permissions").with_usage(
            "Usage: cli show permissions\n       \
             Shows CLI configured permissions.\n",
        )
    }

    fn run(&self, args: &mut CommandArgs<'_>) -> CommandStatus {
        let rules = args.console.permissions().rules();
        let out = &mut *args.out;

        let _ = writeln!(out, "Default: {}", rules.default_access());
        for group in rules.groups() {
            let _ = match group.subject() {
                Subject::User(uid) => writeln!(out, "user: {} [uid={uid}]", group.name()),
                Subject::Group(gid) => writeln!(out, "group: {} [gid={gid}]", group.name()),
            };
            let _ = writeln!(out, "Permissions:");
            for rule in group.rules() {
                let _ = writeln!(out, "\t{} -> {}", rule.access(), rule.command());
            }
            let _ = writeln!(out);
        }
        CommandStatus::Success
    }
}

/// Re-reads the permissions file.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReloadPermissionsCommand;

impl CommandHandler for ReloadPermissionsCommand {
    fn describe(&self) -> Descriptor {
        Descriptor::new("cli reload permissions", "Reload CLI permissions config").with_usage(
            "Usage: cli reload permissions\n       \
             Reload the 'cli_permissions.conf' file.\n",
        )
    }

    fn run(&self, args: &mut CommandArgs<'_>) -> CommandStatus {
        match args.console.permissions().reload() {
            Ok(()) => {
                let _ = writeln!(args.out, "Permissions reloaded.");
                CommandStatus::Success
            }
            Err(PermissionError::ReloadInProgress) => {
                let _ = writeln!(
                    args.out,
                    "You must wait until last 'cli reload permissions' command finish"
                );
                CommandStatus::Success
            }
            Err(err) => {
                let _ = writeln!(args.out, "Unable to reload permissions: {err}");
                CommandStatus::Failure
            }
        }
    }
}

/// Evaluates the permission table for a user, a group or both.
#[derive(Debug, Default, Clone, Copy)]
pub struct CheckPermissionsCommand;

impl CommandHandler for CheckPermissionsCommand {
    fn describe(&self) -> Descriptor {
        Descriptor::new("cli check permissions", "Try a permissions config for a user").with_usage(
            "Usage: cli check permissions {<username>|@<groupname>|<username>@<groupname>} [<command>]\n       \
             Check permissions config for a user@group or list the allowed commands for the specified user.\n       \
             The username or the groupname may be omitted.\n",
        )
    }

    fn suggest(&self, args: &SuggestArgs<'_>) -> Option<String> {
        let words = args.entry.word_count();
        if args.pos <= words {
            return None;
        }
        let rest = words_after(args.line, words + 1);
        args.console.complete(rest, args.word, args.n)
    }

    fn run(&self, args: &mut CommandArgs<'_>) -> CommandStatus {
        let (console, argv) = (args.console, args.argv);
        let words = args.entry.word_count();
        let Some(who) = argv.get(words).map(String::as_str) else {
            return CommandStatus::ShowUsage;
        };
        let directory = console.permissions().directory();

        let (user, group) = match who.split_once('@') {
            Some((user, group)) => (user, Some(group)),
            None => (who, None),
        };

        let mut gid = NO_PERMS;
        if let Some(group) = group {
            match directory.group_id(group) {
                Some(id) => gid = id,
                None => {
                    let _ = writeln!(args.out, "Unknown group '{group}'");
                    return CommandStatus::Failure;
                }
            }
        }

        let mut uid = NO_PERMS;
        if user.is_empty() {
            if group.is_none() {
                let _ = writeln!(args.out, "You didn't supply a username");
            }
        } else {
            match directory.user_id(user) {
                Some(id) => uid = id,
                None => {
                    let _ = writeln!(args.out, "Unknown user '{user}'");
                    return CommandStatus::Failure;
                }
            }
        }

        let principal = Principal::new(uid, gid);
        let rules = console.permissions().rules();

        if argv.len() == words + 1 {
            let mut found = 0;
            for entry in console.registry().list("") {
                if rules.is_allowed(principal, entry.full_text()) {
                    let summary = match entry.summary() {
                        "" => NO_DESCRIPTION,
                        summary => summary,
                    };
                    let _ = writeln!(args.out, "{:>30.30} {}", entry.full_text(), summary);
                    found += 1;
                }
            }
            if found == 0 {
                let _ = writeln!(args.out, "You are not allowed to run any command on this console");
            }
        } else {
            let command = argv[words + 1..].join(" ");
            let kind = if uid >= 0 { "User" } else { "Group" };
            let at = if group.is_some() && uid >= 0 { "@" } else { "" };
            let verdict = if rules.is_allowed(principal, &command) {
                "allowed"
            } else {
                "not allowed"
            };
            let _ = writeln!(
                args.out,
                "{kind} '{user}{at}{}' is {verdict} to run command: '{command}'",
                group.unwrap_or_default()
            );
        }
        CommandStatus::Success
    }
}
