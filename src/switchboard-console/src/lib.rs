#![allow(clippy::missing_errors_doc, clippy::doc_markdown)]
//! Switchboard Console - command registry and dispatch engine.
//!
//! Components register commands described by a small pattern language:
//!
//! ```text
//! core show uptime [seconds]      optional word
//! sip set debug {on|off}          one of several words
//! sip show peer %                 any single word
//! ```
//!
//! The [`Console`] matches typed lines against the registered patterns,
//! checks the caller's permissions, runs the handler and offers tab
//! completion over the same table.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use switchboard_console::{BufferSink, CommandSpec, CommandStatus, Console, handler_fn};
//! use switchboard_perms::{PermissionStore, Principal};
//!
//! let console = Console::new(Arc::new(PermissionStore::system()));
//! console.register(
//!     CommandSpec::new("echo %", handler_fn(|args| {
//!         let _ = writeln!(args.out, "{}", args.argv[1..].join(" "));
//!         CommandStatus::Success
//!     }))
//!     .with_summary("Print the arguments"),
//! )?;
//!
//! let mut out = BufferSink::new(1);
//! console.execute(Principal::UNRESTRICTED, &mut out, "echo hello")?;
//! assert_eq!(console.complete_all("core show ", ""), vec!["help", "uptime"]);
//! ```
//!
//! # Dispatch
//!
//! ```text
//! tokenize -> resolve (at least as long) -> permission check
//!          -> shutdown check -> mark in use -> run handler -> report status
//! ```


pub mod builtin;
mod command;
mod completion;
mod component;
mod console;
mod error;
mod executor;
mod handler;
pub mod helpers;
mod output;
pub mod pattern;
mod registry;
mod resolver;
mod tokenizer;

pub use command::{CommandEntry, CommandId, CommandSpec, InUseGuard};
pub use completion::{CompletionSession, MAX_CANDIDATES};
pub use component::{Component, Module};
pub use console::Console;
pub use error::{DispatchError, RegistryError};
pub use executor::NO_USAGE;
pub use handler::{
    CommandArgs, CommandHandler, CommandStatus, Descriptor, FnHandler, SuggestArgs, handler_fn,
};
pub use output::{BufferSink, OutputSink, WriterSink};
pub use pattern::{PrefixMatch, WordMatch, is_prefix, match_word};
pub use registry::{CommandRegistry, UnloadReport};
pub use resolver::{MatchMode, resolve};
pub use tokenizer::{MAX_ARGS, Tokens, tokenize};
