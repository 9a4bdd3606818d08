//! Line-oriented console session over a reader and a writer.

use std::io::{self, BufRead, Write};

use switchboard_console::{Console, WriterSink};
use switchboard_perms::Principal;
use tracing::debug;

/// Prompt shown before each line when the input is interactive.
pub const PROMPT: &str = "switchboard> ";

/// Executes every line read from `input` until EOF or `quit`/`exit`.
///
/// Blank lines are skipped. Returns the number of commands executed,
/// whether they succeeded or not.
pub fn run_session<R, W>(
    console: &Console,
    principal: Principal,
    input: R,
    output: W,
    prompt: Option<&str>,
) -> io::Result<usize>
where
    R: BufRead,
    W: Write + Send,
{
    let mut sink = WriterSink::new(1, output);
    let mut executed = 0;
    let mut lines = input.lines();

    loop {
        if let Some(prompt) = prompt {
            sink.get_mut().write_all(prompt.as_bytes())?;
            sink.get_mut().flush()?;
        }
        let Some(line) = lines.next().transpose()? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            break;
        }

        if let Err(err) = console.execute(principal, &mut sink, line) {
            debug!(%err, "command did not complete");
        }
        sink.get_mut().flush()?;
        executed += 1;
    }
    Ok(executed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use switchboard_console::{CommandSpec, CommandStatus, handler_fn};
    use switchboard_perms::{PermissionStore, StaticDirectory};

    fn console() -> Console {
        let console = Console::without_builtins(Arc::new(PermissionStore::new(Arc::new(
            StaticDirectory::new(),
        ))));
        console
            .register(CommandSpec::new(
                "say %",
                handler_fn(|args| {
                    use std::fmt::Write as _;
                    let _ = writeln!(args.out, "{}", args.argv[1]);
                    CommandStatus::Success
                }),
            ))
            .unwrap();
        console
    }

    fn session(input: &str, prompt: Option<&str>) -> (usize, String) {
        let mut output = Vec::new();
        let count = run_session(
            &console(),
            Principal::UNRESTRICTED,
            input.as_bytes(),
            &mut output,
            prompt,
        )
        .unwrap();
        (count, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_runs_lines_until_eof() {
        let (count, output) = session("say one\n\nsay two\n", None);
        assert_eq!(count, 2);
        assert_eq!(output, "one\ntwo\n");
    }

    #[test]
    fn test_quit_stops_reading() {
        let (count, output) = session("say one\nQUIT\nsay two\n", None);
        assert_eq!(count, 1);
        assert_eq!(output, "one\n");
    }

    #[test]
    fn test_errors_are_reported_and_counted() {
        let (count, output) = session("nothing here\n", None);
        assert_eq!(count, 1);
        assert!(output.starts_with("No such command 'nothing here'"));
    }

    #[test]
    fn test_prompt() {
        let (_, output) = session("say hi\n", Some("> "));
        assert_eq!(output, "> hi\n> ");
    }
}
