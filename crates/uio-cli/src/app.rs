use std::io;
use std::io::Write;

use crate::command::Command;
use crate::help;

/// The handler ran.
pub const EXIT_SUCCESS: i32 = 0;
/// No program name, no matching command, or a flag error.
pub const EXIT_FAILURE: i32 = 1;

/// An app is composed of many commands.
///
/// Command order is the order of the help listing, and the first command
/// matching `argv[1]` by name or alias wins.
#[derive(Debug, Default)]
pub struct App {
    commands: Vec<Command>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Returns the app's help string.
    pub fn help(&self) -> String {
        help::listing(&self.commands)
    }

    /// The command selected by `args[0]`, where `args` starts after the
    /// program name.
    pub fn command_for<S: AsRef<str>>(&self, args: &[S]) -> Option<&Command> {
        let first = args.first()?.as_ref();
        self.commands.iter().find(|cmd| cmd.matches(first))
    }

    /// Runs the app against `args` (program name first, then an optional
    /// command name), writing all diagnostics to `err`, and returns the exit
    /// code.
    pub fn run_with<S: AsRef<str>>(&self, err: &mut dyn Write, args: &[S]) -> i32 {
        let Some((program, rest)) = args.split_first() else {
            report(err, |err| err.write_all(b"No program name provided\n"));
            return EXIT_FAILURE;
        };

        let Some(cmd) = self.command_for(rest) else {
            tracing::debug!(
                program = AsRef::<str>::as_ref(program),
                command = ?rest.first().map(AsRef::<str>::as_ref),
                "no command matched"
            );
            report(err, |err| err.write_all(self.help().as_bytes()));
            return EXIT_FAILURE;
        };

        match cmd.dispatch(&rest[1..], err) {
            Ok(()) => EXIT_SUCCESS,
            Err(error) => {
                tracing::debug!(command = cmd.name(), %error, "flag parsing failed");
                EXIT_FAILURE
            }
        }
    }

    /// Runs the app against the process arguments and exits the process with
    /// the resulting code. Diagnostics go to standard error.
    pub fn run<I, S>(&self, args: I) -> !
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        std::process::exit(self.run_on_stderr(&args))
    }

    /// Standard error stays unlocked between writes; handlers may join
    /// threads that write to it.
    fn run_on_stderr<S: AsRef<str>>(&self, args: &[S]) -> i32 {
        self.run_with(&mut io::stderr(), args)
    }
}

impl FromIterator<Command> for App {
    fn from_iter<T: IntoIterator<Item = Command>>(iter: T) -> Self {
        Self {
            commands: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Command>> for App {
    fn from(commands: Vec<Command>) -> Self {
        Self { commands }
    }
}

fn report(err: &mut dyn Write, write: impl FnOnce(&mut dyn Write) -> io::Result<()>) {
    if let Err(error) = write(err) {
        tracing::warn!(%error, "failed to write to the error stream");
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    const HELP: &str = "Commands:\n\n    make    create uimage\n    list    list uimage\n";

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Recorded {
        cmd: String,
        args: Option<Vec<String>>,
        output: String,
        input: String,
        calls: usize,
    }

    /// The `make`/`list` app, recording what its handlers saw.
    fn uimage() -> (App, Rc<RefCell<Recorded>>) {
        let recorded = Rc::new(RefCell::new(Recorded::default()));

        let mut make = Command::new("make").with_short("create uimage");
        let output = make.flags().string("o", "", "Output");
        let input = make.flags().string("i", "", "Input");
        let make = make.with_run({
            let recorded = Rc::clone(&recorded);
            move |args| {
                let mut r = recorded.borrow_mut();
                r.cmd = "make".to_string();
                r.args = Some(args.to_vec());
                r.output = output.get();
                r.input = input.get();
                r.calls += 1;
            }
        });

        let list = Command::new("list")
            .with_short("list uimage")
            .with_aliases(["ls", "l"])
            .with_run({
                let recorded = Rc::clone(&recorded);
                move |args| {
                    let mut r = recorded.borrow_mut();
                    r.cmd = "list".to_string();
                    r.args = Some(args.to_vec());
                    r.calls += 1;
                }
            });

        (App::from_iter([make, list]), recorded)
    }

    fn run(app: &App, args: &[&str]) -> (i32, String) {
        let mut err: Vec<u8> = Vec::new();
        let code = app.run_with(&mut err, args);
        (code, String::from_utf8(err).unwrap())
    }

    mod dispatch {
        use super::*;

        #[test]
        fn test_cmd_with_flag() {
            let (app, recorded) = uimage();
            let (code, out) = run(&app, &["uimage", "make", "-o", "high", "foobar", "bla"]);
            assert_eq!(code, EXIT_SUCCESS);
            assert_eq!(out, "");
            let r = recorded.borrow();
            assert_eq!(r.cmd, "make");
            assert_eq!(r.args.as_deref(), Some(&["foobar".to_string(), "bla".to_string()][..]));
            assert_eq!(r.output, "high");
            assert_eq!(r.input, "");
            assert_eq!(r.calls, 1);
        }

        #[test]
        fn test_cmd_with_no_flags() {
            let (app, recorded) = uimage();
            let (code, out) = run(&app, &["uimage", "list", "anything"]);
            assert_eq!(code, EXIT_SUCCESS);
            assert_eq!(out, "");
            assert_eq!(recorded.borrow().cmd, "list");
            assert_eq!(
                recorded.borrow().args.as_deref(),
                Some(&["anything".to_string()][..])
            );
        }

        #[test]
        fn test_every_alias_routes_to_the_same_handler() {
            for name in ["list", "ls", "l"] {
                let (app, recorded) = uimage();
                let (code, out) = run(&app, &["uimage", name, "anything"]);
                assert_eq!(code, EXIT_SUCCESS, "{name}");
                assert_eq!(out, "", "{name}");
                let r = recorded.borrow();
                assert_eq!(r.cmd, "list", "{name}");
                assert_eq!(r.calls, 1, "{name}");
                assert_eq!(r.args.as_deref(), Some(&["anything".to_string()][..]));
            }
        }

        #[test]
        fn test_no_positionals_gives_empty_args() {
            let (app, recorded) = uimage();
            let (code, _) = run(&app, &["uimage", "make"]);
            assert_eq!(code, EXIT_SUCCESS);
            assert_eq!(recorded.borrow().args, Some(Vec::new()));
        }

        #[test]
        fn test_first_match_wins() {
            let hits = Rc::new(RefCell::new(Vec::new()));
            let record = |label: &'static str| {
                let hits = Rc::clone(&hits);
                move |_: &[String]| hits.borrow_mut().push(label)
            };
            let app = App::new()
                .with_command(Command::new("build").with_run(record("first")))
                .with_command(
                    Command::new("b")
                        .with_alias("build")
                        .with_run(record("second")),
                );

            assert_eq!(run(&app, &["prog", "build"]).0, EXIT_SUCCESS);
            assert_eq!(run(&app, &["prog", "b"]).0, EXIT_SUCCESS);
            assert_eq!(*hits.borrow(), ["first", "second"]);
        }

        #[test]
        fn test_idempotent() {
            let (app, recorded) = uimage();
            let args = ["uimage", "make", "-o", "x", "y"];
            let first = run(&app, &args);
            let first_recorded = recorded.borrow().clone();
            let second = run(&app, &args);
            assert_eq!(first, second);
            let second_recorded = recorded.borrow().clone();
            assert_eq!(first_recorded.args, second_recorded.args);
            assert_eq!(first_recorded.output, second_recorded.output);
            assert_eq!(second_recorded.calls, 2);

            let (_, out1) = run(&app, &["uimage", "nope"]);
            let (_, out2) = run(&app, &["uimage", "nope"]);
            assert_eq!(out1, out2);
        }
    }

    mod failures {
        use super::*;

        #[test]
        fn test_no_program_name() {
            let (app, recorded) = uimage();
            let (code, out) = run(&app, &[]);
            assert_eq!(code, EXIT_FAILURE);
            assert_eq!(out, "No program name provided\n");
            assert_eq!(recorded.borrow().calls, 0);
        }

        #[test]
        fn test_no_command_name() {
            let (app, _) = uimage();
            let (code, out) = run(&app, &["uimage"]);
            assert_eq!(code, EXIT_FAILURE);
            assert_eq!(out, HELP);
        }

        #[test]
        fn test_unknown_command() {
            let (app, recorded) = uimage();
            let (code, out) = run(&app, &["uimage", "notmake", "-o", "low"]);
            assert_eq!(code, EXIT_FAILURE);
            assert_eq!(out, HELP);
            assert_eq!(recorded.borrow().calls, 0);
        }

        #[test]
        fn test_cmd_exists_but_flag_does_not() {
            let (app, recorded) = uimage();
            let (code, out) = run(&app, &["uimage", "list", "-o", "low"]);
            assert_eq!(code, EXIT_FAILURE);
            assert_eq!(out, "flag provided but not defined: -o\nUsage of list:\n");
            assert_eq!(recorded.borrow().calls, 0);
        }

        #[test]
        fn test_cmd_help() {
            let (app, recorded) = uimage();
            let (code, out) = run(&app, &["uimage", "make", "-h"]);
            assert_eq!(code, EXIT_FAILURE);
            assert_eq!(
                out,
                "Usage of make:\n  -i string\n    \tInput\n  -o string\n    \tOutput\n"
            );
            assert_eq!(recorded.borrow().calls, 0);
        }

        #[test]
        fn test_app_help_flag() {
            let (app, _) = uimage();
            let (code, out) = run(&app, &["uimage", "-h"]);
            assert_eq!(code, EXIT_FAILURE);
            assert_eq!(out, HELP);
        }

        #[test]
        fn test_help_is_not_a_command() {
            let (app, _) = uimage();
            let (code, out) = run(&app, &["uimage", "help"]);
            assert_eq!(code, EXIT_FAILURE);
            assert_eq!(out, HELP);
        }

        #[test]
        fn test_failed_writes_keep_exit_code() {
            struct Broken;
            impl Write for Broken {
                fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                    Err(io::Error::other("closed"))
                }
                fn flush(&mut self) -> io::Result<()> {
                    Ok(())
                }
            }

            let (app, _) = uimage();
            assert_eq!(app.run_with(&mut Broken, &["uimage"]), EXIT_FAILURE);
            assert_eq!(app.run_with(&mut Broken, &["uimage", "list", "-x"]), EXIT_FAILURE);
        }
    }

    mod process {
        use std::sync::mpsc;
        use std::thread;
        use std::time::Duration;

        use super::*;

        #[test]
        fn test_handler_joins_thread_writing_to_stderr() {
            let (done, finished) = mpsc::channel();
            thread::spawn(move || {
                let app = App::new().with_command(Command::new("work").with_run(|_| {
                    thread::spawn(|| {
                        let _ = writeln!(io::stderr(), "worker progress");
                    })
                    .join()
                    .unwrap();
                }));
                done.send(app.run_on_stderr(&["prog", "work"])).unwrap();
            });
            assert_eq!(
                finished.recv_timeout(Duration::from_secs(10)),
                Ok(EXIT_SUCCESS)
            );
        }
    }

    mod resolution {
        use super::*;

        #[test]
        fn test_commands_keep_order() {
            let (app, _) = uimage();
            let names: Vec<&str> = app.commands().iter().map(Command::name).collect();
            assert_eq!(names, ["make", "list"]);

            let app = App::from(vec![Command::new("b"), Command::new("a")]);
            let names: Vec<&str> = app.commands().iter().map(Command::name).collect();
            assert_eq!(names, ["b", "a"]);
        }

        #[test]
        fn test_command_for() {
            let (app, _) = uimage();
            assert_eq!(app.command_for(&["ls"]).map(Command::name), Some("list"));
            assert_eq!(app.command_for(&["make", "-o"]).map(Command::name), Some("make"));
            assert!(app.command_for::<&str>(&[]).is_none());
            assert!(app.command_for(&["lis"]).is_none());
        }

        #[test]
        fn test_help() {
            let (app, _) = uimage();
            assert_eq!(app.help(), HELP);
            assert_eq!(App::new().help(), "Commands:\n\n");
        }

        #[test]
        fn test_logging_does_not_change_output() {
            let _guard = uio_log::test(tracing::Level::TRACE);
            let (app, _) = uimage();
            assert_eq!(run(&app, &["uimage", "nope"]), (EXIT_FAILURE, HELP.to_string()));
        }
    }
}
