//! Sample commands shipped with the demo console.

use qr_console::{Argument, Arguments, CommandBuilder, CommandOutput, CommandRegistry};
use qr_types::error::{Result, ShellError};

/// Register `add`, `sub`, `one`, `div` and `say`.
pub fn register_demo_commands(reg: &mut CommandRegistry) -> Result<()> {
    reg.add_command(
        CommandBuilder::new("add")
            .help("sum 2 integers")
            .handler(add)
            .argument(Argument::new("a").int().help("1st arg"))
            .argument(Argument::new("b").int().help("2nd arg")),
    )?;
    reg.add_command(
        CommandBuilder::new("sub")
            .help("differ 2 integers")
            .handler(sub)
            .argument(Argument::new("-a").int().default(0).help("1st arg"))
            .argument(Argument::new("--value").alias("-v").int().help("2nd arg")),
    )?;
    reg.add_command(
        CommandBuilder::new("one")
            .help("change value by 1")
            .handler(one)
            .argument(Argument::new("v").int())
            .argument(
                Argument::new("-i")
                    .alias("--flag")
                    .flag()
                    .help("set to inc; default is dec"),
            ),
    )?;
    reg.add_command(
        CommandBuilder::new("div")
            .help("divide 2 numbers")
            .handler(div)
            .argument(Argument::new("a").float())
            .argument(Argument::new("b").float()),
    )?;
    reg.add_command(
        CommandBuilder::new("say")
            .help("print a message")
            .handler(say)
            .argument(Argument::new("text").help("message; quote it to keep spaces"))
            .argument(Argument::new("--times").alias("-n").int().default(1))
            .argument(
                Argument::new("--case")
                    .choices(["lower", "upper", "keep"])
                    .default("keep"),
            ),
    )?;
    Ok(())
}

// ---------------------------------------------------------------------------
// arithmetic
// ---------------------------------------------------------------------------

fn checked(args: &Arguments, result: Option<i64>) -> Result<CommandOutput> {
    result
        .map(|n| CommandOutput::text(n.to_string()))
        .ok_or_else(|| ShellError::handler(args.command(), "integer overflow"))
}

fn add(args: &Arguments) -> Result<CommandOutput> {
    checked(args, args.int("a")?.checked_add(args.int("b")?))
}

fn sub(args: &Arguments) -> Result<CommandOutput> {
    checked(args, args.int("a")?.checked_sub(args.int("value")?))
}

fn one(args: &Arguments) -> Result<CommandOutput> {
    let v = args.int("v")?;
    let result = if args.flag("i") {
        v.checked_add(1)
    } else {
        v.checked_sub(1)
    };
    checked(args, result)
}

fn div(args: &Arguments) -> Result<CommandOutput> {
    let b = args.float("b")?;
    if b == 0.0 {
        return Err(ShellError::handler(args.command(), "division by zero"));
    }
    Ok(CommandOutput::text((args.float("a")? / b).to_string()))
}

// ---------------------------------------------------------------------------
// text
// ---------------------------------------------------------------------------

fn say(args: &Arguments) -> Result<CommandOutput> {
    let text = args.str("text")?;
    let text = match args.str("case")? {
        "lower" => text.to_lowercase(),
        "upper" => text.to_uppercase(),
        _ => text.to_string(),
    };
    let times = args.int("times")?;
    let times = usize::try_from(times).map_err(|_| {
        ShellError::handler(args.command(), format!("times must not be negative, got {times}"))
    })?;
    Ok(CommandOutput::text(vec![text; times].join("\n")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use qr_types::value::Value;

    fn registry() -> CommandRegistry {
        let mut reg = CommandRegistry::new("PROG");
        register_demo_commands(&mut reg).unwrap();
        reg
    }

    fn run(line: &str) -> String {
        match registry().execute(line).unwrap() {
            CommandOutput::Text(s) => s,
            other => panic!("expected text for {line:?}, got {other:?}"),
        }
    }

    #[test]
    fn all_commands_registered() {
        let reg = registry();
        let names: Vec<&str> = reg
            .list_commands()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["add", "sub", "one", "div", "say"]);
    }

    #[test]
    fn arithmetic() {
        assert_eq!(run("add 1 2"), "3");
        assert_eq!(run("sub -a=5 -v=2"), "3");
        assert_eq!(run("sub --value=5"), "-5");
        assert_eq!(run("one 5"), "4");
        assert_eq!(run("one -i 5"), "6");
        assert_eq!(run("div 7 2"), "3.5");
    }

    #[test]
    fn division_by_zero_is_handler_error() {
        let err = registry().execute("div 1 0").unwrap_err();
        assert_eq!(format!("{err}"), "div: division by zero");
    }

    #[test]
    fn say_with_quotes_and_options() {
        assert_eq!(run(r#"say "hello world""#), "hello world");
        assert_eq!(run(r#"say "hi there" -n 2 --case upper"#), "HI THERE\nHI THERE");
        assert_eq!(run("say Quiet --times=0"), "");
    }

    #[test]
    fn sample_errors() {
        let reg = registry();
        let msg = |line: &str| reg.execute(line).unwrap_err().to_string();
        assert_eq!(msg("add"), "add: error: the following arguments are required: a, b");
        assert_eq!(msg("sub -b=5"), "sub: error: unrecognized arguments: -b=5");
        assert_eq!(msg("add 1 a"), "add: error: argument b: invalid int value: 'a'");
    }

    #[test]
    fn overflow_is_handler_error() {
        let reg = registry();
        let msg = |line: &str| reg.execute(line).unwrap_err().to_string();
        assert_eq!(msg("add 9223372036854775807 1"), "add: integer overflow");
        assert_eq!(msg("sub -a -9223372036854775808 -v 1"), "sub: integer overflow");
        assert_eq!(msg("one -i 9223372036854775807"), "one: integer overflow");
    }

    #[test]
    fn negative_repeat_count_rejected() {
        let err = registry().execute("say hi -n -1").unwrap_err();
        assert_eq!(err.to_string(), "say: times must not be negative, got -1");
    }

    #[test]
    fn handlers_called_directly() {
        let args = Arguments::new("say")
            .with("text", Some(Value::from("Hi")))
            .with("times", Some(Value::from(3)))
            .with("case", Some(Value::from("lower")));
        assert_eq!(args.len(), 3);
        assert_eq!(say(&args).unwrap(), CommandOutput::text("hi\nhi\nhi"));

        let args = Arguments::new("div")
            .with("a", Some(Value::Float(1.0)))
            .with("b", Some(Value::Float(0.0)));
        let names: Vec<&str> = args.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(div(&args).unwrap_err().is_runtime());

        let missing = Arguments::new("add").with("a", Some(Value::Int(1))).with("b", None);
        assert_eq!(
            add(&missing).unwrap_err().to_string(),
            "add: argument 'b' was not supplied"
        );
    }
}
