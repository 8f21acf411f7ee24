//! Line commands accepted on stdin.

use shared::domain::{Axis, SimulationParameters};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Next,
    Prev,
    /// Resubmits, optionally replacing all four parameters first.
    Submit(Option<SimulationParameters>),
    Set { axis: Axis, value: String },
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  next | n                 show the next page
  prev | p                 show the previous page
  submit [s p d f]         run a fresh simulation from page 1
  set <s|p|d|f> <value>    change one parameter without submitting
  show                     print the current tables again
  help                     print this message
  quit | q                 exit";

pub fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Err("empty command".to_string());
    };
    let rest: Vec<&str> = words.collect();

    match (head.to_ascii_lowercase().as_str(), rest.as_slice()) {
        ("next" | "n", []) => Ok(Command::Next),
        ("prev" | "p", []) => Ok(Command::Prev),
        ("submit", []) => Ok(Command::Submit(None)),
        ("submit", [s, p, d, f]) => Ok(Command::Submit(Some(SimulationParameters::new(
            *s, *p, *d, *f,
        )))),
        ("submit", _) => Err("submit takes either no values or exactly four (s p d f)".to_string()),
        ("set", [axis, value]) => Ok(Command::Set {
            axis: parse_axis(axis)?,
            value: (*value).to_string(),
        }),
        ("set", _) => Err("usage: set <s|p|d|f> <value>".to_string()),
        ("show", []) => Ok(Command::Show),
        ("help" | "?", _) => Ok(Command::Help),
        ("quit" | "q" | "exit", []) => Ok(Command::Quit),
        (other, _) => Err(format!("unknown command '{other}', try 'help'")),
    }
}

fn parse_axis(raw: &str) -> Result<Axis, String> {
    Axis::ALL
        .into_iter()
        .find(|axis| axis.label().eq_ignore_ascii_case(raw))
        .ok_or_else(|| format!("unknown parameter '{raw}', expected one of s, p, d, f"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_navigation_shortcuts() {
        assert_eq!(parse_command("n"), Ok(Command::Next));
        assert_eq!(parse_command("  PREV "), Ok(Command::Prev));
        assert_eq!(parse_command("q"), Ok(Command::Quit));
    }

    #[test]
    fn submit_forwards_raw_values() {
        assert_eq!(
            parse_command("submit 2 x 0 14"),
            Ok(Command::Submit(Some(SimulationParameters::new("2", "x", "0", "14"))))
        );
        assert_eq!(parse_command("submit"), Ok(Command::Submit(None)));
        assert!(parse_command("submit 1 2").is_err());
    }

    #[test]
    fn set_targets_one_axis() {
        assert_eq!(
            parse_command("set D 3"),
            Ok(Command::Set {
                axis: Axis::D,
                value: "3".to_string()
            })
        );
        assert!(parse_command("set g 1").is_err());
    }

    #[test]
    fn rejects_unknown_and_empty_input() {
        assert!(parse_command("").is_err());
        assert!(parse_command("jump 4").is_err());
    }
}
