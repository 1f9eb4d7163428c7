//! Console commands that act on the status bar.

use crate::hud::status_bar::StatusBar;

pub const SHOWPOP_USAGE: &str = "Usage: showpop <popnumber>";

/// Why a console command did nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    Usage(&'static str),

    #[error("unknown command '{0}'")]
    Unknown(String),

    #[error("empty command line")]
    Empty,
}

/// Run a console command. `argv[0]` is the command name.
pub fn execute(bar: &mut StatusBar, argv: &[&str]) -> Result<(), CommandError> {
    let name = argv.first().ok_or(CommandError::Empty)?;
    match name.to_ascii_lowercase().as_str() {
        "showpop" => showpop(bar, argv),
        "togglelog" => {
            bar.toggle_log();
            Ok(())
        }
        _ => Err(CommandError::Unknown(name.to_string())),
    }
}

/// `showpop <n>`: show popup `n`; negative numbers hide popups.
pub fn showpop(bar: &mut StatusBar, argv: &[&str]) -> Result<(), CommandError> {
    if argv.len() != 2 {
        return Err(CommandError::Usage(SHOWPOP_USAGE));
    }
    bar.show_pop(atoi(argv[1]).max(0));
    Ok(())
}

/// C-style integer prefix parse: leading blanks, optional sign, digits.
/// Anything unparseable is 0.
fn atoi(s: &str) -> i32 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let mut value: i64 = 0;
    for ch in digits.bytes().take_while(u8::is_ascii_digit) {
        value = (value * 10 + (ch - b'0') as i64).min(i32::MAX as i64 + 1);
    }
    let value = if negative { -value } else { value };
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HudConfig;
    use crate::hud::aspect::ScreenSize;
    use crate::hud::hooks::StatusBarHooks;
    use rstest::rstest;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Pops(Rc<RefCell<Vec<i32>>>);

    impl StatusBarHooks for Pops {
        fn show_pop(&mut self, pop: i32) {
            self.0.borrow_mut().push(pop);
        }
    }

    fn bar() -> (StatusBar, Rc<RefCell<Vec<i32>>>) {
        let pops = Rc::new(RefCell::new(Vec::new()));
        let bar = StatusBar::with_hooks(
            ScreenSize::new(640, 480),
            HudConfig::default(),
            Box::new(Pops(pops.clone())),
        );
        (bar, pops)
    }

    #[rstest]
    #[case("3", 3)]
    #[case("  12abc", 12)]
    #[case("-4", -4)]
    #[case("+7", 7)]
    #[case("pop", 0)]
    #[case("", 0)]
    #[case("99999999999", i32::MAX)]
    fn test_atoi(#[case] input: &str, #[case] expected: i32) {
        assert_eq!(atoi(input), expected);
    }

    #[test]
    fn test_showpop() {
        let (mut bar, pops) = bar();
        execute(&mut bar, &["showpop", "2"]).unwrap();
        execute(&mut bar, &["ShowPop", "-1"]).unwrap();
        assert_eq!(*pops.borrow(), vec![2, 0]);
    }

    #[test]
    fn test_showpop_usage() {
        let (mut bar, pops) = bar();
        assert_eq!(
            execute(&mut bar, &["showpop"]),
            Err(CommandError::Usage(SHOWPOP_USAGE))
        );
        assert!(execute(&mut bar, &["showpop", "1", "2"]).is_err());
        assert!(pops.borrow().is_empty());
    }

    #[test]
    fn test_other_commands() {
        let (mut bar, _) = bar();
        execute(&mut bar, &["togglelog"]).unwrap();
        assert!(bar.show_log());
        assert_eq!(
            execute(&mut bar, &["warp"]),
            Err(CommandError::Unknown("warp".into()))
        );
        assert_eq!(execute(&mut bar, &[]), Err(CommandError::Empty));
    }
}
