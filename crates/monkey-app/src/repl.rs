use std::io;

use crate::driver::Driver;

const PROMPT: &str = ">> ";
const BANNER: &str = "Monkey REPL. Type `exit` or `e` to quit.";

/// Read-eval-print until `exit`, `e` or end of input. All lines share one
/// session, so bindings carry over.
pub fn start(driver: &Driver) -> io::Result<()> {
    let console = driver.console();
    console.write_line(BANNER)?;

    loop {
        console.write(PROMPT)?;
        let Some(line) = console.read_line()? else { break };
        let line = line.trim();

        match line {
            "exit" | "e" => break,
            "" => continue,
            _ => { driver.run(line)?; }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Console;
    use monkey_lang::Session;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::io::Cursor;
    use std::rc::Rc;

    fn session_transcript(input: &str) -> String {
        let output = Rc::new(RefCell::new(Vec::<u8>::new()));
        let console = Console::new(Rc::new(RefCell::new(Cursor::new(input.to_string()))), output.clone());
        let driver = Driver::new(Session::new(), console, false);
        start(&driver).unwrap();
        let bytes = output.borrow().clone();
        String::from_utf8(bytes).unwrap_or_default()
    }

    #[test]
    fn evaluates_lines_in_one_session() {
        let out = session_transcript("let x = 2;\nx * 21\n");
        assert_eq!(out, format!("{BANNER}\n>> >> 42\n>> "));
    }

    #[test]
    fn exit_stops_reading() {
        let out = session_transcript("e\n1 + 1\n");
        assert_eq!(out, format!("{BANNER}\n>> "));
    }

    #[test]
    fn blank_lines_are_ignored() {
        let out = session_transcript("\n   \nexit\n");
        assert_eq!(out, format!("{BANNER}\n>> >> >> "));
    }

    #[test]
    fn parse_errors_do_not_end_the_session() {
        let out = session_transcript("let = 1\n7\n");
        assert_eq!(
            out,
            format!("{BANNER}\n>> Parser errors:\n\t1:5: expected next token to be IDENT, got = instead\n>> 7\n>> ")
        );
    }
}
