use std::io::{self, Write};

use crate::quote::Quote;

pub const NO_QUOTES: &str = "No quotes found.";

/// Prints every quote followed by `-- <author>`, or `NO_QUOTES` when there is none.
pub fn print_quotes<W: Write>(quotes: &[Quote], out: &mut W) -> io::Result<()> {
    if quotes.is_empty() {
        writeln!(out, "{}", NO_QUOTES)?;
        return Ok(());
    }

    for q in quotes {
        writeln!(out, "{}", q.quote)?;
        writeln!(out, "-- {}", q.author)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::tests::fixture_quotes;

    fn render(quotes: &[Quote]) -> String {
        let mut out = Vec::new();
        print_quotes(quotes, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_print_fixture() {
        let quotes = fixture_quotes();
        let text = render(&quotes);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 10);
        for (pair, q) in lines.chunks(2).zip(quotes.iter()) {
            assert_eq!(pair[0], q.quote);
            assert_eq!(pair[1], format!("-- {}", q.author));
        }
        assert_eq!(lines[9], "-- Mike Wheeler");
    }

    #[test]
    fn test_print_empty() {
        assert_eq!(render(&[]), "No quotes found.\n");
    }
}
