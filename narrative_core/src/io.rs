//! Presentation and input collaborators.
//!
//! The core never touches a terminal. It describes what to show through
//! [`Presentation`] and asks for choices through [`Input`]; the binary and
//! the tests supply implementations.

use crate::error::{NarrativeError, NarrativeResult};

/// How quickly a piece of text should be revealed. Purely advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    Instant,
    Narration,
    Dramatic,
}

/// Renders text. Must not feed anything back into the core.
pub trait Presentation {
    fn present(&mut self, text: &str, pacing: Option<Pacing>);
}

/// What the player entered at a choice prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// A 1-based number. May still be out of range.
    Number(usize),
    /// Anything that did not parse as a number.
    Invalid(String),
    /// The input source is gone.
    Closed,
}

/// Supplies the player's decisions.
pub trait Input {
    /// Ask for one of `choices`.
    fn select(&mut self, prompt: &str, choices: &[String]) -> Selection;

    /// Ask for free text, such as a name or a slot. `None` once input is closed.
    fn read_line(&mut self, prompt: &str) -> Option<String>;
}

/// Present numbered choices and keep asking until a valid one is picked.
///
/// Returns a 0-based index. Invalid entries are reported and retried in
/// place; only a closed input ends the loop early.
pub fn ask(
    presentation: &mut dyn Presentation,
    input: &mut dyn Input,
    prompt: &str,
    choices: &[String],
) -> NarrativeResult<usize> {
    let menu = choices
        .iter()
        .enumerate()
        .map(|(i, label)| format!("  {}. {}", i + 1, label))
        .collect::<Vec<_>>()
        .join("\n");
    presentation.present(&menu, Some(Pacing::Instant));

    loop {
        match input.select(prompt, choices) {
            Selection::Number(n) if (1..=choices.len()).contains(&n) => return Ok(n - 1),
            Selection::Number(n) => {
                tracing::debug!(choice = n, max = choices.len(), "choice out of range");
                presentation.present(
                    &format!("Please enter a number from 1 to {}.", choices.len()),
                    Some(Pacing::Instant),
                );
            }
            Selection::Invalid(raw) => {
                tracing::debug!(%raw, "unparseable choice");
                presentation.present(
                    &format!("Please enter a number from 1 to {}.", choices.len()),
                    Some(Pacing::Instant),
                );
            }
            Selection::Closed => return Err(NarrativeError::InputClosed),
        }
    }
}

/// Parse a raw line the way a console would.
pub fn parse_selection(line: &str) -> Selection {
    let trimmed = line.trim();
    match trimmed.parse::<usize>() {
        Ok(n) => Selection::Number(n),
        Err(_) => Selection::Invalid(trimmed.to_string()),
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{Script, Transcript};
    use super::*;

    fn labels(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("Option {}", i)).collect()
    }

    #[test]
    fn test_ask_returns_zero_based_index() {
        let mut out = Transcript::default();
        let mut input = Script::new(["2"]);

        assert_eq!(ask(&mut out, &mut input, "Pick", &labels(3)).unwrap(), 1);
        assert!(out.contains("  3. Option 3"));
    }

    #[test]
    fn test_ask_retries_invalid_in_place() {
        let mut out = Transcript::default();
        let mut input = Script::new(["0", "seven", "4", "3"]);

        assert_eq!(ask(&mut out, &mut input, "Pick", &labels(3)).unwrap(), 2);
        assert_eq!(input.remaining(), 0);
        assert_eq!(
            out.lines.iter().filter(|l| l.contains("from 1 to 3")).count(),
            3
        );
    }

    #[test]
    fn test_ask_closed_input() {
        let mut out = Transcript::default();
        let mut input = Script::new(Vec::<String>::new());

        assert!(matches!(
            ask(&mut out, &mut input, "Pick", &labels(2)),
            Err(NarrativeError::InputClosed)
        ));
    }

    #[test]
    fn test_parse_selection() {
        assert_eq!(parse_selection(" 4\n"), Selection::Number(4));
        assert_eq!(parse_selection("-1"), Selection::Invalid("-1".into()));
    }
}
