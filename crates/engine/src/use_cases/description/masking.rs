//! Sentence-level supersede masking.
//!
//! The sentence splitter is intentionally naive: it breaks on `.`, `!` and
//! `?` and knows nothing about quoted speech, abbreviations, or decimals.
//! "Mr. Vell waits." is two sentences here.

use regex::Regex;

/// Split a paragraph into sentences.
///
/// A run of terminal punctuation (`?!`, `...`) stays attached to the sentence
/// it ends. Trailing text without terminal punctuation is its own sentence.
/// Returned slices are trimmed; empty ones are dropped.
pub fn split_sentences(paragraph: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = paragraph.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if !is_terminal(c) {
            continue;
        }
        let mut end = idx + c.len_utf8();
        while let Some(&(next_idx, next)) = chars.peek() {
            if !is_terminal(next) {
                break;
            }
            end = next_idx + next.len_utf8();
            chars.next();
        }
        push_trimmed(&mut sentences, &paragraph[start..end]);
        start = end;
    }
    push_trimmed(&mut sentences, &paragraph[start..]);

    sentences
}

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

fn push_trimmed<'a>(sentences: &mut Vec<&'a str>, raw: &'a str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed);
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Case-insensitive whole-word/phrase matcher over supersede fragments.
///
/// `"gate"` matches "The Gate creaks." but not "They investigate.". Runs of
/// whitespace inside a fragment match any whitespace run in the text. Case
/// folding and word boundaries follow Unicode, so accented names behave like
/// ASCII ones.
#[derive(Debug, Default)]
pub struct SupersedeMask {
    patterns: Vec<Regex>,
}

/// Root text after masking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskedText {
    pub text: String,
    pub removed_sentences: usize,
}

impl SupersedeMask {
    pub fn new<'a>(fragments: impl IntoIterator<Item = &'a str>) -> Self {
        let patterns = fragments
            .into_iter()
            .filter_map(|fragment| {
                let pattern = fragment_pattern(fragment)?;
                match Regex::new(&pattern) {
                    Ok(regex) => Some(regex),
                    Err(e) => {
                        tracing::warn!(
                            fragment = %fragment,
                            error = %e,
                            "Ignoring supersede fragment that does not compile"
                        );
                        None
                    }
                }
            })
            .collect();
        Self { patterns }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn matches(&self, sentence: &str) -> bool {
        self.patterns.iter().any(|regex| regex.is_match(sentence))
    }

    /// Would masking remove any sentence of `text`?
    pub fn hits(&self, text: &str) -> bool {
        !self.is_empty()
            && text
                .split("\n\n")
                .flat_map(split_sentences)
                .any(|sentence| self.matches(sentence))
    }

    /// Drop every sentence that contains a fragment.
    ///
    /// Paragraphs (blank-line separated) are masked independently. A
    /// paragraph that loses nothing is kept verbatim; one that loses
    /// sentences is rebuilt from its survivors joined by single spaces, and
    /// dropped if none survive.
    pub fn apply(&self, text: &str) -> MaskedText {
        if self.is_empty() {
            return MaskedText {
                text: text.to_string(),
                removed_sentences: 0,
            };
        }

        let mut removed_sentences = 0;
        let mut paragraphs = Vec::new();

        for paragraph in text.split("\n\n") {
            let sentences = split_sentences(paragraph);
            let survivors: Vec<&str> = sentences
                .iter()
                .copied()
                .filter(|sentence| !self.matches(sentence))
                .collect();
            removed_sentences += sentences.len() - survivors.len();

            if survivors.len() == sentences.len() {
                let trimmed = paragraph.trim();
                if !trimmed.is_empty() {
                    paragraphs.push(trimmed.to_string());
                }
            } else if !survivors.is_empty() {
                paragraphs.push(survivors.join(" "));
            }
        }

        MaskedText {
            text: paragraphs.join("\n\n"),
            removed_sentences,
        }
    }
}

/// `\b` is only added on a side where the fragment starts or ends with a
/// word character; a boundary next to punctuation would never match.
fn fragment_pattern(fragment: &str) -> Option<String> {
    let words: Vec<&str> = fragment.split_whitespace().collect();
    let first = words.first()?.chars().next()?;
    let last = words.last()?.chars().last()?;

    let body = words
        .iter()
        .map(|word| regex::escape(word))
        .collect::<Vec<_>>()
        .join(r"\s+");

    let mut pattern = String::from("(?i)");
    if is_word_char(first) {
        pattern.push_str(r"\b");
    }
    pattern.push_str(&body);
    if is_word_char(last) {
        pattern.push_str(r"\b");
    }
    Some(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_terminal_punctuation() {
        assert_eq!(
            split_sentences("The gate stands. Is it open?! Nobody knows... Quiet"),
            vec!["The gate stands.", "Is it open?!", "Nobody knows...", "Quiet"]
        );
    }

    #[test]
    fn splitter_is_naive_about_abbreviations() {
        assert_eq!(split_sentences("Mr. Vell waits."), vec!["Mr.", "Vell waits."]);
    }

    #[test]
    fn empty_paragraph_has_no_sentences() {
        assert!(split_sentences("   ").is_empty());
    }

    #[test]
    fn masks_phrase_case_insensitively() {
        let mask = SupersedeMask::new(["plain wooden gate"]);
        let masked = mask.apply("A Plain  Wooden Gate stands. Ivy climbs the wall.");
        assert_eq!(masked.text, "Ivy climbs the wall.");
        assert_eq!(masked.removed_sentences, 1);
    }

    #[test]
    fn whole_word_only() {
        let mask = SupersedeMask::new(["gate"]);
        let masked = mask.apply("Scholars investigate the ruins.");
        assert_eq!(masked.text, "Scholars investigate the ruins.");
        assert_eq!(masked.removed_sentences, 0);
        assert!(!mask.hits("Scholars investigate the ruins."));
        assert!(mask.hits("The gate is shut."));
    }

    #[test]
    fn fragments_with_punctuation_edges_still_match() {
        let mask = SupersedeMask::new(["(sealed)", "o'neil"]);
        assert!(mask.matches("The vault (sealed) hums."));
        assert!(mask.matches("O'Neil's shop is closed."));
    }

    #[test]
    fn blank_fragments_are_ignored() {
        let mask = SupersedeMask::new(["", "   "]);
        assert!(mask.is_empty());
        assert_eq!(mask.apply("Keep me.").text, "Keep me.");
    }

    #[test]
    fn paragraphs_are_masked_independently() {
        let mask = SupersedeMask::new(["bridge"]);
        let text = "The bridge spans the gorge.\n\n\
                    Wind howls.  Birds circle.\n\n\
                    A bridge toll is posted. Guards idle.";
        let masked = mask.apply(text);
        assert_eq!(masked.text, "Wind howls.  Birds circle.\n\nGuards idle.");
        assert_eq!(masked.removed_sentences, 2);
    }

    #[test]
    fn accented_fragment_needs_a_whole_word() {
        let mask = SupersedeMask::new(["café"]);
        assert!(mask.matches("The café is shuttered."));
        assert!(!mask.matches("The cafés are busy."));

        let mask = SupersedeMask::new(["gate"]);
        assert!(!mask.matches("The ïgate stands."));
    }

    #[test]
    fn case_folding_covers_non_ascii_letters() {
        let mask = SupersedeMask::new(["über bridge"]);
        assert!(mask.matches("Über bridge sways."));

        let mask = SupersedeMask::new(["ÉGLISE"]);
        let masked = mask.apply("The église bells ring. Crows scatter.");
        assert_eq!(masked.text, "Crows scatter.");
        assert_eq!(masked.removed_sentences, 1);
    }
}
