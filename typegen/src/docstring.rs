//! Class docstring rendering.
//!
//! A docstring has two parts: the type's description paragraphs, and a
//! `Parameters:` section with one entry per field.
//!
//! ```text
//! This object represents a chat.
//!
//!     Parameters:
//!         id (``int``):
//!             Unique identifier for this chat.
//!
//!         title (``str``, *optional*):
//!             Title, for supergroups, channels and group chats
//! ```
//!
//! The first paragraph is not indented because the template opens the
//! docstring on the same line. Text is wrapped greedily on ASCII whitespace
//! only, never inside a word and never at a hyphen, so the same schema always
//! produces byte-identical output. Width is counted in characters: an emoji
//! or a CJK ideograph takes one column, like every other character.

use textwrap::{Options as WrapOptions, WordSeparator, WordSplitter, WrapAlgorithm};

use crate::config::{
    EIGHT_SPACE_INDENT, FOUR_SPACE_INDENT, NO_INDENT, RenderOptions, TWELVE_SPACE_INDENT,
    field_identifier,
};
use crate::resolve::ResolvedField;

const OPTIONAL_PREFIX: &str = "Optional. ";

const TAB_SIZE: usize = 8;

/// Renders the full docstring body for a type.
pub fn render_docstring(
    description: &[String],
    fields: &[ResolvedField<'_>],
    options: &RenderOptions,
) -> String {
    let width = options.line_width;
    let mut result = String::new();

    for (i, paragraph) in description.iter().enumerate() {
        let mut paragraph = escape_docstring(paragraph);
        if ends_with_word_of(&paragraph) {
            paragraph.push(':');
        }

        let initial_indent = if i == 0 { NO_INDENT } else { FOUR_SPACE_INDENT };
        result.push_str(&fill(&paragraph, width, initial_indent, FOUR_SPACE_INDENT));

        if i == description.len() - 1 {
            continue;
        }

        if paragraph.starts_with('-') {
            result.push('\n');
        } else {
            result.push_str("\n\n");
        }
    }

    if !fields.is_empty() {
        result.push_str("\n\n");
        result.push_str(FOUR_SPACE_INDENT);
        result.push_str("Parameters:\n");
    }

    let entries: Vec<String> = fields
        .iter()
        .map(|field| render_field_entry(field, options))
        .collect();
    result.push_str(&entries.join("\n\n"));

    result
}

/// Renders one `Parameters:` entry: the header line and its description.
pub fn render_field_entry(field: &ResolvedField<'_>, options: &RenderOptions) -> String {
    let name = field_identifier(&field.field.name);
    let header = format!("{name} ({}):", field.resolved.doc);

    let description = &field.field.description;
    let description = description
        .strip_prefix(OPTIONAL_PREFIX)
        .unwrap_or(description);
    let description = escape_docstring(description);

    format!(
        "{}\n{}",
        fill(&header, options.line_width, EIGHT_SPACE_INDENT, EIGHT_SPACE_INDENT),
        fill(&description, options.line_width, TWELVE_SPACE_INDENT, TWELVE_SPACE_INDENT)
    )
}

/// Wraps `text` to `width` columns, counting indentation.
///
/// Tabs expand to the next multiple of eight columns, then each ASCII
/// whitespace character becomes one space. Other whitespace, such as a
/// no-break space, is kept and never breaks a line. Blank text renders as
/// an empty string.
fn fill(text: &str, width: usize, initial_indent: &str, subsequent_indent: &str) -> String {
    let normalized: String = expand_tabs(text)
        .chars()
        .map(|c| if is_ascii_whitespace(c) { ' ' } else { c })
        .collect();
    if normalized.trim().is_empty() {
        return String::new();
    }

    let options = WrapOptions::new(width)
        .initial_indent(initial_indent)
        .subsequent_indent(subsequent_indent)
        .break_words(false)
        .word_separator(WordSeparator::AsciiSpace)
        .word_splitter(WordSplitter::NoHyphenation)
        .wrap_algorithm(WrapAlgorithm::FirstFit);
    textwrap::fill(&normalized, options)
}

fn expand_tabs(text: &str) -> String {
    let mut expanded = String::with_capacity(text.len());
    let mut column = 0;
    for c in text.chars() {
        match c {
            '\t' => {
                let pad = TAB_SIZE - column % TAB_SIZE;
                expanded.extend(std::iter::repeat_n(' ', pad));
                column += pad;
            }
            '\n' | '\r' => {
                expanded.push(c);
                column = 0;
            }
            _ => {
                expanded.push(c);
                column += 1;
            }
        }
    }
    expanded
}

/// Whitespace as the docstring wrapper sees it, vertical tab included.
fn is_ascii_whitespace(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\x0b' | '\x0c' | '\r' | ' ')
}

/// Paragraphs that end with the word "of" introduce a list.
///
/// The paragraph must end exactly there: trailing whitespace or
/// punctuation after "of" does not count.
fn ends_with_word_of(paragraph: &str) -> bool {
    paragraph
        .strip_suffix("of")
        .is_some_and(|rest| rest.is_empty() || rest.ends_with(is_ascii_whitespace))
}

/// Makes schema prose safe inside a `"""` string literal.
fn escape_docstring(text: &str) -> String {
    text.replace('\\', "\\\\").replace("\"\"\"", "\\\"\\\"\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::resolve_fields;
    use crate::schema::Field;
    use crate::test_utils::{make_field, make_field_with_description};

    fn options() -> RenderOptions {
        RenderOptions::default()
    }

    fn docstring(description: &[String], fields: &[Field]) -> String {
        let options = options();
        render_docstring(description, &resolve_fields(fields, &options.package), &options)
    }

    fn entry(field: &Field) -> String {
        let options = options();
        render_field_entry(&ResolvedField::new(field, &options.package), &options)
    }

    fn paragraphs(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|p| p.to_string()).collect()
    }

    // === fill ===

    #[test]
    fn fill_wraps_greedily_at_width() {
        let text = "aaa bbb ccc ddd";
        assert_eq!(fill(text, 7, "", ""), "aaa bbb\nccc ddd");
    }

    #[test]
    fn fill_counts_indent_against_width() {
        let text = "aaa bbb ccc";
        assert_eq!(fill(text, 9, "  ", "  "), "  aaa bbb\n  ccc");
    }

    #[test]
    fn fill_never_breaks_long_words() {
        let text = "short https://core.telegram.org/bots/api#inlinekeyboardmarkup end";
        let filled = fill(text, 20, "", "");
        assert_eq!(
            filled,
            "short\nhttps://core.telegram.org/bots/api#inlinekeyboardmarkup\nend"
        );
    }

    #[test]
    fn fill_never_breaks_on_hyphens() {
        let text = "one-time-keyboard one-time-keyboard";
        assert_eq!(fill(text, 20, "", ""), "one-time-keyboard\none-time-keyboard");
    }

    #[test]
    fn fill_treats_newlines_as_spaces() {
        assert_eq!(fill("a\nb\tc", 79, "", ""), "a b c");
    }

    #[test]
    fn fill_blank_is_empty() {
        assert_eq!(fill("", 79, "    ", "    "), "");
        assert_eq!(fill("   ", 79, "    ", "    "), "");
    }

    #[test]
    fn fill_counts_emoji_as_one_column() {
        let text = "Value of the dice, 1-6 for “🎲”, “🎯” and “🎳” base emoji, 1-5 for “🏀” \
                    and “⚽” base emoji, 1-64 for “🎰” base emoji";
        assert_eq!(
            fill(text, 79, TWELVE_SPACE_INDENT, TWELVE_SPACE_INDENT),
            "            Value of the dice, 1-6 for “🎲”, “🎯” and “🎳” base emoji, 1-5 for “🏀”\n            \
             and “⚽” base emoji, 1-64 for “🎰” base emoji"
        );
    }

    #[test]
    fn fill_counts_cjk_as_one_column() {
        let text = "这是一个测试段落 用于验证 中文字符的 宽度计算 是否与 Python 保持一致 \
                    每个字符 只算一列 而不是两列 这样 换行位置 才会相同";
        assert_eq!(
            fill(text, 40, "", ""),
            "这是一个测试段落 用于验证 中文字符的 宽度计算 是否与 Python 保持一致\n\
             每个字符 只算一列 而不是两列 这样 换行位置 才会相同"
        );
    }

    #[test]
    fn fill_keeps_no_break_space() {
        let text = "Emoji on which the dice throw animation is based aaaa\u{a0}bbbbbbb cccc";
        assert_eq!(
            fill(text, 60, "", ""),
            "Emoji on which the dice throw animation is based\naaaa\u{a0}bbbbbbb cccc"
        );
    }

    #[test]
    fn fill_expands_tabs_to_eight_columns() {
        assert_eq!(fill("a\tb c", 79, "", ""), "a       b c");
        assert_eq!(fill("ab\tc", 79, "", ""), "ab      c");
    }

    #[test]
    fn fill_treats_vertical_tab_and_form_feed_as_spaces() {
        assert_eq!(fill("x\x0by\x0cz", 79, "", ""), "x y z");
    }

    #[test]
    fn fill_is_deterministic() {
        let text = "This object represents an incoming callback query from a callback button \
                    in an inline keyboard. If the button that originated the query was attached \
                    to a message sent by the bot, the field message will be present.";
        assert_eq!(fill(text, 79, "", "    "), fill(text, 79, "", "    "));
        for line in fill(text, 79, "", "    ").lines() {
            assert!(line.len() <= 79, "line too long: {line:?}");
        }
    }

    // === description paragraphs ===

    #[test]
    fn single_paragraph_is_unindented() {
        let doc = docstring(&paragraphs(&["This object represents a chat."]), &[]);
        assert_eq!(doc, "This object represents a chat.");
    }

    #[test]
    fn later_paragraphs_are_indented_and_separated() {
        let doc = docstring(&paragraphs(&["First paragraph.", "Second paragraph."]), &[]);
        assert_eq!(doc, "First paragraph.\n\n    Second paragraph.");
    }

    #[test]
    fn list_items_are_joined_by_single_newline() {
        let doc = docstring(
            &paragraphs(&[
                "This object represents the content of a media message. It should be one of",
                "- InputMediaAnimation",
                "- InputMediaDocument",
                "- InputMediaAudio",
            ]),
            &[],
        );
        assert_eq!(
            doc,
            "This object represents the content of a media message. It should be one of:\n\n    \
             - InputMediaAnimation\n    - InputMediaDocument\n    - InputMediaAudio"
        );
    }

    #[test]
    fn colon_only_after_the_word_of() {
        assert!(ends_with_word_of("It should be one of"));
        assert!(!ends_with_word_of("Telegram proof"));
        assert!(!ends_with_word_of("one of the following."));
        assert!(!ends_with_word_of("It should be one of "));
        assert!(ends_with_word_of("of"));
    }

    #[test]
    fn trailing_whitespace_after_of_gets_no_colon() {
        let doc = docstring(&paragraphs(&["It should be one of "]), &[]);
        assert_eq!(doc, "It should be one of");
    }

    #[test]
    fn long_paragraph_wraps_with_four_space_continuation() {
        let doc = docstring(
            &paragraphs(&[
                "This object represents one size of a photo or a file / sticker thumbnail. \
                 Photos can be sent to bots in several sizes.",
            ]),
            &[],
        );
        assert_eq!(
            doc,
            "This object represents one size of a photo or a file / sticker thumbnail.\n    \
             Photos can be sent to bots in several sizes."
        );
    }

    // === parameters ===

    #[test]
    fn no_fields_means_no_parameters_header() {
        let doc = docstring(&paragraphs(&["Empty."]), &[]);
        assert!(!doc.contains("Parameters:"));
    }

    #[test]
    fn parameters_section_layout() {
        let fields = vec![
            make_field_with_description(
                "id",
                &["Integer"],
                true,
                "Unique identifier for this chat.",
            ),
            make_field_with_description(
                "title",
                &["String"],
                false,
                "Optional. Title, for supergroups, channels and group chats",
            ),
        ];
        let doc = docstring(&paragraphs(&["This object represents a chat."]), &fields);
        assert_eq!(
            doc,
            "This object represents a chat.\n\n    Parameters:\n\
             \x20       id (``int``):\n\
             \x20           Unique identifier for this chat.\n\n\
             \x20       title (``str``, *optional*):\n\
             \x20           Title, for supergroups, channels and group chats"
        );
        assert!(!doc.ends_with('\n'));
    }

    #[test]
    fn from_field_is_renamed_in_header() {
        let fields = vec![make_field("from", &["User"], false)];
        let doc = docstring(&[], &fields);
        assert!(doc.contains("from_user (:obj:`~pybotgram.types.User`, *optional*):"));
        assert!(!doc.contains(" from ("));
    }

    #[test]
    fn long_header_wraps_at_eight_columns() {
        let field = make_field(
            "reply_markup",
            &[
                "InlineKeyboardMarkup",
                "ReplyKeyboardMarkup",
                "ReplyKeyboardRemove",
                "ForceReply",
            ],
            false,
        );
        let entry = entry(&field);
        let header_lines: Vec<_> = entry
            .lines()
            .take_while(|l| !l.starts_with("            "))
            .collect();
        assert!(header_lines.len() > 1);
        for line in &header_lines {
            assert!(line.starts_with("        "));
            assert!(line.len() <= 79, "line too long: {line:?}");
        }
    }

    #[test]
    fn only_leading_optional_marker_is_stripped() {
        let field = make_field_with_description(
            "caption",
            &["String"],
            false,
            "Optional. Caption. Optional. text",
        );
        assert!(entry(&field).ends_with("            Caption. Optional. text"));
    }

    #[test]
    fn backslashes_are_escaped() {
        let field =
            make_field_with_description("pattern", &["String"], true, r"Use \d for digits");
        assert!(entry(&field).contains(r"Use \\d for digits"));
    }

    #[test]
    fn header_uses_resolved_doc_expression() {
        let field = make_field("photo", &["Array of PhotoSize"], false);
        let options = RenderOptions {
            package: "mybot.types".to_string(),
            ..RenderOptions::default()
        };
        let resolved = ResolvedField::new(&field, &options.package);
        let entry = render_field_entry(&resolved, &options);
        assert!(entry.starts_with(
            "        photo (List of :obj:`~mybot.types.PhotoSize`, *optional*):\n"
        ));
    }
}
