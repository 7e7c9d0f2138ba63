//! Text-level helpers over type spellings.
//!
//! Type text arrives from the front end as the host language prints it. These helpers split and rewrite
//! that text without knowing anything about the struct registry; the resolver composes them.

use super::TypeError;

/// Characters that may appear in a type identifier.
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => chars.all(is_word_char),
        _ => false,
    }
}

/// Rewrite whole words of `text` for which `f` returns a replacement.
pub fn map_words<'r>(text: &str, f: impl Fn(&str) -> Option<&'r str>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word_start: Option<usize> = None;
    for (idx, ch) in text.char_indices() {
        if is_word_char(ch) {
            word_start.get_or_insert(idx);
            continue;
        }
        if let Some(start) = word_start.take() {
            push_word(&mut out, &text[start..idx], &f);
        }
        out.push(ch);
    }
    if let Some(start) = word_start {
        push_word(&mut out, &text[start..], &f);
    }
    out
}

fn push_word<'r>(out: &mut String, word: &str, f: &impl Fn(&str) -> Option<&'r str>) {
    match f(word) {
        Some(replacement) => out.push_str(replacement),
        None => out.push_str(word),
    }
}

/// Split `text` on any of `separators` occurring outside brackets.
///
/// Empty pieces are kept (callers filter them); pieces are not trimmed.
pub fn split_top_level<'t>(text: &'t str, separators: &[char]) -> Vec<&'t str> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut prev = '\0';
    for (idx, ch) in text.char_indices() {
        match ch {
            '<' | '{' | '(' | '[' => depth += 1,
            // `=>` in function types is not a closing bracket.
            '>' if prev == '=' => {}
            '>' | '}' | ')' | ']' => depth = depth.saturating_sub(1),
            _ if depth == 0 && separators.contains(&ch) => {
                pieces.push(&text[start..idx]);
                start = idx + ch.len_utf8();
            }
            _ => {}
        }
        prev = ch;
    }
    pieces.push(&text[start..]);
    pieces
}

/// Whether `ch` occurs outside brackets.
pub fn contains_top_level(text: &str, ch: char) -> bool {
    split_top_level(text, &[ch]).len() > 1
}

/// Split `Head<a, b>` into its head and (trimmed) arguments.
///
/// Returns `None` unless the whole text is a single generic application.
pub fn parse_generic(text: &str) -> Option<(&str, Vec<&str>)> {
    let open = text.find('<')?;
    if !text.ends_with('>') {
        return None;
    }
    let head = text[..open].trim();
    if !is_identifier(head) {
        return None;
    }
    let inner = &text[open + 1..text.len() - 1];
    // The bracket opened at `open` must be the one closed by the final `>`.
    let mut depth = 0usize;
    for ch in inner.chars() {
        match ch {
            '<' => depth += 1,
            '>' => {
                if depth == 0 {
                    return None;
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }
    let args = split_top_level(inner, &[',']).into_iter().map(str::trim).collect();
    Some((head, args))
}

/// `"text"`, `'text'` or a template literal type.
pub fn is_quoted(text: &str) -> bool {
    text.len() >= 2
        && [('"', '"'), ('\'', '\''), ('`', '`')]
            .iter()
            .any(|(open, close)| text.starts_with(*open) && text.ends_with(*close))
}

/// Numeric literal types such as `12`, `-3` or `12.34`.
pub fn is_numeric_literal(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    digits.chars().next().is_some_and(|c| c.is_ascii_digit())
        && digits.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_')
}

/// Parse the members of an object type `{ a: T; readonly b: U }` into `(name, type text)` pairs.
///
/// Optional members, methods, index signatures and empty shapes have no fixed struct layout and are
/// rejected.
pub fn parse_shape(text: &str) -> Result<Vec<(String, String)>, TypeError> {
    let malformed = |reason: &str| TypeError::MalformedShape {
        shape: text.to_string(),
        reason: reason.to_string(),
    };
    let inner = text
        .trim()
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .ok_or_else(|| malformed("unbalanced braces"))?;

    let mut fields = Vec::new();
    for member in split_top_level(inner, &[';', ',']) {
        let member = member.trim();
        if member.is_empty() {
            continue;
        }
        let member = member.strip_prefix("readonly ").map(str::trim_start).unwrap_or(member);
        let Some((name, ty)) = split_member(member) else {
            return Err(malformed(&format!("member `{member}` has no type")));
        };
        let name = name.trim();
        if name.ends_with('?') {
            return Err(malformed(&format!("optional member `{name}`")));
        }
        if name.contains('(') || name.starts_with('[') {
            return Err(malformed(&format!("member `{name}` is not a field")));
        }
        if !is_identifier(name) {
            return Err(malformed(&format!("invalid field name `{name}`")));
        }
        fields.push((name.to_string(), ty.trim().to_string()));
    }
    if fields.is_empty() {
        return Err(malformed("empty object type"));
    }
    Ok(fields)
}

/// Split `name: type` on the first top-level colon.
fn split_member(member: &str) -> Option<(&str, &str)> {
    let pieces = split_top_level(member, &[':']);
    if pieces.len() < 2 {
        return None;
    }
    let name = pieces[0];
    Some((name, &member[name.len() + 1..]))
}
