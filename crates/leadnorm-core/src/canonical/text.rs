/// Lower-cases `raw`, upper-cases the first letter of every whitespace token
/// and joins the tokens with single spaces.
pub fn capitalize_words(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    for word in lowered.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            push_upper(&mut out, first);
            out.push_str(chars.as_str());
        }
    }
    out
}

// Letters whose upper case is more than one char (ß -> SS) stay as they are,
// otherwise a second pass would lower-case the expansion.
fn push_upper(out: &mut String, ch: char) {
    let mut upper = ch.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(single), None) => out.push(single),
        _ => out.push(ch),
    }
}
