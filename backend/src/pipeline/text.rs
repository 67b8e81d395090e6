/// Upper-cases the first letter of every word and lower-cases the rest.
/// Any character that is neither alphanumeric nor an apostrophe starts a
/// new word, so "HOT-dog" becomes "Hot-Dog".
pub fn capitalize_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;

    for ch in text.chars() {
        if ch.is_alphanumeric() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = ch != '\'';
        }
    }

    out
}
