//! Splits a completed reply into word-sized chunks for paced emission.
//!
//! The reply is already durable before chunking starts; the split exists
//! only to produce a live-typing effect on the wire. Each chunk is a word
//! together with the whitespace run that follows it, so concatenating the
//! chunks reproduces the reply byte-for-byte.

pub fn split_reply(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    // A chunk splits where a whitespace run ends and the next word starts.
    // Leading whitespace has no word in front of it and rides along with
    // the first word instead.
    let mut at_word_boundary = false;
    let mut has_word = false;

    for ch in text.chars() {
        if ch.is_whitespace() {
            if has_word {
                at_word_boundary = true;
            }
        } else {
            if at_word_boundary {
                chunks.push(std::mem::take(&mut current));
                at_word_boundary = false;
                has_word = false;
            }
            has_word = true;
        }
        current.push(ch);
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
