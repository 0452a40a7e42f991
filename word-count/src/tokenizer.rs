// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// Remove every ASCII punctuation character (`!"#$%&'()*+,-./:;<=>?@[\]^_`{|}~`).
/// Everything else, non-ASCII punctuation included, is kept as is.
pub fn remove_punctuation(text: &str) -> String {
    text.chars().filter(|c| !c.is_ascii_punctuation()).collect()
}

/// Normalize `text` into word tokens: strip punctuation, then split on
/// whitespace. Case is preserved.
pub fn tokenize(text: &str) -> Vec<String> {
    remove_punctuation(text)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
