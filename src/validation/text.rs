//! Character-level heuristics shared by the validators

const VOWELS: &str = "aeiou";

pub(crate) fn is_vowel(c: char) -> bool {
    VOWELS.contains(c.to_ascii_lowercase())
}

/// Number of ASCII vowels, case-insensitive
pub(crate) fn count_vowels(s: &str) -> usize {
    s.chars().filter(|c| is_vowel(*c)).count()
}

/// Length of the longest run of one repeated character
pub(crate) fn longest_run(s: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    let mut previous = None;
    for c in s.chars() {
        if Some(c) == previous {
            current += 1;
        } else {
            current = 1;
            previous = Some(c);
        }
        longest = longest.max(current);
    }
    longest
}

/// Number of 3-character windows made entirely of non-vowels
pub(crate) fn consonant_triples(word: &str) -> usize {
    let chars: Vec<char> = word.chars().collect();
    chars
        .windows(3)
        .filter(|w| w.iter().all(|c| !is_vowel(*c)))
        .count()
}

pub(crate) fn has_ascii_letter(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_alphabetic())
}
