use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::Path;
use tracing::debug;

const VOCABULARY: &[&str] = &[
    "account", "agree", "almost", "answer", "around", "begin", "behind", "believe", "better",
    "budget", "camera", "career", "central", "chance", "church", "citizen", "common", "country",
    "course", "culture", "debate", "decade", "design", "detail", "energy", "enjoy", "evening",
    "family", "figure", "finish", "friend", "future", "garden", "ground", "growth", "happen",
    "health", "history", "hotel", "idea", "image", "island", "kitchen", "language", "leader",
    "letter", "market", "memory", "method", "middle", "minute", "moment", "nation", "nature",
    "office", "parent", "people", "picture", "player", "police", "policy", "public", "quality",
    "reason", "record", "region", "report", "result", "river", "science", "season", "second",
    "series", "simple", "single", "sister", "source", "spring", "station", "street", "student",
    "summer", "system", "temple", "theory", "travel", "value", "village", "window", "winter",
    "world", "writer", "yellow",
];

/// Writes `count` files named `file{n}.txt` of random text into `dir`.
///
/// Each file holds sentences of vocabulary words, at most `length` characters
/// long. A fixed `seed` makes the output reproducible.
pub fn seed_directory(
    dir: &Path,
    count: usize,
    length: usize,
    seed: Option<u64>,
) -> std::io::Result<()> {
    fs::create_dir_all(dir)?;
    let mut rng = match seed {
        Some(value) => StdRng::seed_from_u64(value),
        None => StdRng::from_entropy(),
    };

    for i in 0..count {
        let path = dir.join(format!("file{}.txt", i + 1));
        let text = random_text(&mut rng, length);
        debug!("Writing {} ({} chars)", path.display(), text.len());
        fs::write(path, text)?;
    }
    Ok(())
}

fn random_text<R: Rng>(rng: &mut R, max_chars: usize) -> String {
    let mut text = String::with_capacity(max_chars);
    loop {
        let sentence = random_sentence(rng);
        let separator = usize::from(!text.is_empty());
        if text.len() + separator + sentence.len() > max_chars {
            break;
        }
        if separator == 1 {
            text.push(' ');
        }
        text.push_str(&sentence);
    }
    text
}

fn random_sentence<R: Rng>(rng: &mut R) -> String {
    let words = rng.gen_range(4..10);
    let mut sentence = String::new();
    for n in 0..words {
        let word = VOCABULARY.choose(rng).copied().unwrap_or("word");
        if n == 0 {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                sentence.extend(first.to_uppercase());
                sentence.push_str(chars.as_str());
            }
        } else {
            sentence.push(' ');
            sentence.push_str(word);
        }
    }
    sentence.push('.');
    sentence
}
