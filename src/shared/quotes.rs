use rand::Rng;

pub const QUOTES: &[&str] = &[
    "The only way to do great work is to love what you do.",
    "Simplicity is prerequisite for reliability.",
    "It always seems impossible until it's done.",
    "Well done is better than well said.",
    "Whether you think you can or you think you can't, you're right.",
    "The journey of a thousand miles begins with one step.",
    "What we think, we become.",
    "Act as if what you do makes a difference. It does.",
    "Fall seven times, stand up eight.",
    "Do what you can, with what you have, where you are.",
];

pub fn random_quote() -> &'static str {
    random_quote_with(&mut rand::thread_rng())
}

pub fn random_quote_with<R: Rng>(rng: &mut R) -> &'static str {
    QUOTES[rng.gen_range(0..QUOTES.len())]
}
