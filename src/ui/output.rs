use crate::ui::{theme, Icons, Tone};

pub fn header(text: &str) {
    println!("{} {}", Icons::ROCKET, theme().paint(Tone::Header, text));
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, theme().paint(Tone::Success, label));
}

pub fn info(label: &str, value: &str) {
    println!(
        "{} {}: {}",
        theme().paint(Tone::Accent, Icons::INFO),
        theme().paint(Tone::Muted, label),
        value
    );
}
