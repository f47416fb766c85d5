use jpdb_sync::{NoteType, RemoteDeck};
use jpdb_sync_store::StoredNote;

const MAX_FIELD_WIDTH: usize = 40;

pub fn print_deck_table(decks: &[RemoteDeck]) {
    if decks.is_empty() {
        println!("No decks found.");
        return;
    }

    let id_width = decks
        .iter()
        .map(|d| d.id.to_string().len())
        .max()
        .unwrap_or(0);

    for deck in decks {
        println!("  {:>width$}  {}", deck.id, deck.name, width = id_width);
    }

    println!("\n{} decks", decks.len());
}

pub fn print_note_type_table(note_types: &[NoteType]) {
    let name_width = note_types
        .iter()
        .map(|nt| nt.name.chars().count())
        .max()
        .unwrap_or(0);

    for note_type in note_types {
        println!(
            "  {:<width$}  {} fields ({})",
            note_type.name,
            note_type.field_count(),
            note_type.fields.join(", "),
            width = name_width
        );
    }
}

pub fn print_note_table(deck: &str, notes: &[StoredNote]) {
    if notes.is_empty() {
        println!("No notes in '{deck}'.");
        return;
    }

    for note in notes {
        let fields: Vec<String> = note
            .fields
            .iter()
            .map(|f| truncate(f, MAX_FIELD_WIDTH))
            .collect();
        println!("  {:>6}  {}", note.id, fields.join(" | "));
    }

    println!("\n{} notes in '{deck}'", notes.len());
}

/// Show only the last four characters of a credential.
pub fn mask_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count == 0 {
        return "(not set)".into();
    }
    if count <= 4 {
        return "*".repeat(count);
    }

    let tail: String = secret.chars().skip(count - 4).collect();
    format!("{}{tail}", "*".repeat(count - 4))
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_owned()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{truncated}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_short_string_unchanged() {
        assert_eq!(truncate("to eat", 10), "to eat");
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        assert_eq!(truncate("食べる (たべる)", 11), "食べる (たべる)");
        assert_eq!(truncate("食べる (たべる)", 4), "食べる…");
    }

    #[test]
    fn mask_keeps_last_four_characters() {
        assert_eq!(mask_secret("abcdef123456"), "********3456");
    }

    #[test]
    fn mask_hides_short_secrets_entirely() {
        assert_eq!(mask_secret("abc"), "***");
        assert_eq!(mask_secret(""), "(not set)");
    }
}
