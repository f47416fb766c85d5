use crate::vocabulary::ResolvedVocabulary;

/// Field values for one note, one slot per field of the target note type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedFields(Vec<String>);

impl MappedFields {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

/// Outcome of mapping one resolved record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldMapping {
    Mapped(MappedFields),
    /// No usable spelling; the record produces no note.
    Skip,
}

/// Map a resolved record onto the fields of a note type with
/// `field_count` fields.
///
/// With two or more fields, field 0 is the spelling (followed by the reading
/// in parentheses when it differs) and field 1 the comma-joined meanings.
/// Smaller note types only get the bare spelling. Unused fields stay empty.
pub fn map_fields(record: Option<&ResolvedVocabulary>, field_count: usize) -> FieldMapping {
    let Some(record) = record else {
        return FieldMapping::Skip;
    };
    let Some(spelling) = record.spelling() else {
        return FieldMapping::Skip;
    };

    let mut fields = vec![String::new(); field_count.max(1)];

    if field_count >= 2 {
        fields[0] = compose_front(spelling, record.reading().unwrap_or(""));
        fields[1] = join_meanings(record);
    } else {
        fields[0] = spelling.to_owned();
    }

    FieldMapping::Mapped(MappedFields(fields))
}

fn compose_front(spelling: &str, reading: &str) -> String {
    if reading.is_empty() || reading == spelling {
        spelling.to_owned()
    } else {
        format!("{spelling} ({reading})")
    }
}

fn join_meanings(record: &ResolvedVocabulary) -> String {
    record
        .meanings
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
