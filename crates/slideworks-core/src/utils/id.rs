// Row identifier generation.

/// Generate a unique row identifier: a random 128-bit UUID, hyphenated.
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
