/// Transliteration collaborator. Implementations must be deterministic and
/// total: the matcher treats their output as plain searchable text.
pub trait PhoneticProvider: Send + Sync {
    fn phonetic(&self, text: &str) -> String;
    fn initials(&self, text: &str) -> String;
}

impl<P: PhoneticProvider + ?Sized> PhoneticProvider for Box<P> {
    fn phonetic(&self, text: &str) -> String { (**self).phonetic(text) }
    fn initials(&self, text: &str) -> String { (**self).initials(text) }
}

impl<P: PhoneticProvider + ?Sized> PhoneticProvider for std::sync::Arc<P> {
    fn phonetic(&self, text: &str) -> String { (**self).phonetic(text) }
    fn initials(&self, text: &str) -> String { (**self).initials(text) }
}
