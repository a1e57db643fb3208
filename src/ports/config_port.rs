//! Configuration access port trait.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;

    /// Comma-separated list value. Items are trimmed; a missing key yields an
    /// empty list. Empty items are kept so validation can reject them.
    fn get_list(&self, section: &str, key: &str) -> Vec<String> {
        match self.get_string(section, key) {
            Some(raw) if !raw.trim().is_empty() => {
                raw.split(',').map(|s| s.trim().to_string()).collect()
            }
            _ => Vec::new(),
        }
    }
}
