/// Tier style profiles and the style book.
pub mod profile;
