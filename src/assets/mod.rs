/// Portrait decoding and the post-decode quality gate.
pub mod decode;
/// Matching record names to portrait files on disk.
pub mod lookup;
