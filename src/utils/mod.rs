//! Small shared helpers: HTML escaping, MIME lookup, path handling.

pub mod html;
pub mod mime;
pub mod path;
pub mod plural;
