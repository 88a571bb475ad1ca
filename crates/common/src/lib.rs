pub mod api;
pub mod config;
pub mod fuzzy;
pub mod logging;
pub mod matcher;
pub mod normalize;
pub mod phonetic;
pub mod record;
pub mod translate;
pub mod translit;
