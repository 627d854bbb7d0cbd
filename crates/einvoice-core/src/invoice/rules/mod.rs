//! Phrase tables and compiled regexes for the bilingual invoice template.

pub mod patterns;
