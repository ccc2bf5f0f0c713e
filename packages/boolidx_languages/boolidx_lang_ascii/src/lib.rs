#[macro_use]
extern crate lazy_static;

pub mod ascii;
pub mod stop_words;
