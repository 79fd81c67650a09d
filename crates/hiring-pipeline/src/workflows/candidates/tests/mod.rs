mod common;
mod history;
mod import;
