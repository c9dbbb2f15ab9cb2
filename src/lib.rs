//! Terminal front-end shared by the `runo` launcher and `cli_client`.

pub mod terminal;
